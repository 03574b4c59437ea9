//! System-level matching scenarios built from hand-made catalogs.

use sectordex_common::{
    Condition, Coordinate, Planet, PlanetType, Population, StarSystem, SystemContents,
};
use sectordex_query::{rank_by_distance, PlanetRequirement, QueryError, SystemRequirement};

fn ore(id: &str, name: &str) -> Condition {
    Condition::new(id, name).with_resource_tier(sectordex_common::resources::resource_tier(id))
}

fn volcanic() -> Condition {
    Condition::new("volcanic", "Volcanic").with_hazard(Some(0.15))
}

fn lava() -> PlanetType {
    PlanetType::new("lava", "Lava")
}

fn rocky_planet(id: &str, population: Option<Population>) -> Planet {
    Planet::new(
        id,
        "Hephaestus",
        lava(),
        "sys-a",
        vec![ore("ore_abundant", "Abundant Ore"), volcanic()],
        population,
    )
}

fn system(id: &str, x_px: f64, planets: Vec<Planet>, themes: &[&str]) -> StarSystem {
    StarSystem::new(
        id,
        id,
        Coordinate::from_pixels(x_px, 0.0),
        SystemContents {
            planets,
            themes: themes.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        },
    )
}

#[test]
fn scenario_half_light_year_rocky_world() {
    let sys = system("sys-a", 1000.0, vec![rocky_planet("p1", None)], &[]);
    assert!((sys.dist() - 0.5).abs() < 1e-12);

    let planet = &sys.planets()[0];
    assert!((planet.hazard() - 1.15).abs() < 1e-9);
    assert_eq!(planet.resources().len(), 1);
    assert_eq!(planet.resources()[0].id(), "ore_abundant");

    let moderate = PlanetRequirement::builder()
        .with_min_resource("ore_moderate")
        .build()
        .unwrap();
    let rich = PlanetRequirement::builder()
        .with_min_resource("ore_rich")
        .build()
        .unwrap();

    assert!(SystemRequirement::new().with_planet(moderate).check(&sys));
    assert!(!SystemRequirement::new().with_planet(rich).check(&sys));
}

#[test]
fn scenario_max_hazard_bounds() {
    let sys = system("sys-a", 1000.0, vec![rocky_planet("p1", None)], &[]);
    let capped = |max| {
        SystemRequirement::new().with_planet(
            PlanetRequirement::builder()
                .with_max_hazard(max)
                .build()
                .unwrap(),
        )
    };
    assert!(!capped(1.0).check(&sys));
    assert!(capped(1.2).check(&sys));
}

#[test]
fn scenario_inhabited_system_rejected_when_uninhabited_required() {
    let settled = Population {
        size: 500,
        faction_id: Some("tritachyon".to_string()),
        faction_name: "Tri-Tachyon".to_string(),
    };
    let sys = system("sys-a", 1000.0, vec![rocky_planet("p1", Some(settled))], &[]);
    assert!(sys.is_inhabited());

    let loose = SystemRequirement::new().with_planet(PlanetRequirement::any());
    assert!(loose.check(&sys));
    assert!(!loose.uninhabited(true).check(&sys));
}

#[test]
fn empty_requirement_matches_every_system() {
    let identity = SystemRequirement::new();
    let systems = [
        system("empty", 0.0, vec![], &[]),
        system("far", 1_000_000.0, vec![rocky_planet("p1", None)], &["theme_ruins"]),
    ];
    assert!(systems.iter().all(|s| identity.check(s)));
}

#[test]
fn distance_planet_count_and_theme_filters() {
    let near = system("near", 2000.0, vec![rocky_planet("p1", None)], &["theme_core"]);
    let far = system(
        "far",
        40_000.0,
        vec![rocky_planet("p2", None), rocky_planet("p3", None)],
        &["theme_ruins"],
    );

    let within_ten = SystemRequirement::new().with_max_distance(10.0);
    assert!(within_ten.check(&near));
    assert!(!within_ten.check(&far));

    let two_planets = SystemRequirement::new().with_min_planets(2);
    assert!(!two_planets.check(&near));
    assert!(two_planets.check(&far));

    let ruins = SystemRequirement::new().with_theme("theme_ruins");
    assert!(!ruins.check(&near));
    assert!(ruins.check(&far));
}

#[test]
fn distance_limit_is_inclusive() {
    let sys = StarSystem::new(
        "edge",
        "edge",
        Coordinate::new(10.0, 0.0),
        SystemContents::default(),
    );
    assert!(SystemRequirement::new().with_max_distance(10.0).check(&sys));
}

#[test]
fn every_planet_requirement_needs_some_planet() {
    let cold_world = Planet::new(
        "p2",
        "Boreas",
        PlanetType::new("frozen", "Frozen"),
        "sys-a",
        vec![Condition::new("very_cold", "Very Cold")],
        None,
    );
    let sys = system("sys-a", 0.0, vec![rocky_planet("p1", None), cold_world], &[]);

    let wants_lava = PlanetRequirement::builder().with_types([lava()]).build().unwrap();
    let wants_frozen = PlanetRequirement::builder()
        .with_types([PlanetType::new("frozen", "Frozen")])
        .build()
        .unwrap();
    let wants_gas = PlanetRequirement::builder()
        .with_types([PlanetType::new("gas_giant", "Gas Giant")])
        .build()
        .unwrap();

    let both = SystemRequirement::new()
        .with_planet(wants_lava.clone())
        .with_planet(wants_frozen);
    assert!(both.check(&sys));

    let impossible = SystemRequirement::new()
        .with_planet(wants_lava)
        .with_planet(wants_gas);
    assert!(!impossible.check(&sys));
}

#[test]
fn replace_keeps_position_and_remove_by_id() {
    let first = PlanetRequirement::builder().with_max_hazard(2.0).build().unwrap();
    let second = PlanetRequirement::builder()
        .with_min_resource("ore_sparse")
        .build()
        .unwrap();
    let first_id = first.id();
    let second_id = second.id();

    let mut req = SystemRequirement::new().with_planet(first.clone()).with_planet(second);

    let edited = first.to_builder().with_max_hazard(1.25).build().unwrap();
    let edited_id = edited.id();
    req.replace_planet_requirement(first_id, edited).unwrap();

    let ids: Vec<_> = req.planet_requirements().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![edited_id, second_id]);
    assert_eq!(req.planet_requirements()[0].max_hazard(), Some(1.25));

    let removed = req.remove_planet_requirement(second_id).unwrap();
    assert_eq!(removed.id(), second_id);
    assert_eq!(req.planet_requirements().len(), 1);

    assert!(matches!(
        req.remove_planet_requirement(first_id),
        Err(QueryError::UnknownPlanetRequirement(id)) if id == first_id
    ));
}

#[test]
fn filter_then_rank_nearest_first() {
    let systems = vec![
        system("c", 9000.0, vec![rocky_planet("p1", None)], &[]),
        system("a", 1000.0, vec![rocky_planet("p2", None)], &[]),
        system("b", 4000.0, vec![], &[]),
    ];
    let req = SystemRequirement::new().with_min_planets(1);

    let mut matches: Vec<&StarSystem> = req.filter(&systems).collect();
    rank_by_distance(&mut matches);

    let names: Vec<&str> = matches.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["a", "c"]);
}
