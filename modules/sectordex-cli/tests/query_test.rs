//! Query descriptions resolved against the ingestion fixture campaign.

use std::path::{Path, PathBuf};

use sectordex_cli::report;
use sectordex_cli::{PlanetSpec, QuerySpec, QuerySpecError};
use sectordex_ingest::{Sector, Session};
use sectordex_query::{rank_by_distance, QueryError};

fn fixture_save() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("sectordex-ingest")
        .join("tests")
        .join("fixtures")
        .join("game")
        .join("saves")
        .join("save_corvus")
        .join("campaign.xml")
}

fn sector() -> Sector {
    Session::new().load(&fixture_save()).unwrap()
}

fn matching_names(sector: &Sector, spec: &QuerySpec) -> Vec<String> {
    let requirement = spec.build(sector).unwrap();
    let mut matches = sector.matching_systems(&requirement);
    rank_by_distance(&mut matches);
    matches.iter().map(|s| s.name().to_string()).collect()
}

#[test]
fn empty_query_lists_every_system_nearest_first() {
    let sector = sector();
    assert_eq!(
        matching_names(&sector, &QuerySpec::default()),
        vec!["Corvus", "3", "Magec"]
    );
}

#[test]
fn planet_flags_resolve_names() {
    let sector = sector();
    let spec = QuerySpec {
        planets: vec!["types=terran;conditions=Habitable".parse().unwrap()],
        ..Default::default()
    };
    assert_eq!(matching_names(&sector, &spec), vec!["Corvus"]);

    let excluded = QuerySpec {
        planets: vec!["types=Terran,Lava;exclusive-types".parse().unwrap()],
        ..Default::default()
    };
    assert_eq!(matching_names(&sector, &excluded), vec!["Magec"]);
}

#[test]
fn query_file_combines_system_and_planet_filters() {
    let sector = sector();
    let spec = QuerySpec::from_toml(
        r#"
        max_distance = 3.0
        uninhabited = true
        theme = "theme_ruins"

        [[planet]]
        resources = ["ruins_scattered"]
        max_hazard = 1.5
        "#,
    )
    .unwrap();
    assert_eq!(matching_names(&sector, &spec), vec!["Magec"]);

    let tighter = QuerySpec {
        max_distance: Some(2.0),
        ..spec
    };
    assert!(matching_names(&sector, &tighter).is_empty());
}

#[test]
fn unknown_names_are_reported() {
    let sector = sector();

    let spec = QuerySpec {
        planets: vec!["types=Ocean".parse().unwrap()],
        ..Default::default()
    };
    assert!(matches!(
        spec.build(&sector),
        Err(QuerySpecError::UnknownPlanetType(name)) if name == "Ocean"
    ));

    let spec = QuerySpec {
        planets: vec!["conditions=ore_abundant".parse().unwrap()],
        ..Default::default()
    };
    assert!(matches!(
        spec.build(&sector),
        Err(QuerySpecError::UnknownCondition(_))
    ));

    let spec = QuerySpec {
        theme: Some("theme_void".into()),
        ..Default::default()
    };
    assert!(matches!(spec.build(&sector), Err(QuerySpecError::UnknownTheme(_))));

    let spec = QuerySpec {
        planets: vec![PlanetSpec {
            resources: vec!["spice_plentiful".into()],
            ..Default::default()
        }],
        ..Default::default()
    };
    assert!(matches!(
        spec.build(&sector),
        Err(QuerySpecError::Query(QueryError::UnknownResourceFamily(_)))
    ));
}

#[test]
fn summary_reports_the_save() {
    let sector = sector();
    let text = report::SectorSummary(&sector).to_string();
    assert!(text.contains("Save: Ada Quill (seed CAA1-2345)"));
    assert!(text.contains("Mods: lw_lazylib, red_stars"));
    assert!(text.contains("3 systems, up to 2 planets per system, up to 2.2ly from center"));
    assert!(text.contains("Hazard ratings from 75% to 150%"));
    assert!(text.contains("4 entries could not be read"));
}
