use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Scale of save-file coordinates: one light-year is 2000 map pixels.
pub const LY_PER_PX: f64 = 1.0 / 2000.0;

// --- Conditions and types ---

/// A tagged planet attribute: hazard-causing, resource-bearing, or cosmetic.
///
/// Two conditions are the same condition when their ids match, whatever their
/// display names say. Sorting uses the display name.
#[derive(Debug, Clone, Serialize)]
pub struct Condition {
    id: String,
    name: String,
    hazard: Option<f64>,
    resource_tier: Option<i8>,
}

impl Condition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hazard: None,
            resource_tier: None,
        }
    }

    pub fn with_hazard(mut self, hazard: Option<f64>) -> Self {
        self.hazard = hazard;
        self
    }

    pub fn with_resource_tier(mut self, tier: Option<i8>) -> Self {
        self.resource_tier = tier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hazard(&self) -> Option<f64> {
        self.hazard
    }

    pub fn resource_tier(&self) -> Option<i8> {
        self.resource_tier
    }

    pub fn is_resource(&self) -> bool {
        self.resource_tier.is_some()
    }

    /// Non-resource condition with a nonzero hazard contribution.
    pub fn is_hazard(&self) -> bool {
        !self.is_resource() && self.hazard.is_some_and(|h| h != 0.0)
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Condition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Condition {
    // Ties on name fall back to the id so that Ord agrees with Eq.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Planet or star type.
///
/// Types compare by display name: mods regularly ship their own ids for a type
/// the base game already has, and those must count as the same type.
#[derive(Debug, Clone, Serialize)]
pub struct PlanetType {
    id: String,
    name: String,
}

impl PlanetType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for PlanetType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PlanetType {}

impl Hash for PlanetType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for PlanetType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlanetType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::fmt::Display for PlanetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// --- Population ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Population {
    pub size: u32,
    pub faction_id: Option<String>,
    /// Empty when the faction id is not in the lookup tables.
    pub faction_name: String,
}

impl Population {
    pub fn is_inhabited(&self) -> bool {
        self.size > 0
    }
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faction = if self.faction_name.is_empty() {
            self.faction_id.as_deref().unwrap_or("unknown faction")
        } else {
            self.faction_name.as_str()
        };
        write!(f, "{faction} size {}", self.size)
    }
}

fn inhabited(population: &Option<Population>) -> bool {
    population.as_ref().is_some_and(Population::is_inhabited)
}

// --- Planets and stars ---

/// A catalogued planet. Its conditions are split once, at construction, into
/// resources, hazard conditions and the rest; the three lists are disjoint and
/// together hold every condition the planet was built with.
#[derive(Debug, Clone, Serialize)]
pub struct Planet {
    id: String,
    name: String,
    planet_type: PlanetType,
    system_id: String,
    population: Option<Population>,
    resources: Vec<Condition>,
    hazard_conditions: Vec<Condition>,
    other_conditions: Vec<Condition>,
    hazard: f64,
}

impl Planet {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        planet_type: PlanetType,
        system_id: impl Into<String>,
        conditions: Vec<Condition>,
        population: Option<Population>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut resources = Vec::new();
        let mut hazard_conditions = Vec::new();
        let mut other_conditions = Vec::new();

        for condition in conditions {
            if !seen.insert(condition.id.clone()) {
                continue;
            }
            if condition.is_resource() {
                resources.push(condition);
            } else if condition.is_hazard() {
                hazard_conditions.push(condition);
            } else {
                other_conditions.push(condition);
            }
        }

        let hazard = 1.0
            + hazard_conditions
                .iter()
                .filter_map(Condition::hazard)
                .sum::<f64>();

        Self {
            id: id.into(),
            name: name.into(),
            planet_type,
            system_id: system_id.into(),
            population,
            resources,
            hazard_conditions,
            other_conditions,
            hazard,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn planet_type(&self) -> &PlanetType {
        &self.planet_type
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    pub fn is_inhabited(&self) -> bool {
        inhabited(&self.population)
    }

    pub fn resources(&self) -> &[Condition] {
        &self.resources
    }

    pub fn hazard_conditions(&self) -> &[Condition] {
        &self.hazard_conditions
    }

    pub fn other_conditions(&self) -> &[Condition] {
        &self.other_conditions
    }

    /// Hazard rating: 1.0 plus the contribution of every hazard condition.
    pub fn hazard(&self) -> f64 {
        self.hazard
    }

    /// Every condition on the planet, resources first.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.resources
            .iter()
            .chain(&self.hazard_conditions)
            .chain(&self.other_conditions)
    }

    /// Non-resource conditions (hazards and cosmetic ones).
    pub fn non_resource_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.hazard_conditions.iter().chain(&self.other_conditions)
    }

    pub fn has_condition(&self, condition: &Condition) -> bool {
        self.conditions().any(|c| c == condition)
    }

    pub fn has_resource(&self, condition_id: &str) -> bool {
        self.resources.iter().any(|c| c.id == condition_id)
    }
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.0}% {}",
            self.name,
            self.hazard * 100.0,
            self.planet_type
        )?;
        if let Some(population) = &self.population {
            write!(f, " - {population}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Star {
    pub id: String,
    pub star_type: PlanetType,
    pub system_id: String,
}

impl std::fmt::Display for Star {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.star_type)
    }
}

// --- Stable locations and stations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    CommRelay,
    NavBuoy,
    SensorArray,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] = [
        StructureKind::CommRelay,
        StructureKind::NavBuoy,
        StructureKind::SensorArray,
    ];

    /// Category tag the save file uses for this structure.
    pub fn tag(self) -> &'static str {
        match self {
            StructureKind::CommRelay => "comm_relay",
            StructureKind::NavBuoy => "nav_buoy",
            StructureKind::SensorArray => "sensor_array",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl std::fmt::Display for StructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureKind::CommRelay => write!(f, "comm relay"),
            StructureKind::NavBuoy => write!(f, "nav buoy"),
            StructureKind::SensorArray => write!(f, "sensor array"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StableLocation {
    /// `None` for an empty slot.
    pub structure: Option<StructureKind>,
    pub makeshift: bool,
}

impl StableLocation {
    pub fn empty() -> Self {
        Self {
            structure: None,
            makeshift: false,
        }
    }

    pub fn with_structure(structure: StructureKind, makeshift: bool) -> Self {
        Self {
            structure: Some(structure),
            makeshift,
        }
    }
}

impl std::fmt::Display for StableLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.structure {
            None => write!(f, "empty stable location"),
            Some(kind) if self.makeshift => write!(f, "{kind} (makeshift)"),
            Some(kind) => write!(f, "{kind}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub population: Option<Population>,
}

impl Station {
    pub fn is_inhabited(&self) -> bool {
        inhabited(&self.population)
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(population) = &self.population {
            write!(f, " ({population})")?;
        }
        Ok(())
    }
}

// --- Star systems ---

/// Position on the sector map in light-years, relative to the map center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_pixels(x_px: f64, y_px: f64) -> Self {
        Self::new(x_px * LY_PER_PX, y_px * LY_PER_PX)
    }

    /// Euclidean distance from the map center.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Everything found inside one system node, before it is frozen into a
/// [`StarSystem`].
#[derive(Debug, Clone, Default)]
pub struct SystemContents {
    pub themes: BTreeSet<String>,
    pub stars: Vec<Star>,
    pub planets: Vec<Planet>,
    pub stable_locations: Vec<StableLocation>,
    pub stations: Vec<Station>,
    pub jump_points: u32,
    pub salvageables: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarSystem {
    id: String,
    name: String,
    location: Coordinate,
    dist: f64,
    themes: BTreeSet<String>,
    stars: Vec<Star>,
    planets: Vec<Planet>,
    stable_locations: Vec<StableLocation>,
    stations: Vec<Station>,
    jump_points: u32,
    salvageables: BTreeMap<String, u32>,
    is_inhabited: bool,
}

impl StarSystem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: Coordinate,
        contents: SystemContents,
    ) -> Self {
        let is_inhabited = contents.planets.iter().any(Planet::is_inhabited)
            || contents.stations.iter().any(Station::is_inhabited);

        Self {
            id: id.into(),
            name: name.into(),
            location,
            dist: location.norm(),
            themes: contents.themes,
            stars: contents.stars,
            planets: contents.planets,
            stable_locations: contents.stable_locations,
            stations: contents.stations,
            jump_points: contents.jump_points,
            salvageables: contents.salvageables,
            is_inhabited,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Distance from the map center in light-years.
    pub fn dist(&self) -> f64 {
        self.dist
    }

    pub fn themes(&self) -> &BTreeSet<String> {
        &self.themes
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn stable_locations(&self) -> &[StableLocation] {
        &self.stable_locations
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn jump_points(&self) -> u32 {
        self.jump_points
    }

    pub fn salvageables(&self) -> &BTreeMap<String, u32> {
        &self.salvageables
    }

    pub fn is_inhabited(&self) -> bool {
        self.is_inhabited
    }
}

impl std::fmt::Display for StarSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} planets {:.1}ly from center",
            self.name,
            self.planets.len(),
            self.dist
        )?;
        if self.is_inhabited {
            write!(f, " - inhabited")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volcanic() -> Condition {
        Condition::new("volcanic", "Volcanic").with_hazard(Some(0.15))
    }

    fn ore_abundant() -> Condition {
        Condition::new("ore_abundant", "Abundant Ore").with_resource_tier(Some(1))
    }

    fn barren() -> PlanetType {
        PlanetType::new("barren", "Barren")
    }

    #[test]
    fn planet_partitions_conditions() {
        let ruins = Condition::new("decivilized", "Decivilized");
        let planet = Planet::new(
            "p1",
            "Rock",
            barren(),
            "sys1",
            vec![ore_abundant(), volcanic(), ruins.clone()],
            None,
        );

        assert_eq!(planet.resources(), &[ore_abundant()]);
        assert_eq!(planet.hazard_conditions(), &[volcanic()]);
        assert_eq!(planet.other_conditions(), &[ruins]);
        assert_eq!(planet.conditions().count(), 3);
        assert!((planet.hazard() - 1.15).abs() < 1e-9);
    }

    #[test]
    fn zero_hazard_condition_is_not_a_hazard() {
        let calm = Condition::new("calm", "Calm").with_hazard(Some(0.0));
        let planet = Planet::new("p1", "Rock", barren(), "sys1", vec![calm.clone()], None);
        assert!(planet.hazard_conditions().is_empty());
        assert_eq!(planet.other_conditions(), &[calm]);
        assert_eq!(planet.hazard(), 1.0);
    }

    #[test]
    fn negative_hazard_lowers_rating() {
        let habitable = Condition::new("habitable", "Habitable").with_hazard(Some(-0.25));
        let planet = Planet::new("p1", "Eden", barren(), "sys1", vec![habitable], None);
        assert!((planet.hazard() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn duplicate_condition_ids_are_kept_once() {
        let planet = Planet::new(
            "p1",
            "Rock",
            barren(),
            "sys1",
            vec![volcanic(), volcanic()],
            None,
        );
        assert_eq!(planet.hazard_conditions().len(), 1);
        assert!((planet.hazard() - 1.15).abs() < 1e-9);
    }

    #[test]
    fn condition_equality_ignores_display_name() {
        let a = Condition::new("hot", "Hot");
        let b = Condition::new("hot", "Scorching");
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn conditions_sort_by_display_name() {
        let mut conditions = vec![
            Condition::new("a", "Zeta"),
            Condition::new("b", "Alpha"),
        ];
        conditions.sort();
        assert_eq!(conditions[0].name(), "Alpha");
    }

    #[test]
    fn planet_types_compare_by_name() {
        let vanilla = PlanetType::new("barren", "Barren");
        let modded = PlanetType::new("barren_mod", "Barren");
        assert_eq!(vanilla, modded);
        let set: HashSet<_> = [vanilla, modded].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn coordinate_from_pixels_uses_map_scale() {
        let loc = Coordinate::from_pixels(1000.0, 0.0);
        assert!((loc.norm() - 0.5).abs() < 1e-12);

        let loc = Coordinate::from_pixels(-6000.0, 8000.0);
        assert!((loc.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn system_inhabited_by_any_planet_or_station() {
        let settled = Population {
            size: 500,
            faction_id: Some("hegemony".to_string()),
            faction_name: "Hegemony".to_string(),
        };
        let planet = Planet::new("p1", "Home", barren(), "sys1", vec![], Some(settled.clone()));

        let system = StarSystem::new(
            "sys1",
            "Corvus",
            Coordinate::new(3.0, 4.0),
            SystemContents {
                planets: vec![planet],
                ..Default::default()
            },
        );
        assert!(system.is_inhabited());
        assert_eq!(system.dist(), 5.0);

        let station_only = StarSystem::new(
            "sys2",
            "Askonia",
            Coordinate::default(),
            SystemContents {
                stations: vec![Station {
                    id: "st1".to_string(),
                    name: "Outpost".to_string(),
                    population: Some(settled),
                }],
                ..Default::default()
            },
        );
        assert!(station_only.is_inhabited());
    }

    #[test]
    fn zero_population_is_not_inhabited() {
        let empty = Population {
            size: 0,
            faction_id: None,
            faction_name: String::new(),
        };
        let planet = Planet::new("p1", "Ghost", barren(), "sys1", vec![], Some(empty));
        let system = StarSystem::new(
            "sys1",
            "Void",
            Coordinate::default(),
            SystemContents {
                planets: vec![planet],
                ..Default::default()
            },
        );
        assert!(!system.is_inhabited());
    }

    #[test]
    fn display_summaries() {
        let planet = Planet::new("p1", "Rock", barren(), "sys1", vec![volcanic()], None);
        assert_eq!(planet.to_string(), "Rock (115% Barren)");
        assert_eq!(
            StableLocation::with_structure(StructureKind::NavBuoy, true).to_string(),
            "nav buoy (makeshift)"
        );
        assert_eq!(StableLocation::empty().to_string(), "empty stable location");
    }
}
