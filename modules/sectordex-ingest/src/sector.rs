use std::collections::BTreeSet;
use std::path::Path;

use sectordex_common::{Condition, PlanetType, StarSystem};
use sectordex_query::SystemRequirement;
use serde::Serialize;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::extract::{extract_file, Extraction};
use crate::session::Session;

/// Lowest and highest planet hazard seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HazardRange {
    pub min: f64,
    pub max: f64,
}

impl HazardRange {
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Widen to include `value`. Never narrows.
    pub fn widen(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The star systems of one loaded save, plus statistics over them.
#[derive(Debug, Default)]
pub struct Sector {
    systems: Vec<StarSystem>,
    planet_types: BTreeSet<PlanetType>,
    star_types: BTreeSet<PlanetType>,
    conditions: BTreeSet<Condition>,
    themes: BTreeSet<String>,
    hazard_range: Option<HazardRange>,
    max_system_dist: f64,
    max_planet_count: usize,
    name: Option<String>,
    seed: Option<String>,
    mods: Vec<String>,
    skipped: Vec<IngestError>,
}

impl Sector {
    /// An empty sector with no systems loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace this sector's contents with the systems of the save at `path`.
    ///
    /// On error the sector is left as it was.
    pub fn load(&mut self, session: &mut Session, path: &Path) -> Result<()> {
        session.ensure_lookups(path)?;
        let extraction = extract_file(path, session.lookups())?;
        let loaded = Self::from_extraction(extraction, session);
        info!(
            systems = loaded.systems.len(),
            planet_types = loaded.planet_types.len(),
            conditions = loaded.conditions.len(),
            skipped = loaded.skipped.len(),
            "Loaded sector"
        );
        *self = loaded;
        Ok(())
    }

    fn from_extraction(extraction: Extraction, session: &mut Session) -> Self {
        let mut sector = Sector {
            name: extraction.save_name,
            seed: extraction.seed,
            mods: extraction.mods,
            skipped: extraction.skipped,
            ..Default::default()
        };

        for system in &extraction.systems {
            sector.max_system_dist = sector.max_system_dist.max(system.dist());
            sector.max_planet_count = sector.max_planet_count.max(system.planet_count());
            sector.themes.extend(system.themes().iter().cloned());
            for planet in system.planets() {
                sector.planet_types.insert(planet.planet_type().clone());
                sector
                    .conditions
                    .extend(planet.non_resource_conditions().cloned());
                session.widen_hazard_range(planet.hazard());
            }
            for star in system.stars() {
                sector.star_types.insert(star.star_type.clone());
            }
        }

        sector.systems = extraction.systems;
        sector.hazard_range = session.hazard_range();
        sector
    }

    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn planet_types(&self) -> &BTreeSet<PlanetType> {
        &self.planet_types
    }

    pub fn star_types(&self) -> &BTreeSet<PlanetType> {
        &self.star_types
    }

    /// Distinct non-resource conditions found on any planet.
    pub fn conditions(&self) -> &BTreeSet<Condition> {
        &self.conditions
    }

    pub fn themes(&self) -> &BTreeSet<String> {
        &self.themes
    }

    /// Hazard range across every load of the owning session, as of this load.
    pub fn hazard_range(&self) -> Option<HazardRange> {
        self.hazard_range
    }

    pub fn max_system_dist(&self) -> f64 {
        self.max_system_dist
    }

    pub fn max_planet_count(&self) -> usize {
        self.max_planet_count
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    pub fn mods(&self) -> &[String] {
        &self.mods
    }

    /// Diagnostics for systems, planets and entities left out of this load.
    pub fn skipped(&self) -> &[IngestError] {
        &self.skipped
    }

    /// Find a planet type by id or display name.
    pub fn planet_type(&self, key: &str) -> Option<&PlanetType> {
        self.planet_types
            .iter()
            .find(|t| t.id() == key || t.name().eq_ignore_ascii_case(key))
    }

    /// Find a condition by id or display name.
    pub fn condition(&self, key: &str) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.id() == key || c.name().eq_ignore_ascii_case(key))
    }

    /// Systems accepted by `requirement`, in load order.
    pub fn matching_systems(&self, requirement: &SystemRequirement) -> Vec<&StarSystem> {
        self.systems
            .iter()
            .filter(|system| requirement.check(system))
            .collect()
    }
}
