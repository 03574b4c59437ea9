use sectordex_common::StarSystem;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{QueryError, Result};
use crate::planet::PlanetRequirement;

/// What a star system must look like.
///
/// Every planet requirement in the list has to be met by at least one planet
/// of the system; different requirements may be met by the same planet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemRequirement {
    max_distance: Option<f64>,
    min_planets: Option<usize>,
    planet_requirements: Vec<PlanetRequirement>,
    must_be_uninhabited: bool,
    theme: Option<String>,
}

impl SystemRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_min_planets(mut self, min_planets: usize) -> Self {
        self.min_planets = Some(min_planets);
        self
    }

    pub fn with_planet(mut self, requirement: PlanetRequirement) -> Self {
        self.planet_requirements.push(requirement);
        self
    }

    pub fn uninhabited(mut self, must_be_uninhabited: bool) -> Self {
        self.must_be_uninhabited = must_be_uninhabited;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    pub fn min_planets(&self) -> Option<usize> {
        self.min_planets
    }

    pub fn planet_requirements(&self) -> &[PlanetRequirement] {
        &self.planet_requirements
    }

    pub fn must_be_uninhabited(&self) -> bool {
        self.must_be_uninhabited
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Swap the requirement with the given id for `replacement`, keeping its
    /// position in the list.
    pub fn replace_planet_requirement(
        &mut self,
        id: Uuid,
        replacement: PlanetRequirement,
    ) -> Result<()> {
        let slot = self
            .planet_requirements
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(QueryError::UnknownPlanetRequirement(id))?;
        *slot = replacement;
        Ok(())
    }

    pub fn remove_planet_requirement(&mut self, id: Uuid) -> Result<PlanetRequirement> {
        let index = self
            .planet_requirements
            .iter()
            .position(|r| r.id() == id)
            .ok_or(QueryError::UnknownPlanetRequirement(id))?;
        Ok(self.planet_requirements.remove(index))
    }

    pub fn check(&self, system: &StarSystem) -> bool {
        if self.max_distance.is_some_and(|max| system.dist() > max) {
            return false;
        }
        if self.min_planets.is_some_and(|min| system.planet_count() < min) {
            return false;
        }
        if let Some(theme) = &self.theme {
            if !system.themes().contains(theme) {
                return false;
            }
        }
        let planets_match = self
            .planet_requirements
            .iter()
            .all(|req| system.planets().iter().any(|planet| req.check(planet)));
        if !planets_match {
            return false;
        }
        !(self.must_be_uninhabited && system.is_inhabited())
    }

    /// Keep the systems this requirement accepts, in their original order.
    pub fn filter<'a>(
        &'a self,
        systems: impl IntoIterator<Item = &'a StarSystem>,
    ) -> impl Iterator<Item = &'a StarSystem> {
        systems.into_iter().filter(move |system| self.check(system))
    }
}

impl std::fmt::Display for SystemRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<sys req:")?;
        if let Some(min) = self.min_planets {
            write!(f, " at least {min} planets")?;
        }
        if let Some(max) = self.max_distance {
            write!(f, " within {max:.1}ly of center")?;
        }
        if let Some(theme) = &self.theme {
            write!(f, " theme {theme}")?;
        }
        if self.must_be_uninhabited {
            write!(f, " uninhabited")?;
        }
        for req in &self.planet_requirements {
            write!(f, " {req}")?;
        }
        write!(f, ">")
    }
}

/// Order systems nearest to the map center first.
pub fn rank_by_distance(systems: &mut [&StarSystem]) {
    systems.sort_by(|a, b| a.dist().total_cmp(&b.dist()));
}
