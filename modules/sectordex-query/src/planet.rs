use std::collections::BTreeSet;

use sectordex_common::{Condition, Planet, PlanetType, ResourceFamily};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{QueryError, Result};

/// Minimum abundance of one resource family. Any level at or above the
/// threshold satisfies it, so asking for moderate ore also accepts abundant,
/// rich and ultrarich ore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceThreshold {
    condition_id: String,
    family: ResourceFamily,
    acceptable: &'static [&'static str],
}

impl ResourceThreshold {
    pub fn new(condition_id: impl Into<String>) -> Result<Self> {
        let condition_id = condition_id.into();
        let family = ResourceFamily::of(&condition_id)
            .ok_or_else(|| QueryError::UnknownResourceFamily(condition_id.clone()))?;
        let acceptable = ResourceFamily::at_least(&condition_id)
            .ok_or_else(|| QueryError::UnknownResourceFamily(condition_id.clone()))?;
        Ok(Self {
            condition_id,
            family,
            acceptable,
        })
    }

    pub fn condition_id(&self) -> &str {
        &self.condition_id
    }

    pub fn family(&self) -> ResourceFamily {
        self.family
    }

    /// The threshold level followed by every better level.
    pub fn acceptable(&self) -> &[&'static str] {
        self.acceptable
    }

    pub fn is_met_by(&self, planet: &Planet) -> bool {
        self.acceptable.iter().any(|level| planet.has_resource(level))
    }
}

/// What a single planet must look like.
///
/// Requirements are never edited in place. To change one, rebuild it with
/// [`PlanetRequirement::to_builder`] and swap it into its list by id.
#[derive(Debug, Clone, Serialize)]
pub struct PlanetRequirement {
    id: Uuid,
    types: BTreeSet<PlanetType>,
    conditions: BTreeSet<Condition>,
    resources: Vec<ResourceThreshold>,
    max_hazard: Option<f64>,
    exclusive_types: bool,
    exclusive_conditions: bool,
}

impl PartialEq for PlanetRequirement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlanetRequirement {}

impl PlanetRequirement {
    pub fn builder() -> PlanetRequirementBuilder {
        PlanetRequirementBuilder::default()
    }

    /// A requirement that every planet satisfies.
    pub fn any() -> Self {
        Self {
            id: Uuid::new_v4(),
            types: BTreeSet::new(),
            conditions: BTreeSet::new(),
            resources: Vec::new(),
            max_hazard: None,
            exclusive_types: false,
            exclusive_conditions: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn types(&self) -> &BTreeSet<PlanetType> {
        &self.types
    }

    pub fn conditions(&self) -> &BTreeSet<Condition> {
        &self.conditions
    }

    pub fn resources(&self) -> &[ResourceThreshold] {
        &self.resources
    }

    pub fn max_hazard(&self) -> Option<f64> {
        self.max_hazard
    }

    pub fn exclusive_types(&self) -> bool {
        self.exclusive_types
    }

    pub fn exclusive_conditions(&self) -> bool {
        self.exclusive_conditions
    }

    pub fn is_unconstrained(&self) -> bool {
        self.types.is_empty()
            && self.conditions.is_empty()
            && self.resources.is_empty()
            && self.max_hazard.is_none()
    }

    /// Start a builder holding this requirement's criteria. The built
    /// requirement gets a fresh id.
    pub fn to_builder(&self) -> PlanetRequirementBuilder {
        PlanetRequirementBuilder {
            types: self.types.clone(),
            conditions: self.conditions.clone(),
            resources: self
                .resources
                .iter()
                .map(|r| r.condition_id.clone())
                .collect(),
            max_hazard: self.max_hazard,
            exclusive_types: self.exclusive_types,
            exclusive_conditions: self.exclusive_conditions,
        }
    }

    pub fn check(&self, planet: &Planet) -> bool {
        self.check_type(planet)
            && self.check_conditions(planet)
            && self.check_hazard(planet)
            && self.check_resources(planet)
    }

    fn check_type(&self, planet: &Planet) -> bool {
        if self.types.is_empty() {
            return true;
        }
        self.types.contains(planet.planet_type()) != self.exclusive_types
    }

    // One mode applies to every desired condition: all present, or all absent.
    fn check_conditions(&self, planet: &Planet) -> bool {
        self.conditions
            .iter()
            .all(|condition| planet.has_condition(condition) != self.exclusive_conditions)
    }

    fn check_hazard(&self, planet: &Planet) -> bool {
        self.max_hazard.map_or(true, |max| planet.hazard() <= max)
    }

    fn check_resources(&self, planet: &Planet) -> bool {
        self.resources.iter().all(|threshold| threshold.is_met_by(planet))
    }
}

impl std::fmt::Display for PlanetRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.types.is_empty() {
            let prefix = if self.exclusive_types { "none" } else { "one" };
            parts.push(format!("{prefix} of {} types", self.types.len()));
        }
        if !self.conditions.is_empty() {
            let mode = if self.exclusive_conditions {
                "excl."
            } else {
                "req."
            };
            parts.push(format!("{} {mode} conditions", self.conditions.len()));
        }
        if let Some(max) = self.max_hazard {
            parts.push(format!("hazard =< {:.0}%", max * 100.0));
        }
        if !self.resources.is_empty() {
            let levels: Vec<String> = self
                .resources
                .iter()
                .map(|r| match r.family().level_label(r.condition_id()) {
                    Some(level) => format!("{} {level}+", r.family()),
                    None => r.condition_id().to_string(),
                })
                .collect();
            parts.push(levels.join("/"));
        }
        if parts.is_empty() {
            write!(f, "> planet: no requirements")
        } else {
            write!(f, "> planet: {}", parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanetRequirementBuilder {
    types: BTreeSet<PlanetType>,
    conditions: BTreeSet<Condition>,
    resources: Vec<String>,
    max_hazard: Option<f64>,
    exclusive_types: bool,
    exclusive_conditions: bool,
}

impl PlanetRequirementBuilder {
    pub fn with_types(mut self, types: impl IntoIterator<Item = PlanetType>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Require at least this resource level, given as a condition id such as
    /// `ore_moderate`.
    pub fn with_min_resource(mut self, condition_id: impl Into<String>) -> Self {
        self.resources.push(condition_id.into());
        self
    }

    pub fn with_max_hazard(mut self, max_hazard: f64) -> Self {
        self.max_hazard = Some(max_hazard);
        self
    }

    pub fn without_max_hazard(mut self) -> Self {
        self.max_hazard = None;
        self
    }

    pub fn exclusive_types(mut self, exclusive: bool) -> Self {
        self.exclusive_types = exclusive;
        self
    }

    pub fn exclusive_conditions(mut self, exclusive: bool) -> Self {
        self.exclusive_conditions = exclusive;
        self
    }

    pub fn build(self) -> Result<PlanetRequirement> {
        if let Some(max) = self.max_hazard {
            if max.is_nan() {
                return Err(QueryError::InvalidHazard(max));
            }
        }

        let mut resources: Vec<ResourceThreshold> = Vec::with_capacity(self.resources.len());
        for id in self.resources {
            let threshold = ResourceThreshold::new(id)?;
            if !resources.contains(&threshold) {
                resources.push(threshold);
            }
        }

        Ok(PlanetRequirement {
            id: Uuid::new_v4(),
            types: self.types,
            conditions: self.conditions,
            resources,
            max_hazard: self.max_hazard,
            exclusive_types: self.exclusive_types,
            exclusive_conditions: self.exclusive_conditions,
        })
    }
}
