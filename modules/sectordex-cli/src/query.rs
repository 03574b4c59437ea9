//! Query descriptions read from TOML files and `--planet` flags.
//!
//! Names are resolved against the loaded sector, so a query can say `Terran`
//! or `terran` and `No Atmosphere` or `no_atmosphere`. Resource thresholds
//! are always condition ids such as `ore_moderate`.

use std::path::Path;
use std::str::FromStr;

use sectordex_ingest::Sector;
use sectordex_query::{PlanetRequirement, QueryError, SystemRequirement};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum QuerySpecError {
    #[error("Unknown planet type: {0}")]
    UnknownPlanetType(String),

    #[error("Unknown planet condition: {0}")]
    UnknownCondition(String),

    #[error("No system in this save has theme {0}")]
    UnknownTheme(String),

    #[error("Invalid planet requirement {spec:?}: {reason}")]
    InvalidPlanetSpec { spec: String, reason: String },

    #[error("Cannot read query file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse query file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// One planet requirement, before names are resolved.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanetSpec {
    pub types: Vec<String>,
    pub conditions: Vec<String>,
    pub resources: Vec<String>,
    pub max_hazard: Option<f64>,
    pub exclusive_types: bool,
    pub exclusive_conditions: bool,
}

/// A whole system query, as written in a query file.
///
/// ```toml
/// max_distance = 25.0
/// uninhabited = true
///
/// [[planet]]
/// types = ["Terran", "Jungle"]
/// resources = ["farmland_rich"]
/// max_hazard = 1.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySpec {
    pub max_distance: Option<f64>,
    pub min_planets: Option<usize>,
    pub uninhabited: bool,
    pub theme: Option<String>,
    #[serde(rename = "planet")]
    pub planets: Vec<PlanetSpec>,
}

impl QuerySpec {
    pub fn from_toml(text: &str) -> Result<Self, QuerySpecError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, QuerySpecError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Turn the description into a requirement over `sector`.
    pub fn build(&self, sector: &Sector) -> Result<SystemRequirement, QuerySpecError> {
        let mut requirement = SystemRequirement::new().uninhabited(self.uninhabited);
        if let Some(max) = self.max_distance {
            requirement = requirement.with_max_distance(max);
        }
        if let Some(min) = self.min_planets {
            requirement = requirement.with_min_planets(min);
        }
        if let Some(theme) = &self.theme {
            if !sector.themes().contains(theme) {
                return Err(QuerySpecError::UnknownTheme(theme.clone()));
            }
            requirement = requirement.with_theme(theme.clone());
        }
        for planet in &self.planets {
            requirement = requirement.with_planet(planet.build(sector)?);
        }
        Ok(requirement)
    }
}

impl PlanetSpec {
    pub fn build(&self, sector: &Sector) -> Result<PlanetRequirement, QuerySpecError> {
        let types = self
            .types
            .iter()
            .map(|key| {
                sector
                    .planet_type(key)
                    .cloned()
                    .ok_or_else(|| QuerySpecError::UnknownPlanetType(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let conditions = self
            .conditions
            .iter()
            .map(|key| {
                sector
                    .condition(key)
                    .cloned()
                    .ok_or_else(|| QuerySpecError::UnknownCondition(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = PlanetRequirement::builder()
            .with_types(types)
            .with_conditions(conditions)
            .exclusive_types(self.exclusive_types)
            .exclusive_conditions(self.exclusive_conditions);
        for resource in &self.resources {
            builder = builder.with_min_resource(resource.clone());
        }
        if let Some(max) = self.max_hazard {
            builder = builder.with_max_hazard(max);
        }
        Ok(builder.build()?)
    }
}

/// Parses the `--planet` flag: `;`-separated `key=value` pairs and bare
/// switches, e.g. `types=terran,jungle;max-hazard=1.5;exclusive-conditions`.
impl FromStr for PlanetSpec {
    type Err = QuerySpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| QuerySpecError::InvalidPlanetSpec {
            spec: s.to_string(),
            reason,
        };
        let list = |value: &str| -> Vec<String> {
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut spec = PlanetSpec::default();
        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (part, None),
            };
            match (key.replace('_', "-").as_str(), value) {
                ("types", Some(v)) => spec.types.extend(list(v)),
                ("conditions", Some(v)) => spec.conditions.extend(list(v)),
                ("resources", Some(v)) => spec.resources.extend(list(v)),
                ("max-hazard", Some(v)) => {
                    let max = v
                        .parse::<f64>()
                        .map_err(|_| invalid(format!("max-hazard {v:?} is not a number")))?;
                    spec.max_hazard = Some(max);
                }
                ("exclusive-types", None) => spec.exclusive_types = true,
                ("exclusive-conditions", None) => spec.exclusive_conditions = true,
                (other, _) => return Err(invalid(format!("unexpected {other:?}"))),
            }
        }
        Ok(spec)
    }
}
