//! Read-only lookups into the auxiliary game data.

use std::collections::HashMap;

use crate::resources;
use crate::types::Condition;

/// Key-value lookups the extraction engine needs. Implementations are filled
/// once before the first load and only read afterwards.
pub trait Lookup {
    /// Additive hazard contribution of a condition.
    fn hazard(&self, condition_id: &str) -> Option<f64>;

    fn condition_name(&self, condition_id: &str) -> Option<&str>;

    fn faction_name(&self, faction_id: &str) -> Option<&str>;

    /// Display name of a planet or star type.
    fn type_name(&self, type_id: &str) -> Option<&str>;

    /// True when nothing has been loaded into the tables.
    fn is_empty(&self) -> bool;

    fn resource_tier(&self, condition_id: &str) -> Option<i8> {
        resources::resource_tier(condition_id)
    }

    /// Build a [`Condition`] from its raw id. `None` when the id has no
    /// display name.
    fn condition(&self, condition_id: &str) -> Option<Condition> {
        let name = self.condition_name(condition_id)?;
        Some(
            Condition::new(condition_id, name)
                .with_hazard(self.hazard(condition_id))
                .with_resource_tier(self.resource_tier(condition_id)),
        )
    }
}

/// In-memory lookup tables.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    hazards: HashMap<String, f64>,
    condition_names: HashMap<String, String>,
    faction_names: HashMap<String, String>,
    type_names: HashMap<String, String>,
}

impl LookupTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_hazard(&mut self, condition_id: impl Into<String>, hazard: f64) {
        self.hazards.insert(condition_id.into(), hazard);
    }

    pub fn insert_condition_name(
        &mut self,
        condition_id: impl Into<String>,
        name: impl Into<String>,
    ) {
        self.condition_names.insert(condition_id.into(), name.into());
    }

    pub fn insert_faction_name(&mut self, faction_id: impl Into<String>, name: impl Into<String>) {
        self.faction_names.insert(faction_id.into(), name.into());
    }

    pub fn insert_type_name(&mut self, type_id: impl Into<String>, name: impl Into<String>) {
        self.type_names.insert(type_id.into(), name.into());
    }

    /// Entry counts as (hazards, condition names, faction names, type names).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.hazards.len(),
            self.condition_names.len(),
            self.faction_names.len(),
            self.type_names.len(),
        )
    }
}

impl Lookup for LookupTables {
    fn hazard(&self, condition_id: &str) -> Option<f64> {
        self.hazards.get(condition_id).copied()
    }

    fn condition_name(&self, condition_id: &str) -> Option<&str> {
        self.condition_names.get(condition_id).map(String::as_str)
    }

    fn faction_name(&self, faction_id: &str) -> Option<&str> {
        self.faction_names.get(faction_id).map(String::as_str)
    }

    fn type_name(&self, type_id: &str) -> Option<&str> {
        self.type_names.get(type_id).map(String::as_str)
    }

    fn is_empty(&self) -> bool {
        self.hazards.is_empty()
            && self.condition_names.is_empty()
            && self.faction_names.is_empty()
            && self.type_names.is_empty()
    }
}
