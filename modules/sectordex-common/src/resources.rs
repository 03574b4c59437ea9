//! Resource families and their ordered abundance tiers.
//!
//! Every resource condition belongs to exactly one family. Within a family the
//! levels are listed worst to best; the tier of a level is its index minus one,
//! so the first level of every family sits at tier -1.

use serde::{Deserialize, Serialize};

const ORE_LEVELS: &[&str] = &[
    "ore_sparse",
    "ore_moderate",
    "ore_abundant",
    "ore_rich",
    "ore_ultrarich",
];
const RARE_ORE_LEVELS: &[&str] = &[
    "rare_ore_sparse",
    "rare_ore_moderate",
    "rare_ore_abundant",
    "rare_ore_rich",
    "rare_ore_ultrarich",
];
const FARMLAND_LEVELS: &[&str] = &[
    "farmland_poor",
    "farmland_adequate",
    "farmland_rich",
    "farmland_bountiful",
];
const ORGANICS_LEVELS: &[&str] = &[
    "organics_trace",
    "organics_common",
    "organics_abundant",
    "organics_plentiful",
];
const VOLATILES_LEVELS: &[&str] = &[
    "volatiles_trace",
    "volatiles_diffuse",
    "volatiles_abundant",
    "volatiles_plentiful",
];
const RUINS_LEVELS: &[&str] = &[
    "ruins_scattered",
    "ruins_widespread",
    "ruins_extensive",
    "ruins_vast",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    Ore,
    RareOre,
    Farmland,
    Organics,
    Volatiles,
    Ruins,
}

impl ResourceFamily {
    pub const ALL: [ResourceFamily; 6] = [
        ResourceFamily::Ore,
        ResourceFamily::RareOre,
        ResourceFamily::Farmland,
        ResourceFamily::Organics,
        ResourceFamily::Volatiles,
        ResourceFamily::Ruins,
    ];

    /// Condition ids of this family, worst level first.
    pub fn levels(self) -> &'static [&'static str] {
        match self {
            ResourceFamily::Ore => ORE_LEVELS,
            ResourceFamily::RareOre => RARE_ORE_LEVELS,
            ResourceFamily::Farmland => FARMLAND_LEVELS,
            ResourceFamily::Organics => ORGANICS_LEVELS,
            ResourceFamily::Volatiles => VOLATILES_LEVELS,
            ResourceFamily::Ruins => RUINS_LEVELS,
        }
    }

    /// The family a condition id belongs to, if it is a resource at all.
    pub fn of(condition_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.levels().contains(&condition_id))
    }

    /// The given level and every better level of the same family.
    pub fn at_least(condition_id: &str) -> Option<&'static [&'static str]> {
        let levels = Self::of(condition_id)?.levels();
        let index = levels.iter().position(|level| *level == condition_id)?;
        Some(&levels[index..])
    }

    /// Short label used when printing a level, e.g. `ore_rich` -> `rich`.
    pub fn level_label(self, condition_id: &str) -> Option<&str> {
        condition_id.strip_prefix(self.prefix())
    }

    fn prefix(self) -> &'static str {
        match self {
            ResourceFamily::Ore => "ore_",
            ResourceFamily::RareOre => "rare_ore_",
            ResourceFamily::Farmland => "farmland_",
            ResourceFamily::Organics => "organics_",
            ResourceFamily::Volatiles => "volatiles_",
            ResourceFamily::Ruins => "ruins_",
        }
    }
}

impl std::fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceFamily::Ore => write!(f, "ore"),
            ResourceFamily::RareOre => write!(f, "rare ore"),
            ResourceFamily::Farmland => write!(f, "farmland"),
            ResourceFamily::Organics => write!(f, "organics"),
            ResourceFamily::Volatiles => write!(f, "volatiles"),
            ResourceFamily::Ruins => write!(f, "ruins"),
        }
    }
}

/// Built-in tier of a resource condition: -1 for the worst level of a family,
/// rising by one per level.
pub fn resource_tier(condition_id: &str) -> Option<i8> {
    let levels = ResourceFamily::of(condition_id)?.levels();
    levels
        .iter()
        .position(|level| *level == condition_id)
        .map(|index| index as i8 - 1)
}
