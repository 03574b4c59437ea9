//! Shared fixtures for ingestion tests.
//!
//! `fixtures/game` is laid out like an installed game: base data under
//! `starsector-core`, one mod under `mods`, and a save under `saves`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sectordex_common::LookupTables;

pub fn fixture_game_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("game")
}

pub fn fixture_save() -> PathBuf {
    fixture_game_dir()
        .join("saves")
        .join("save_corvus")
        .join("campaign.xml")
}

pub fn fixture_save_text() -> String {
    std::fs::read_to_string(fixture_save())
        .unwrap_or_else(|e| panic!("Failed to read fixture save: {e}"))
}

/// The tables the fixture game directory produces, filled by hand.
pub fn fixture_lookups() -> LookupTables {
    let mut tables = LookupTables::new();
    for (id, hazard) in [
        ("volcanic", 0.25),
        ("no_atmosphere", 0.5),
        ("habitable", -0.25),
        ("ruins_widespread", 0.0),
    ] {
        tables.insert_hazard(id, hazard);
    }
    for (id, name) in [
        ("ore_abundant", "Abundant Ore"),
        ("volcanic", "Volcanic"),
        ("no_atmosphere", "No Atmosphere"),
        ("habitable", "Habitable"),
        ("farmland_rich", "Rich Farmland"),
        ("population_6", "Population 6"),
        ("ruins_widespread", "Widespread Ruins"),
    ] {
        tables.insert_condition_name(id, name);
    }
    for (id, name) in [
        ("lava", "Lava"),
        ("terran", "Terran"),
        ("barren", "Barren"),
        ("star_yellow", "Yellow Star"),
        ("star_red", "Red Giant"),
    ] {
        tables.insert_type_name(id, name);
    }
    tables.insert_faction_name("hegemony", "Hegemony");
    tables
}

/// Write `xml` as a save inside a fresh directory with no game data.
pub fn write_bare_save(dir: &Path, xml: &str) -> PathBuf {
    let path = dir.join("campaign.xml");
    std::fs::write(&path, xml).unwrap_or_else(|e| panic!("Failed to write save: {e}"));
    path
}
