//! Populates [`LookupTables`] from an installed game and its mods.
//!
//! The base game is read first, then every mod folder in name order, so a mod
//! redefining an id overrides the base game. Missing files are normal (most
//! mods ship only some of them). Unreadable files and rows are logged and left
//! out of the tables.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use sectordex_common::{relaxed_json, LookupTables};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

const CORE_DIR: &str = "starsector-core";
const MODS_DIR: &str = "mods";

const CONDITION_GEN_CSV: &str = "data/campaign/procgen/condition_gen_data.csv";
const MARKET_CONDITIONS_CSV: &str = "data/campaign/market_conditions.csv";
const PLANETS_JSON: &str = "data/config/planets.json";
const FACTIONS_CSV: &str = "data/world/factions/factions.csv";

const POPULATION_PREFIX: &str = "population";

/// What a call to [`load_into`] managed to read.
#[derive(Debug, Default)]
pub struct GameDataReport {
    pub game_dir: PathBuf,
    pub files_read: usize,
    /// Files that existed but could not be read or parsed.
    pub failures: Vec<IngestError>,
}

impl GameDataReport {
    fn record<T>(&mut self, outcome: Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.files_read += 1;
                Some(value)
            }
            Err(err) => {
                warn!(error = %err, "Skipping unreadable game data file");
                self.failures.push(err);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct HazardRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    hazard: String,
}

#[derive(Debug, Deserialize)]
struct ConditionRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FactionRow {
    #[serde(default)]
    faction: String,
}

#[derive(Debug, Deserialize)]
struct FactionFile {
    id: String,
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct PlanetTypeEntry {
    name: Option<String>,
}

/// Directories holding game data: the base game, then each mod.
pub fn data_roots(game_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![game_dir.join(CORE_DIR)];

    let mut mods: Vec<PathBuf> = match fs::read_dir(game_dir.join(MODS_DIR)) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect(),
        Err(_) => Vec::new(),
    };
    mods.sort();
    roots.extend(mods);
    roots
}

/// Read every lookup table source under `game_dir` into `tables`.
pub fn load_into(tables: &mut LookupTables, game_dir: &Path) -> GameDataReport {
    let mut report = GameDataReport {
        game_dir: game_dir.to_path_buf(),
        ..Default::default()
    };

    for root in data_roots(game_dir) {
        debug!(root = %root.display(), "Reading game data");

        let path = root.join(CONDITION_GEN_CSV);
        if path.is_file() {
            if let Some(rows) = report.record(read_csv::<HazardRow>(&path)) {
                load_hazards(tables, rows);
            }
        }

        let path = root.join(MARKET_CONDITIONS_CSV);
        if path.is_file() {
            if let Some(rows) = report.record(read_csv::<ConditionRow>(&path)) {
                load_condition_names(tables, rows);
            }
        }

        let path = root.join(PLANETS_JSON);
        if path.is_file() {
            if let Some(types) = report.record(read_planet_types(&path)) {
                for (type_id, name) in types {
                    tables.insert_type_name(type_id, name);
                }
            }
        }

        let path = root.join(FACTIONS_CSV);
        if path.is_file() {
            if let Some(rows) = report.record(read_csv::<FactionRow>(&path)) {
                load_factions(tables, &path, rows, &mut report);
            }
        }
    }

    let (hazards, conditions, factions, types) = tables.counts();
    info!(
        game_dir = %game_dir.display(),
        files = report.files_read,
        failures = report.failures.len(),
        hazards,
        conditions,
        factions,
        types,
        "Loaded installed faction and planet data"
    );
    report
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => debug!(path = %path.display(), line, error = %err, "Skipping CSV row"),
        }
    }
    Ok(rows)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_hazards(tables: &mut LookupTables, rows: Vec<HazardRow>) {
    for row in rows {
        if row.id.is_empty() || row.hazard.is_empty() {
            continue;
        }
        match row.hazard.parse::<f64>() {
            Ok(hazard) => tables.insert_hazard(row.id, hazard),
            Err(_) => debug!(id = %row.id, hazard = %row.hazard, "Ignoring unparsable hazard"),
        }
    }
}

fn load_condition_names(tables: &mut LookupTables, rows: Vec<ConditionRow>) {
    for row in rows {
        if row.id.is_empty() || row.name.is_empty() {
            continue;
        }
        let name = condition_display_name(&row.id, &row.name);
        tables.insert_condition_name(row.id, name);
    }
}

/// Population conditions all share one display name; the size suffix of the
/// id tells them apart.
fn condition_display_name(id: &str, name: &str) -> String {
    if !id.starts_with(POPULATION_PREFIX) {
        return name.to_string();
    }
    let suffix = id.strip_prefix("population_").unwrap_or(id);
    format!("{name} {suffix}")
}

fn read_planet_types(path: &Path) -> Result<Vec<(String, String)>> {
    let text = read_text(path)?;
    let entries: HashMap<String, PlanetTypeEntry> = relaxed_json::parse(&text)?;
    let mut types: Vec<(String, String)> = entries
        .into_iter()
        .filter_map(|(type_id, entry)| entry.name.map(|name| (type_id, name)))
        .collect();
    types.sort();
    Ok(types)
}

/// Each row of `factions.csv` names a faction file; only its file name is
/// used, looked up next to the CSV.
fn load_factions(
    tables: &mut LookupTables,
    csv_path: &Path,
    rows: Vec<FactionRow>,
    report: &mut GameDataReport,
) {
    let Some(dir) = csv_path.parent() else {
        return;
    };
    for row in rows {
        let Some(file_name) = row.faction.rsplit('/').next().filter(|f| !f.is_empty()) else {
            continue;
        };
        let path = dir.join(file_name);
        if !path.is_file() {
            debug!(path = %path.display(), "Faction file not found");
            continue;
        }
        if let Some(faction) = report.record(read_faction(&path)) {
            tables.insert_faction_name(faction.id, faction.display_name);
        }
    }
}

fn read_faction(path: &Path) -> Result<FactionFile> {
    let text = read_text(path)?;
    Ok(relaxed_json::parse(&text)?)
}
