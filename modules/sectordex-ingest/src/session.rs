use std::path::{Path, PathBuf};

use sectordex_common::{Lookup, LookupTables};
use tracing::info;

use crate::error::{IngestError, Result};
use crate::game_data::{self, GameDataReport};
use crate::sector::{HazardRange, Sector};

/// Long-lived loader state shared by every sector load.
///
/// Holds the lookup tables, which are filled from the game directory at most
/// once, and the hazard range, which only ever widens across loads.
#[derive(Debug, Default)]
pub struct Session {
    lookups: LookupTables,
    lookups_populated: bool,
    game_dir: Option<PathBuf>,
    hazard_range: Option<HazardRange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read game data from `game_dir` instead of deriving it from the save path.
    pub fn with_game_dir(mut self, game_dir: impl Into<PathBuf>) -> Self {
        self.game_dir = Some(game_dir.into());
        self
    }

    /// Use pre-filled tables; the game directory is never read.
    pub fn with_lookups(mut self, lookups: LookupTables) -> Self {
        self.lookups = lookups;
        self.lookups_populated = true;
        self
    }

    pub fn lookups(&self) -> &LookupTables {
        &self.lookups
    }

    pub fn lookups_populated(&self) -> bool {
        self.lookups_populated
    }

    pub fn game_dir(&self) -> Option<&Path> {
        self.game_dir.as_deref()
    }

    pub fn hazard_range(&self) -> Option<HazardRange> {
        self.hazard_range
    }

    pub(crate) fn widen_hazard_range(&mut self, hazard: f64) {
        match &mut self.hazard_range {
            Some(range) => range.widen(hazard),
            None => self.hazard_range = Some(HazardRange::new(hazard)),
        }
    }

    /// Load the save at `path` into a new sector.
    pub fn load(&mut self, path: &Path) -> Result<Sector> {
        let mut sector = Sector::new();
        sector.load(self, path)?;
        Ok(sector)
    }

    /// Fill the lookup tables on first use. Fails while they are still empty,
    /// leaving a later call free to retry.
    pub(crate) fn ensure_lookups(&mut self, save_path: &Path) -> Result<()> {
        if !self.lookups_populated {
            let game_dir = self
                .game_dir
                .clone()
                .unwrap_or_else(|| default_game_dir(save_path));
            let report = self.populate(&game_dir);
            if !self.lookups.is_empty() {
                self.lookups_populated = true;
            } else {
                return Err(IngestError::MissingLookupTables {
                    searched: report.game_dir.display().to_string(),
                });
            }
        }

        if self.lookups.is_empty() {
            return Err(IngestError::MissingLookupTables {
                searched: "pre-filled tables".to_string(),
            });
        }
        Ok(())
    }

    fn populate(&mut self, game_dir: &Path) -> GameDataReport {
        info!(game_dir = %game_dir.display(), "Populating lookup tables");
        game_data::load_into(&mut self.lookups, game_dir)
    }
}

/// Saves live at `<game>/saves/<save>/campaign.xml`. Short relative paths
/// climb out through `..`.
pub fn default_game_dir(save_path: &Path) -> PathBuf {
    let save_dir = save_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match save_dir.ancestors().nth(2) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => save_dir.join("..").join(".."),
    }
}
