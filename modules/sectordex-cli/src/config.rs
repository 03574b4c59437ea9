use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the game installation directory.
pub const GAME_DIR_ENV: &str = "SECTORDEX_GAME_DIR";

const DEFAULT_LIMIT: usize = 20;

/// TOML-backed defaults. Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub game: GameConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Game installation directory holding `starsector-core` and `mods`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub limit: Option<usize>,
    pub details: Option<bool>,
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Values given on the command line, which win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub game_dir: Option<PathBuf>,
    pub limit: Option<usize>,
    pub details: bool,
}

/// Effective settings after layering flags, environment and config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` derives the game directory from the save path.
    pub game_dir: Option<PathBuf>,
    pub limit: usize,
    pub details: bool,
}

impl Settings {
    pub fn from_env(file: FileConfig, overrides: Overrides) -> Self {
        let env_game_dir = env::var_os(GAME_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve(file, overrides, env_game_dir)
    }

    /// Flags beat the environment, which beats the config file.
    pub fn resolve(file: FileConfig, overrides: Overrides, env_game_dir: Option<PathBuf>) -> Self {
        Self {
            game_dir: overrides.game_dir.or(env_game_dir).or(file.game.dir),
            limit: overrides
                .limit
                .or(file.output.limit)
                .unwrap_or(DEFAULT_LIMIT),
            details: overrides.details || file.output.details.unwrap_or(false),
        }
    }
}
