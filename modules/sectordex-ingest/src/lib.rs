//! Save-file ingestion: reads a campaign save into a [`Sector`] catalog.

pub mod entity;
pub mod error;
pub mod extract;
pub mod game_data;
pub mod sector;
pub mod session;

pub use entity::EntityKind;
pub use error::{IngestError, LookupTable, Result};
pub use extract::{extract_file, extract_str, Extraction};
pub use game_data::GameDataReport;
pub use sector::{HazardRange, Sector};
pub use session::Session;
