//! Command-line front end: configuration layering, query descriptions and
//! text reports over a loaded sector.

pub mod config;
pub mod query;
pub mod report;

pub use config::{FileConfig, Overrides, Settings};
pub use query::{PlanetSpec, QuerySpec, QuerySpecError};
