//! Requirement model and matcher: which star systems satisfy a query.

pub mod error;
pub mod planet;
pub mod system;

pub use error::{QueryError, Result};
pub use planet::{PlanetRequirement, PlanetRequirementBuilder, ResourceThreshold};
pub use system::{rank_by_distance, SystemRequirement};
