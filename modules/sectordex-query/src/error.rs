use uuid::Uuid;

/// Result type alias for query construction.
pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Unknown resource family for condition: {0}")]
    UnknownResourceFamily(String),

    #[error("Maximum hazard must be a number, got {0}")]
    InvalidHazard(f64),

    #[error("No planet requirement with id {0}")]
    UnknownPlanetRequirement(Uuid),
}
