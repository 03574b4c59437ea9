use std::path::PathBuf;

use sectordex_common::CommonError;

/// Result type alias for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Which lookup table a missing key was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    ConditionName,
    TypeName,
}

impl std::fmt::Display for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupTable::ConditionName => write!(f, "condition"),
            LookupTable::TypeName => write!(f, "planet type"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Save is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Malformed save document: {0}")]
    MalformedDocument(String),

    #[error("No game data loaded into the lookup tables (searched: {searched})")]
    MissingLookupTables { searched: String },

    #[error("System {0} is listed in the save index but was never found")]
    UnresolvedReference(String),

    #[error("Unknown {table} id {key:?} on {entity}")]
    UnknownLookupKey {
        table: LookupTable,
        key: String,
        entity: String,
    },

    #[error("Malformed entity {id}: {reason}")]
    MalformedEntity { id: String, reason: String },

    #[error("Cannot read game data {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl IngestError {
    /// Whether this error aborts a whole load, as opposed to skipping a
    /// single system, planet or entity.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            IngestError::UnresolvedReference(_)
                | IngestError::UnknownLookupKey { .. }
                | IngestError::MalformedEntity { .. }
        )
    }
}
