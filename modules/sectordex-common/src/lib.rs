pub mod error;
pub mod lookup;
pub mod relaxed_json;
pub mod resources;
pub mod types;

pub use error::CommonError;
pub use lookup::{Lookup, LookupTables};
pub use resources::ResourceFamily;
pub use types::*;
