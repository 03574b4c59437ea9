use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Relaxed JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, found: {0}")]
    NotAnObject(String),
}
