//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Container element not found: #{0}")]
    MissingContainer(String),

    #[error("Editor is already mounted")]
    AlreadyMounted,

    #[error("Editor is not mounted")]
    NotMounted,

    #[error("Editor is busy applying another change")]
    Busy,

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
