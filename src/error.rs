use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmilError {
    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Entry {entry} has no {kind} reference")]
    MissingReference { entry: String, kind: &'static str },

    #[error("Malformed reference '{0}'")]
    MalformedReference(String),

    #[error("Referenced file could not be resolved: {0}")]
    UnresolvablePath(String),

    #[error("Fragment '{fragment}' not found in {file}")]
    MissingFragment { file: String, fragment: String },

    #[error("Invalid clip time '{0}'")]
    MalformedTime(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SmilError>;
