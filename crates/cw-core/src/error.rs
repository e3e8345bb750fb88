use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostwiseError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("No model configured for complexity level: {0}")]
    MissingModel(String),
    #[error("Context of {requested} tokens exceeds every model window (largest: {largest})")]
    ContextTooLarge { requested: usize, largest: usize },
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CostwiseError>;
