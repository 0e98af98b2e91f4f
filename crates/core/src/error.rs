use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeepreadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty document: {0}")]
    EmptyDocument(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Other(String),
}
