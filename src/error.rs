#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error("index {index} out of range, len {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("config: {0}")]
    Config(String),
    #[error("engine: {0}")]
    Engine(String),
    #[error("generic: {0}")]
    Generic(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

