#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid attributes for {block}: {source}")]
    Attributes {
        block: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown block type: {0}")]
    UnknownBlock(String),
    #[error("Expected {expected} block, found {found}")]
    UnexpectedBlock {
        expected: &'static str,
        found: String,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
