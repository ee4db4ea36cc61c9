use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrgPulseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown scenario: {name}. Available scenarios: {available}")]
    UnknownScenario { name: String, available: String },
}

impl From<serde_json::Error> for OrgPulseError {
    fn from(e: serde_json::Error) -> Self {
        OrgPulseError::Serialize(e.to_string())
    }
}
