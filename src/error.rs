use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobscopeError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("API error {status} persisted after {retries} retries")]
    ApiAfterRetries { status: u16, retries: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown push id {0}")]
    PushNotFound(u64),
}

pub type Result<T> = std::result::Result<T, JobscopeError>;
