use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service returned status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Unexpected payload from remote service: {message}")]
    UnexpectedPayload { message: String },

    #[error("No connection to the remote service: {reason}")]
    NotConnected { reason: String },

    #[error("Invalid table name: '{name}'")]
    InvalidTableName { name: String },

    #[error("HTTP server error: {0}")]
    Server(#[from] hyper::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl GatewayError {
    /// Errors that come from the remote service itself rather than from
    /// local state or configuration.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            GatewayError::Http(_)
                | GatewayError::RemoteStatus { .. }
                | GatewayError::UnexpectedPayload { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
