use reqwest::StatusCode;
use thiserror::Error;

/// Why a single HTTP exchange with the tado API failed.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl RequestFailure {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            RequestFailure::Timeout(timeout_secs)
        } else if err.is_decode() {
            RequestFailure::Decode(err.to_string())
        } else {
            RequestFailure::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum TadoError {
    #[error("Authentication failed: {0}")]
    Auth(#[source] RequestFailure),

    #[error("API request failed: {0}")]
    Api(#[source] RequestFailure),

    #[error("{kind} index {index} is out of range ({len} available)")]
    Index {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Home,
    Zone,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Home => f.write_str("home"),
            IndexKind::Zone => f.write_str("zone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Input,
    Configuration,
    System,
}

impl TadoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TadoError::Auth(_) => ErrorCategory::Authentication,
            TadoError::Api(_) => ErrorCategory::Network,
            TadoError::Index { .. } => ErrorCategory::Input,
            TadoError::Config { .. }
            | TadoError::InvalidConfigValue { .. }
            | TadoError::Toml(_) => ErrorCategory::Configuration,
            TadoError::Io(_) | TadoError::Serialization(_) => ErrorCategory::System,
        }
    }

    /// True when the underlying request hit the fixed request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TadoError::Auth(RequestFailure::Timeout(_)) | TadoError::Api(RequestFailure::Timeout(_))
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TadoError::Auth(RequestFailure::Timeout(_)) => {
                "The tado login service did not answer in time".to_string()
            }
            TadoError::Auth(_) => "Could not log in to tado".to_string(),
            TadoError::Api(RequestFailure::Timeout(_)) => {
                "The tado API did not answer in time".to_string()
            }
            TadoError::Api(_) => "The tado API request failed".to_string(),
            TadoError::Index { kind, index, len } => {
                format!("There is no {} #{} (only {} found)", kind, index, len)
            }
            TadoError::Config { .. }
            | TadoError::InvalidConfigValue { .. }
            | TadoError::Toml(_) => format!("Configuration problem: {}", self),
            TadoError::Io(e) => format!("File access failed: {}", e),
            TadoError::Serialization(e) => format!("Could not encode output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Authentication => "Check the username and password of your tado account",
            ErrorCategory::Network => "Check your network connection and try again later",
            ErrorCategory::Input => "List homes and zones first to pick a valid index",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, TadoError>;
