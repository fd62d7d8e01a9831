use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{probe}: unexpected HTTP status {status}, body: {body}")]
    UnexpectedStatus {
        probe: String,
        status: u16,
        body: String,
    },

    #[error("{probe}: malformed response: {message}")]
    MalformedResponse { probe: String, message: String },

    #[error("{probe}: expected \"{field}\" to be \"{expected}\", got {}", describe_actual(.actual))]
    MarkerMismatch {
        probe: String,
        field: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("{probe}: {message}")]
    ExpectationFailed { probe: String, message: String },

    #[error("step {step} ({probe}) failed: {source}")]
    ProbeFailed {
        step: usize,
        probe: String,
        #[source]
        source: Box<SmokeError>,
    },
}

impl SmokeError {
    /// Short message for the terminal, without the nested step wrapper.
    pub fn user_friendly_message(&self) -> String {
        match self {
            SmokeError::ProbeFailed { probe, source, .. } => {
                format!("Probe '{}' failed: {}", probe, source.user_friendly_message())
            }
            SmokeError::ApiError(e) if e.is_timeout() => "Request timed out".to_string(),
            SmokeError::ApiError(e) if e.is_connect() => {
                "Could not connect to the API server".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SmokeError::ProbeFailed { source, .. } => source.recovery_suggestion(),
            SmokeError::ApiError(_) => "Check that the API server is running and --base-url points at it",
            SmokeError::IoError(_) => "Check that the scenario file exists and is readable",
            SmokeError::SerializationError(_) => "Check the request payload types",
            SmokeError::ConfigError { .. }
            | SmokeError::ConfigValidationError { .. }
            | SmokeError::InvalidConfigValueError { .. }
            | SmokeError::MissingConfigError { .. } => "Fix the command-line flags or the scenario file",
            SmokeError::UnexpectedStatus { .. }
            | SmokeError::MalformedResponse { .. }
            | SmokeError::MarkerMismatch { .. }
            | SmokeError::ExpectationFailed { .. } => {
                "Inspect the server logs, or rerun with --echo-json to see the response bodies"
            }
        }
    }

    /// Every failure halts the run with the same status.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

fn describe_actual(actual: &Option<String>) -> String {
    match actual {
        Some(value) => format!("\"{}\"", value),
        None => "nothing".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, SmokeError>;
