use std::{fmt, io};

/// Crate-wide `Result` type using [`CompleterError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, CompleterError>;

/// Top-level error type for gpac-complete operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum CompleterError {
    /// The external tool could not be queried.
    Adapter(AdapterError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON (de)serialization errors.
    Json(serde_json::Error),
}

/// Failures while invoking the external tool.
///
/// These are hard failures: a completion request that needs the tool and
/// cannot reach it produces no candidates at all.
#[derive(Debug)]
pub enum AdapterError {
    /// The binary could not be started (missing, not executable).
    Spawn { command: String, reason: String },

    /// The binary ran but exited with a failure status.
    ExitStatus { command: String, code: Option<i32> },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for CompleterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompleterError::Adapter(e) => write!(f, "Adapter error: {e}"),
            CompleterError::Config(e) => write!(f, "Configuration error: {e}"),
            CompleterError::Io(e) => write!(f, "I/O error: {e}"),
            CompleterError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Spawn { command, reason } => {
                write!(f, "failed to run '{command}': {reason}")
            }
            AdapterError::ExitStatus {
                command,
                code: Some(code),
            } => write!(f, "'{command}' exited with status {code}"),
            AdapterError::ExitStatus {
                command,
                code: None,
            } => write!(f, "'{command}' was terminated by a signal"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for CompleterError {}
impl std::error::Error for AdapterError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to CompleterError ========================= */

impl From<io::Error> for CompleterError {
    fn from(err: io::Error) -> Self {
        CompleterError::Io(err)
    }
}

impl From<serde_json::Error> for CompleterError {
    fn from(err: serde_json::Error) -> Self {
        CompleterError::Json(err)
    }
}

impl From<AdapterError> for CompleterError {
    fn from(err: AdapterError) -> Self {
        CompleterError::Adapter(err)
    }
}

impl From<ConfigError> for CompleterError {
    fn from(err: ConfigError) -> Self {
        CompleterError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_display() {
        let err = CompleterError::from(AdapterError::ExitStatus {
            command: "gpac -h filters".to_string(),
            code: Some(1),
        });
        assert_eq!(
            err.to_string(),
            "Adapter error: 'gpac -h filters' exited with status 1"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = CompleterError::from(ConfigError::InvalidValue {
            field: "gpac.binary".to_string(),
            value: String::new(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value '' for field 'gpac.binary'"
        );
    }
}
