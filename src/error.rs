//! Error handling for the hoststat sampler.

/// A specialized `Result` type for hoststat operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// The main error type for hoststat.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A platform metric query failed or produced an unusable value
    #[error("Metric provider error: {0}")]
    Provider(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SystemError {
    /// Create a new metric provider error
    pub fn provider_error(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from a metric query rather than from setup.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SystemError::provider_error("no /proc/stat");
        assert_eq!(err.to_string(), "Metric provider error: no /proc/stat");
        assert!(err.is_provider());

        let err = SystemError::config_error("failure_threshold must be at least 1");
        assert!(err.to_string().contains("failure_threshold"));
        assert!(!err.is_provider());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: SystemError = io.into();
        assert!(matches!(err, SystemError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }
}
