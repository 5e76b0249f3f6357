//! Errors raised while assembling an autoop system.

/// Bad or unreadable configuration, or misuse of the process instance.
///
/// Raised by config file loading and builder validation, by tracing setup,
/// and by `System::install` when an instance already exists.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Human readable description, usually naming the offending source or key
    pub message: String,
    /// Source line that rejected the configuration
    pub line: u32,
    /// Source file that rejected the configuration
    pub file: &'static str,
}

impl ConfigError {
    /// Describe a configuration failure at the caller's location.
    ///
    /// ```
    /// use autoop_error::ConfigError;
    ///
    /// let err = ConfigError::new("storage.base_path must not be empty");
    /// assert!(err.to_string().starts_with("Configuration Error: storage.base_path"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
