//! Errors raised while loading or checking diagnostics settings.

/// Source name used when settings come from the layered lookup.
pub const LAYERED_SOURCES: &str = "layered sources";

/// What went wrong with the diagnostics settings.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A settings source could not be read or merged
    #[display("Failed to read configuration from {}: {}", source_name, reason)]
    Unreadable {
        /// File path or [`LAYERED_SOURCES`]
        source_name: String,
        /// Loader message
        reason: String,
    },
    /// Settings were read but do not fit [`DiagnosticsConfig`](crate::DiagnosticsConfig)
    #[display("Failed to parse configuration from {}: {}", source_name, reason)]
    Malformed {
        /// File path or [`LAYERED_SOURCES`]
        source_name: String,
        /// Deserializer message
        reason: String,
    },
    /// A setting has a value the library cannot use
    #[display("Invalid {}: {}", key, reason)]
    OutOfRange {
        /// Name of the offending setting
        key: &'static str,
        /// What the value must satisfy
        reason: String,
    },
}

/// Diagnostics configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use provenance_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::OutOfRange {
///     key: "max_stack_depth",
///     reason: "must be at least 1".to_string(),
/// });
/// assert_eq!(err.key(), Some("max_stack_depth"));
/// assert!(err.to_string().starts_with("Diagnostics Configuration Error: Invalid max_stack_depth"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Diagnostics Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The settings source that failed, if the error came from loading.
    pub fn source_name(&self) -> Option<&str> {
        match &self.kind {
            ConfigErrorKind::Unreadable { source_name, .. }
            | ConfigErrorKind::Malformed { source_name, .. } => Some(source_name.as_str()),
            ConfigErrorKind::OutOfRange { .. } => None,
        }
    }

    /// The offending setting, if the error came from validation.
    pub fn key(&self) -> Option<&'static str> {
        match &self.kind {
            ConfigErrorKind::OutOfRange { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_caller_location() {
        let err = ConfigError::new(ConfigErrorKind::Malformed {
            source_name: "a.toml".to_string(),
            reason: "bad".to_string(),
        });
        assert!(err.file.ends_with("config_error.rs"));
        assert!(err.line > 0);
    }

    #[test]
    fn loading_errors_name_their_source() {
        let err = ConfigError::new(ConfigErrorKind::Unreadable {
            source_name: LAYERED_SOURCES.to_string(),
            reason: "missing".to_string(),
        });
        assert_eq!(err.source_name(), Some(LAYERED_SOURCES));
        assert_eq!(err.key(), None);
        assert!(err.to_string().contains("from layered sources: missing"));
    }
}
