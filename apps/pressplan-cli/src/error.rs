//! Error types for the report runner.

use std::path::PathBuf;

use pressplan_core::CoreError;

/// Scenario loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Scenario file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}

/// Everything `main` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}\n\n{usage}", usage = crate::USAGE)]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidValue {
            var: "PRESSPLAN_UNIT_PRICE".to_string(),
            value: "thirty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for PRESSPLAN_UNIT_PRICE: 'thirty'"
        );

        let err = ConfigError::NotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "Scenario file not found: /tmp/missing.toml");
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: CliError = CoreError::EmptySalesWindow { units: 10 }.into();
        assert_eq!(
            err.to_string(),
            "Cannot allocate 10 units into an empty sales window"
        );
    }
}
