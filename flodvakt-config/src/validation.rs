//! Custom validation functions for configuration.

use validator::ValidationError;

use crate::window::WindowConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a `tracing` level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// The comparison history must span at least one sliding window.
pub fn validate_window_ordering(window: &WindowConfig) -> Result<(), ValidationError> {
    if window.comparison_window_secs < window.sliding_window_secs {
        let mut error = ValidationError::new("comparison_shorter_than_sliding");
        error.message =
            Some("comparison_window_secs must be >= sliding_window_secs".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels() {
        assert!(validate_log_level("INFO").is_ok());
        assert!(validate_log_level("warn").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }
}
