//! Domain error types.

/// Top-level error type for simtrader.
#[derive(Debug, thiserror::Error)]
pub enum SimtraderError {
    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimtraderError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SimtraderError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field or config key, if the error carries one.
    pub fn field(&self) -> Option<&str> {
        match self {
            SimtraderError::InvalidParameter { field, .. } => Some(field),
            SimtraderError::ConfigInvalid { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<csv::Error> for SimtraderError {
    fn from(err: csv::Error) -> Self {
        SimtraderError::Report {
            reason: err.to_string(),
        }
    }
}

impl From<&SimtraderError> for std::process::ExitCode {
    fn from(err: &SimtraderError) -> Self {
        let code: u8 = match err {
            SimtraderError::Io(_) | SimtraderError::Report { .. } => 1,
            SimtraderError::ConfigParse { .. } | SimtraderError::ConfigInvalid { .. } => 2,
            SimtraderError::InvalidParameter { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_field() {
        let err = SimtraderError::invalid("bars", "must be at least 1");
        assert_eq!(err.to_string(), "invalid bars: must be at least 1");
        assert_eq!(err.field(), Some("bars"));
    }

    #[test]
    fn config_invalid_message() {
        let err = SimtraderError::ConfigInvalid {
            section: "strategy".into(),
            key: "fast".into(),
            reason: "fast must be at least 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] fast: fast must be at least 2"
        );
        assert_eq!(err.field(), Some("fast"));
    }

    #[test]
    fn io_error_has_no_field() {
        let err = SimtraderError::from(std::io::Error::other("boom"));
        assert_eq!(err.field(), None);
    }
}
