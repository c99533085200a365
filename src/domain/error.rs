//! Domain error types.

/// Top-level error type for cotsignal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    /// A malformed instrument profile. Fatal for the whole run.
    #[error("invalid instrument profile for {symbol}: {reason}")]
    Configuration { symbol: String, reason: String },

    #[error("no report row for {symbol} ({label})")]
    MissingData { symbol: String, label: String },

    #[error("malformed row for {label}: {field} {reason}")]
    MalformedRow {
        label: String,
        field: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("calibration error: {reason}")]
    Calibration { reason: String },

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CotError {
    fn from(err: std::io::Error) -> Self {
        CotError::Io(err.to_string())
    }
}

impl CotError {
    /// True for the data-gap errors a batch recovers from by omission.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CotError::MissingData { .. } | CotError::MalformedRow { .. }
        )
    }
}

impl From<&CotError> for std::process::ExitCode {
    fn from(err: &CotError) -> Self {
        let code: u8 = match err {
            CotError::Io(_) => 1,
            CotError::ConfigParse { .. }
            | CotError::ConfigMissing { .. }
            | CotError::ConfigInvalid { .. }
            | CotError::Configuration { .. } => 2,
            CotError::Report { .. } => 3,
            CotError::Calibration { .. } => 4,
            CotError::MissingData { .. } | CotError::MalformedRow { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_gaps_are_recoverable() {
        let missing = CotError::MissingData {
            symbol: "EUR".into(),
            label: "EURO FX".into(),
        };
        let malformed = CotError::MalformedRow {
            label: "EURO FX".into(),
            field: "long_change".into(),
            reason: "is not an integer".into(),
        };
        assert!(missing.is_recoverable());
        assert!(malformed.is_recoverable());
    }

    #[test]
    fn configuration_is_fatal() {
        let err = CotError::Configuration {
            symbol: "EUR".into(),
            reason: "notional must be positive".into(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "invalid instrument profile for EUR: notional must be positive"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: CotError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, CotError::Io(ref msg) if msg == "disk gone"));
    }
}
