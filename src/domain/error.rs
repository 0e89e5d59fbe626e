//! Engine error types.

/// Error raised by a [`crate::domain::signal::SignalSource`] for a single
/// index. The simulator catches these per index, records a warning on the
/// result, and treats the index as no-signal.
#[derive(Debug, Clone, thiserror::Error)]
#[error("signal source error: {message}")]
pub struct SignalError {
    pub message: String,
}

impl SignalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error type for stratsim.
#[derive(Debug, thiserror::Error)]
pub enum StratsimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no usable candles in {source_name}")]
    NoData { source_name: String },

    #[error("insufficient data: have {candles} candles, need {minimum}")]
    InsufficientData { candles: usize, minimum: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("run cancelled before start")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratsimError> for std::process::ExitCode {
    fn from(err: &StratsimError) -> Self {
        let code: u8 = match err {
            StratsimError::Io(_) => 1,
            StratsimError::ConfigParse { .. } | StratsimError::ConfigInvalid { .. } => 2,
            StratsimError::Data { .. }
            | StratsimError::NoData { .. }
            | StratsimError::InsufficientData { .. } => 3,
            StratsimError::Report { .. } => 4,
            StratsimError::Cancelled => 5,
        };
        std::process::ExitCode::from(code)
    }
}
