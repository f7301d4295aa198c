//! Error types.
//!
//! - `RateError`: failures of the rate model and the fitting helpers (library level)
//! - `AppError`: what the `reaclib` binary reports, carrying a process exit code

/// Error returned by [`crate::models::ReaclibRate`] and the `fit` helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resonance id {id} is out of range, the rate has {num_resonances} resonance(s)")]
    ResonanceOutOfRange { id: usize, num_resonances: usize },

    #[error("parameter index {index} is out of range for {len} parameters")]
    ParameterIndex { index: usize, len: usize },

    #[error("expected {expected} parameters, got {actual}")]
    ParameterLength { expected: usize, actual: usize },

    #[error("{usable} usable samples are not enough to determine {required} coefficient(s)")]
    InsufficientData { usable: usize, required: usize },

    #[error("least-squares system is singular")]
    SingularSystem,
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        let exit_code = match err {
            RateError::InvalidArgument(_)
            | RateError::ResonanceOutOfRange { .. }
            | RateError::ParameterIndex { .. }
            | RateError::ParameterLength { .. } => 2,
            RateError::InsufficientData { .. } => 3,
            RateError::SingularSystem => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_errors_map_to_exit_codes() {
        let e: AppError = RateError::InvalidArgument("mu".into()).into();
        assert_eq!(e.exit_code(), 2);
        let e: AppError = RateError::InsufficientData { usable: 1, required: 4 }.into();
        assert_eq!(e.exit_code(), 3);
        let e: AppError = RateError::SingularSystem.into();
        assert_eq!(e.exit_code(), 4);
        assert!(e.to_string().contains("singular"));
    }
}
