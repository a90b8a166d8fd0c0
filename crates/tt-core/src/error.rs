use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// A tap rate of zero was passed where the math divides by it.
    ZeroTapRate,
    /// A duration of zero minutes was passed where the math divides by it.
    ZeroDuration,
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::ZeroTapRate => write!(f, "tap rate must be non-zero"),
            EstimateError::ZeroDuration => write!(f, "duration must be a non-zero number of minutes"),
        }
    }
}

impl std::error::Error for EstimateError {}

pub type Result<T> = std::result::Result<T, EstimateError>;
