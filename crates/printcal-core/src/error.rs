//! Error taxonomy for the calibration core.
//!
//! Every failure is local and synchronous; nothing here is retried internally.

use thiserror::Error;

use crate::convergence::ConvergenceStatus;
use crate::models::Channel;

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Invalid colour-space input (L* out of range, bad white point, non-finite values)
    #[error("Colour domain error: {0}")]
    Domain(String),

    /// Empty or too-small measurement set
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Corrupt or out-of-order convergence input
    #[error("Sequence error: {0}")]
    Sequence(String),

    /// Tone curve would not be strictly increasing after smoothing
    #[error("Tone curve for {channel} channel is not monotonic at grey level {level}")]
    NonMonotonicCurve { channel: Channel, level: u8 },

    /// Profile requested before the tracker declared convergence
    #[error("Cannot build a profile while convergence status is {0}")]
    NotConverged(ConvergenceStatus),

    /// A tag or field would not fit its declared width
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
