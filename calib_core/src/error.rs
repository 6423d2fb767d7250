//! Error and advisory types for the calibration core.

use crate::types::RadarId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for calibration operations
pub type CalibResult<T> = Result<T, CalibError>;

/// Input rejected before any computation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibError {
    /// Trajectory lengths or matrix dimensions do not agree
    #[error("invalid shape ({what}): expected {expected}, got {actual}")]
    InvalidShape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// No radars at all
    #[error("radar network is empty")]
    EmptyNetwork,
}

/// Why an estimate is poorly conditioned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DegeneracyReason {
    /// Fewer samples than the configured minimum
    TooFewSamples { samples: usize, minimum: usize },
    /// Trajectory spread (m²) below the configured floor
    LowSpread { spread: f64, minimum: f64 },
}

/// Non-fatal warning attached to a calibration result.
///
/// The estimate is still produced; callers wanting a confidence flag should
/// also threshold on the residual matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Advisory {
    DegenerateInput {
        reference: RadarId,
        target: RadarId,
        reason: DegeneracyReason,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::DegenerateInput {
                reference,
                target,
                reason,
            } => match reason {
                DegeneracyReason::TooFewSamples { samples, minimum } => write!(
                    f,
                    "{target} wrt {reference}: only {samples} samples (minimum {minimum})"
                ),
                DegeneracyReason::LowSpread { spread, minimum } => write!(
                    f,
                    "{target} wrt {reference}: trajectory spread {spread:.3e} m² below {minimum:.3e} m²"
                ),
            },
        }
    }
}
