//! Error types for circle-rotation

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for circle-rotation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in circle-rotation operations
#[derive(Debug, Error)]
pub enum Error {
    /// Breakpoint table is malformed (unsorted, outside `[0, 1)`, empty)
    #[error("Invalid breakpoints: {0}")]
    InvalidBreakpoints(String),

    /// Lift decreases somewhere on the fundamental domain
    #[error("Map is not monotone near x = {at}")]
    NonMonotone {
        /// Start of the offending piece
        at: String,
    },

    /// Lift overshoots `f(0) + 1` at the end of the fundamental domain
    #[error("Map violates f(x + 1) = f(x) + 1: left limit at 1 is {left_limit}, expected at most {bound}")]
    NotPeriodic {
        /// Left limit at `x = 1`
        left_limit: String,
        /// The required bound `f(0) + 1`
        bound: String,
    },

    /// Map is not a bijection of the real line
    #[error("Map is not invertible: {0}")]
    NotInvertible(String),

    /// Operation requires commuting lifts
    #[error("Lifts do not commute: {0}")]
    NotCommuting(String),

    /// Tolerance must be strictly positive
    #[error("Invalid tolerance: {0} (must be positive)")]
    InvalidTolerance(String),

    /// Requested precision needs more dyadic levels than configured
    #[error("Tolerance {tolerance} requires more than {max_level} dyadic levels")]
    PrecisionBudgetExceeded {
        /// Requested tolerance
        tolerance: String,
        /// Configured level ceiling
        max_level: u32,
    },

    /// Orbit term exceeded the `x + 2` bound, so translation numbers differ
    #[error("Translation numbers differ on group element {element} (orbit radius {radius})")]
    TranslationNumberMismatch {
        /// Debug rendering of the offending element
        element: String,
        /// Word length at which it was found
        radius: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
