//! Error types for the core point model.

use thiserror::Error;

/// Errors raised by the core point model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Unrecognised timestamp precision name.
    #[error("Invalid precision '{0}': expected one of n, ns, u, us, ms, s")]
    InvalidPrecision(String),
}
