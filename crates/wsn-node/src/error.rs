//! Error types for the wsn-node crate.
//!
//! Node state transitions themselves never fail: a depleted battery is a
//! normal outcome reported through [`Death`](crate::death::Death). The only
//! failures are out-of-range tunables rejected when a configuration is
//! validated.

/// Errors that can occur when validating node parameters.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// A node or utility parameter is outside its valid range.
    #[error("invalid node configuration: {reason}")]
    InvalidConfig {
        /// Explanation of which parameter is wrong and why.
        reason: String,
    },
}
