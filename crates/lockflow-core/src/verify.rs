#![forbid(unsafe_code)]

//! Attempt verification: exact ordered comparison against the secret.

/// Result of verifying a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The attempt matched the registered secret exactly.
    Success,
    /// The attempt did not match. Expected control flow, not an error.
    Fail,
}

/// Compare a frozen attempt path against the registered secret.
///
/// Success iff both sequences have equal length and are element-wise equal
/// in order. Not a set comparison, not a subsequence match, no partial
/// credit. Pure and side-effect free.
#[must_use]
pub fn verify(attempt: &[u8], secret: &[u8]) -> Outcome {
    if attempt == secret {
        Outcome::Success
    } else {
        Outcome::Fail
    }
}
