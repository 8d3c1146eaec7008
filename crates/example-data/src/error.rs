//! Error types for the example-data crate.

use thiserror::Error;

/// Errors that can occur during account generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate an unused nickname after maximum retries.
    #[error("failed to generate a unique nickname after {max_attempts} attempts")]
    NicknameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },
}
