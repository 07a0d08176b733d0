use thiserror::Error;

/// The error type for every fallible operation in the derivation pipeline.
///
/// All variants are deterministic input-validation failures; none is
/// transient, so callers should correct the offending parameter and call
/// again rather than retry the same call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A hash algorithm name that is not one of SHA-256, SHA-384 or SHA-512.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The underlying PBKDF2 primitive rejected its parameters.
    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// Every character class was disabled.
    #[error("at least one character class must be enabled")]
    EmptyCharset,

    /// The requested length cannot hold one character per enabled class.
    #[error("password length {length} is shorter than the {class_count} enabled character classes")]
    InvalidLength { length: usize, class_count: usize },

    /// The running entropy value reached zero before rendering finished.
    #[error("derived entropy exhausted before the password was complete")]
    InsufficientEntropy,
}
