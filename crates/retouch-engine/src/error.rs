//! Error types for engine commands.

use thiserror::Error;

/// Engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No catalog entry for the given category and effect.
    #[error("unknown effect: {category}/{effect}")]
    UnknownEffect {
        /// Category id.
        category: String,
        /// Effect id.
        effect: String,
    },

    /// Command does not match the effect's parameter shape.
    #[error("effect {category}/{effect} takes a {expected} parameter")]
    ParameterKind {
        /// Category id.
        category: String,
        /// Effect id.
        effect: String,
        /// Parameter kind the effect declares.
        expected: &'static str,
    },

    /// Reorder permutation is not a permutation of the current positions.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// Stack index out of range.
    #[error("index {index} out of range for stack of {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Stack length.
        len: usize,
    },

    /// Value rejected (non-finite, duplicate registration, bad config field).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Config could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Buffer-level failure.
    #[error(transparent)]
    Core(#[from] retouch_core::Error),
}

impl EngineError {
    pub(crate) fn unknown_effect(category: &str, effect: &str) -> Self {
        Self::UnknownEffect {
            category: category.to_string(),
            effect: effect.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
