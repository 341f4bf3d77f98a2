//! Error types for tinker.

/// The primary error type used throughout the tinker client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TinkerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown traversal strategy '{0}'")]
    UnknownStrategy(String),

    #[error("invalid configuration for strategy {strategy}: {reason}")]
    InvalidStrategyConfig { strategy: String, reason: String },

    #[error("path labels and objects differ in length: {labels} labels, {objects} objects")]
    InvalidPath { labels: usize, objects: usize },

    #[error("strategy {strategy} failed to apply: {reason}")]
    StrategyApply { strategy: String, reason: String },

    #[error("remote error: {0}")]
    Remote(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TinkerError {
    /// Shorthand for an [`TinkerError::InvalidStrategyConfig`].
    pub fn strategy_config(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        TinkerError::InvalidStrategyConfig {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, TinkerError>`.
pub type TinkerResult<T> = Result<T, TinkerError>;
