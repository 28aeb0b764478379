use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    /// Fewer historical points than the engine's fixed minimum.
    #[error("insufficient history: need at least {required} months, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("invalid forecast config: {0}")]
    InvalidConfig(String),

    #[error("invalid series input: {0}")]
    InvalidInput(String),

    #[error("tenant scope violation (job tenant not allowed by scheduler)")]
    TenantScopeViolation,
}

impl ForecastError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
