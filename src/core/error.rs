use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("max_steps must be below {limit}, got {value}")]
    MaxStepsTooLarge { value: u32, limit: u32 },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SimError {
    /// `step` was called on a terminated episode; `reset` must come first.
    #[error("episode already finished after {time_step} steps, call reset first")]
    EpisodeFinished { time_step: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
