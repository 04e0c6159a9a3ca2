use thiserror::Error;

/// Top-level error type for the monitor
#[derive(Error, Debug)]
pub enum AppError {
    #[error("API fetch failed: {0}")]
    Fetch(String),

    #[error("Failed to read sequencers file: {0}")]
    SequencersRead(String),

    #[error("Failed to parse sequencers file: {0}")]
    SequencersParse(String),

    #[error("Failed to write sequencers file: {0}")]
    SequencersWrite(String),

    #[error("State persistence error: {0}")]
    State(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Alert category shown to operators in error notifications
    pub fn kind_label(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "API Fetch Failed",
            AppError::SequencersRead(_)
            | AppError::SequencersParse(_)
            | AppError::SequencersWrite(_)
            | AppError::State(_) => "File Operation Failed",
            AppError::Config(_) => "Configuration Error",
        }
    }

    /// Inner message without the variant prefix, for notification bodies
    pub fn detail(&self) -> &str {
        match self {
            AppError::Fetch(msg)
            | AppError::SequencersRead(msg)
            | AppError::SequencersParse(msg)
            | AppError::SequencersWrite(msg)
            | AppError::State(msg)
            | AppError::Config(msg) => msg,
        }
    }
}

/// Result type alias for the monitor
pub type AppResult<T> = Result<T, AppError>;
