use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("AI error: {0}")]
    AI(#[from] AIError), // Errors raised while talking to the model.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<log::SetLoggerError> for AppError {
    fn from(error: log::SetLoggerError) -> Self {
        AppError::Logger(error.to_string())
    }
}

// Failures of a single narrative turn or generation attempt.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("Invalid response from the model: {0}")]
    InvalidResponse(String),

    #[error("Character generation failed: {0}")]
    GenerationFailed(String),

    #[error("Model provider error: {0}")]
    Provider(#[from] ProviderError),
}

// The call to the model did not complete normally.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Timeout occurred after {0} seconds")]
    Timeout(u64),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("No API key configured")]
    MissingApiKey,
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> ProviderError {
        ProviderError::MalformedOutput(err.to_string())
    }
}
