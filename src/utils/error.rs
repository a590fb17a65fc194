use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("CSV parse error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("CSV parse error: {message}")]
    ParseError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("No data provided")]
    MissingInputError,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: field '{field}' has invalid value '{value}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProcessorError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
