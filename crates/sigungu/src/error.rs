use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigunguError {
    #[error("Data processing error: {0}")]
    DataProcessing(#[from] sigungu_data_processing::DataError),
    #[error("Provider error: {0}")]
    Provider(#[from] crate::geocode::ProviderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SigunguError>;
