use thiserror::Error;

#[derive(Error, Debug)]
pub enum DividendError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}
