//! Error types for Content Alchemy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlchemyError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Triage error: {0}")]
    Triage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlchemyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let e = AlchemyError::Provider("OpenAI API error 500".into());
        assert_eq!(e.to_string(), "Provider error: OpenAI API error 500");

        let e = AlchemyError::Config("unknown provider".into());
        assert!(e.to_string().contains("unknown provider"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let e: AlchemyError = io_err.into();
        assert!(matches!(e, AlchemyError::Io(_)));
        assert!(e.to_string().contains("config.toml"));
    }
}
