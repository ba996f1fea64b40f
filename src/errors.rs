use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("transport error: {0}")] Transport(#[from] reqwest::Error),
    #[error("provider error: {0}")] Provider(String),
    #[error("config error: {0}")] Config(String),
    #[error("context error: {0}")] Context(String),
    #[error("io error: {0}")] Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
