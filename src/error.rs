use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Invalid input: {0}")] InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
