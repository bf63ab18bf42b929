use std::io;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("issue tracker responded with {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("issue tracker reported errors: {}", .0.join(", "))]
    Api(Vec<String>),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
