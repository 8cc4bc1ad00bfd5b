use thiserror::Error;

/// Application-level errors.
///
/// Navigation itself never fails; only persistence and launch hand-off
/// surface these, and callers log them and carry on.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Launch failed: {0}")]
    Launch(String),
}

impl From<toml_edit::de::Error> for AppError {
    fn from(e: toml_edit::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
