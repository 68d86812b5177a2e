//! Bot error types

use std::path::PathBuf;

use chess_core::{PuzzleError, SetupError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Puzzle dataset {0} has no rows")]
    EmptyDataset(PathBuf),

    #[error("Dataset error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Puzzle error: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected API response: {0}")]
    Response(String),
}
