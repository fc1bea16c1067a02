use dotty_history::RenderError;
use thiserror::Error;

use crate::event::Envelope;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sending envelope failed")]
    ActionSendFailed(#[from] tokio::sync::mpsc::error::SendError<Envelope>),
    #[error("Error aggregation")]
    Aggregate(Vec<AppError>),
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
    #[error("File operation failed")]
    FileOperationFailed(#[from] std::io::Error),
    #[error("Url is invalid")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Http client setup failed")]
    HttpClientFailed(#[from] reqwest::Error),
    #[error("Rendering svg failed: {0}")]
    RenderFailed(#[from] RenderError),
    #[error("Terminal not initialized")]
    TerminalNotInitialized,
}
