use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            message: err.to_string(),
        }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            message: msg.to_string(),
        }
    }
}

/// Outcome of a failed `/analyze` round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    /// Non-2xx response carrying the server's `error` message.
    Server(String),
    /// The request never completed or the body was not the expected JSON.
    Transport(String),
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzeError::Server(msg) => write!(f, "server rejected analysis: {}", msg),
            AnalyzeError::Transport(msg) => write!(f, "analysis request failed: {}", msg),
        }
    }
}

impl std::error::Error for AnalyzeError {}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzeError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzeError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzeError::Transport(err.to_string())
    }
}
