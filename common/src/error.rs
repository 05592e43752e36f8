//! エラー型定義

use thiserror::Error;

use crate::capture::CaptureError;
use crate::mode::ModeTransitionError;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Mode error: {0}")]
    Mode(#[from] ModeTransitionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
