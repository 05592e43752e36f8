use back2wo_common::{CaptureError, ModeTransitionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Back2woError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("取り込みエラー: {0}")]
    Capture(#[from] CaptureError),

    #[error("モード選択エラー: {0}")]
    Mode(#[from] ModeTransitionError),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for Back2woError {
    fn from(err: dialoguer::Error) -> Self {
        Back2woError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Back2woError>;
