//! データモデルの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - CapturedImage: 撮影/アップロードされた画像（Data URL）
//! - ViewFlags: 画面の表示フラグ
//! - ScriptLine / RevealedLine: エージェント会話の台本と表示済み行

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::capture::{is_image_type, CaptureError};

/// 会話の話者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Seller,
    Buyer,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Seller => "seller",
            Speaker::Buyer => "buyer",
        }
    }

    /// 吹き出しに表示するラベル
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Seller => "AI Seller",
            Speaker::Buyer => "AI Buyer",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 台本の1行（静的データ、実行時に生成されない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptLine {
    pub speaker: Speaker,
    pub text: &'static str,
}

/// 表示済みの会話行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedLine {
    /// 台本上の位置（0始まり）
    pub index: usize,
    pub speaker: Speaker,
    pub text: &'static str,
    /// 表示時刻（ミリ秒）
    pub revealed_at_ms: u64,
}

/// 撮影モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    None,
    Upload,
    Camera,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::None => "none",
            CaptureMode::Upload => "upload",
            CaptureMode::Camera => "camera",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画面の表示フラグ
///
/// `is_analyzing` と `show_results` は再生フェーズから導出されるため同時に真にならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFlags {
    pub is_analyzing: bool,
    pub show_results: bool,
    pub mode: CaptureMode,
}

/// 取り込んだ画像（`data:image/...;base64,...` 形式）
///
/// 一度作られたら変更されない。クローンは参照カウントのみ。
#[derive(Clone, Eq)]
pub struct CapturedImage {
    data_url: Arc<str>,
}

const BASE64_MARKER: &str = ";base64,";

impl CapturedImage {
    /// Data URLから生成（FileReader / canvas.toDataURL の結果）
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, CaptureError> {
        let data_url = data_url.into();
        let mime = parse_mime(&data_url)
            .ok_or_else(|| CaptureError::Encoding("not a base64 data URL".into()))?;
        if !is_image_type(mime) {
            return Err(CaptureError::NotAnImage(mime.to_string()));
        }
        Ok(Self { data_url: data_url.into() })
    }

    /// 生バイト列とMIMEタイプから生成
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, CaptureError> {
        if !is_image_type(mime) {
            return Err(CaptureError::NotAnImage(mime.to_string()));
        }
        if bytes.is_empty() {
            return Err(CaptureError::Encoding("empty image payload".into()));
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_url = format!("data:{}{}{}", mime, BASE64_MARKER, encoded);
        Ok(Self { data_url: data_url.into() })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &str {
        // 生成時に検証済み
        parse_mime(&self.data_url).unwrap_or_default()
    }

    /// Base64部分の長さから求めたおおよそのバイト数
    pub fn approx_byte_len(&self) -> usize {
        let payload = self
            .data_url
            .split_once(BASE64_MARKER)
            .map(|(_, p)| p)
            .unwrap_or_default();
        payload.len() / 4 * 3
    }
}

impl PartialEq for CapturedImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data_url, &other.data_url) || self.data_url == other.data_url
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("mime", &self.mime_type())
            .field("bytes", &self.approx_byte_len())
            .finish()
    }
}

fn parse_mime(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime, _) = rest.split_once(BASE64_MARKER)?;
    Some(mime)
}
