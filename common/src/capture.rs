//! 画像取り込み（ファイル選択・ドラッグ&ドロップ・カメラ）の共通ロジック
//!
//! ブラウザAPIには依存しない。受け入れ判定とカメラストリームの所有だけを扱う。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `<input type="file">` の accept 属性
pub const ACCEPT_IMAGES: &str = "image/*";
/// カメラのフレームを書き出す形式
pub const CAMERA_FRAME_MIME: &str = "image/png";
pub const SUPPORTED_FORMATS_LABEL: &str = "Supports: JPG, PNG, WebP";

/// 画像の入手経路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureSource {
    FilePicker,
    Drop,
    Camera,
}

/// 取り込みエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("not an image: {0}")]
    NotAnImage(String),

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("no active camera frame")]
    NoActiveFrame,

    #[error("image could not be encoded: {0}")]
    Encoding(String),
}

impl CaptureError {
    /// 無視してよいエラー（ユーザーには何も表示しない）
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            CaptureError::NoFileSelected | CaptureError::NotAnImage(_) | CaptureError::NoActiveFrame
        )
    }

    /// 画面に一度だけ出すメッセージ
    pub fn user_message(&self) -> Option<String> {
        match self {
            CaptureError::CameraUnavailable(_) => {
                Some("Camera unavailable. Check the browser permission or upload a file instead.".into())
            }
            CaptureError::Encoding(_) => Some("The image could not be read. Please try another file.".into()),
            _ => None,
        }
    }
}

pub fn is_image_type(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// 選択/ドロップされたファイルを受け入れるか判定
///
/// `mime` が `None` のときはファイルが選ばれていない。
/// ドロップは `image/` で始まる型のみ。ファイル選択は accept 属性で絞られているので型を問わない。
pub fn admit(source: CaptureSource, mime: Option<&str>) -> Result<(), CaptureError> {
    let Some(mime) = mime else {
        return Err(CaptureError::NoFileSelected);
    };
    match source {
        CaptureSource::Drop if !is_image_type(mime) => Err(CaptureError::NotAnImage(mime.to_string())),
        _ => Ok(()),
    }
}

/// カメラフレームのネイティブ解像度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// videoWidth/videoHeight から作成。まだフレームが無い場合は0になる。
    pub fn from_video(width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::NoActiveFrame);
        }
        Ok(Self { width, height })
    }
}

/// デバイスのメディアストリーム
pub trait DeviceStream {
    /// 全トラックを停止してデバイスを解放する
    fn release(&self);
}

/// カメラストリームの保持枠
///
/// 同時に保持するストリームは1つだけ。破棄時にも解放する。
/// ストリーム要求は番号で管理し、停止後に届いた古い要求のストリームは受け取らない。
pub struct CameraSlot<S: DeviceStream> {
    active: Option<S>,
    request: u64,
}

impl<S: DeviceStream> Default for CameraSlot<S> {
    fn default() -> Self {
        Self { active: None, request: 0 }
    }
}

impl<S: DeviceStream> CameraSlot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいストリーム要求を始める。保持中のストリームは解放する。
    pub fn begin_request(&mut self) -> u64 {
        self.stop();
        self.request
    }

    /// 要求したストリームを受け取る
    ///
    /// その後 `stop` や別の要求があった場合は `Err` でストリームを返す。呼び出し側が解放する。
    pub fn accept(&mut self, request: u64, stream: S) -> Result<bool, S> {
        if request != self.request {
            tracing::debug!(request, current = self.request, "stale camera stream refused");
            return Err(stream);
        }
        Ok(self.start(stream))
    }

    /// 新しいストリームを保持する。既存のストリームは先に解放する。
    ///
    /// 既存ストリームを置き換えた場合は true
    pub fn start(&mut self, stream: S) -> bool {
        let replaced = self.release_active();
        self.active = Some(stream);
        tracing::debug!(replaced, "camera stream started");
        replaced
    }

    /// ストリームを解放し、処理中の要求も無効にする。保持していた場合は true
    pub fn stop(&mut self) -> bool {
        self.request += 1;
        self.release_active()
    }

    fn release_active(&mut self) -> bool {
        match self.active.take() {
            Some(stream) => {
                stream.release();
                tracing::debug!("camera stream released");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn stream(&self) -> Option<&S> {
        self.active.as_ref()
    }
}

/// 要求したストリームを枠に渡す。枠が無い（アンマウント済み）か古い要求なら解放する。
///
/// `with_slot` は枠が生きていればクロージャを実行し、その結果を返す。
pub fn settle_stream<S, W>(request: u64, stream: S, with_slot: W) -> bool
where
    S: DeviceStream,
    W: FnOnce(&mut dyn FnMut(&mut CameraSlot<S>)) -> bool,
{
    let mut pending = Some(stream);
    let mut accepted = false;
    let alive = with_slot(&mut |slot: &mut CameraSlot<S>| {
        if let Some(stream) = pending.take() {
            match slot.accept(request, stream) {
                Ok(_) => accepted = true,
                Err(stale) => pending = Some(stale),
            }
        }
    });
    if let Some(stream) = pending {
        tracing::debug!(alive, "camera stream released before use");
        stream.release();
    }
    accepted
}

impl<S: DeviceStream> Drop for CameraSlot<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 有効なストリーム数を数えるテスト用ストリーム
    struct FakeStream {
        live: Rc<Cell<i32>>,
    }

    impl FakeStream {
        fn open(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self { live: Rc::clone(live) }
        }
    }

    impl DeviceStream for FakeStream {
        fn release(&self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[test]
    fn test_admit_no_file() {
        assert_eq!(admit(CaptureSource::FilePicker, None), Err(CaptureError::NoFileSelected));
        assert_eq!(admit(CaptureSource::Drop, None), Err(CaptureError::NoFileSelected));
    }

    #[test]
    fn test_admit_drop_requires_image() {
        assert!(admit(CaptureSource::Drop, Some("image/png")).is_ok());
        assert!(admit(CaptureSource::Drop, Some("image/webp")).is_ok());
        let err = admit(CaptureSource::Drop, Some("application/pdf")).unwrap_err();
        assert_eq!(err, CaptureError::NotAnImage("application/pdf".into()));
        assert!(err.is_silent());
    }

    #[test]
    fn test_admit_picker_trusts_accept_filter() {
        assert!(admit(CaptureSource::FilePicker, Some("")).is_ok());
    }

    #[test]
    fn test_frame_size_zero_is_no_frame() {
        assert_eq!(FrameSize::from_video(0, 480), Err(CaptureError::NoActiveFrame));
        assert_eq!(
            FrameSize::from_video(640, 480),
            Ok(FrameSize { width: 640, height: 480 })
        );
    }

    #[test]
    fn test_user_message_only_for_surfaced_errors() {
        assert!(CaptureError::CameraUnavailable("denied".into()).user_message().is_some());
        assert!(!CaptureError::CameraUnavailable("denied".into()).is_silent());
        assert!(CaptureError::NoFileSelected.user_message().is_none());
        assert!(CaptureError::NoActiveFrame.user_message().is_none());
    }

    #[test]
    fn test_camera_start_twice_exchanges_stream() {
        let live = Rc::new(Cell::new(0));
        let mut slot = CameraSlot::new();

        assert!(!slot.start(FakeStream::open(&live)));
        assert_eq!(live.get(), 1);

        // 停止せずに再開始しても2本にならない
        assert!(slot.start(FakeStream::open(&live)));
        assert_eq!(live.get(), 1);
        assert!(slot.is_active());

        assert!(slot.stop());
        assert_eq!(live.get(), 0);
        assert!(!slot.stop());
    }

    #[test]
    fn test_camera_released_on_drop() {
        let live = Rc::new(Cell::new(0));
        {
            let mut slot = CameraSlot::new();
            slot.start(FakeStream::open(&live));
            assert_eq!(live.get(), 1);
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_stream_arriving_after_stop_is_released() {
        let live = Rc::new(Cell::new(0));
        let mut slot = CameraSlot::new();

        let request = slot.begin_request();
        // 許可待ちの間に Stop
        slot.stop();

        let accepted = settle_stream(request, FakeStream::open(&live), |hand_over| {
            hand_over(&mut slot);
            true
        });
        assert!(!accepted);
        assert!(!slot.is_active());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_stream_arriving_after_unmount_is_released() {
        let live = Rc::new(Cell::new(0));
        let request = {
            let mut slot = CameraSlot::<FakeStream>::new();
            slot.begin_request()
        };

        // 枠は破棄済みなのでクロージャは呼ばれない
        let accepted = settle_stream(request, FakeStream::open(&live), |_| false);
        assert!(!accepted);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_latest_request_wins() {
        let live = Rc::new(Cell::new(0));
        let mut slot = CameraSlot::new();

        let first = slot.begin_request();
        let second = slot.begin_request();

        let stale = settle_stream(first, FakeStream::open(&live), |hand_over| {
            hand_over(&mut slot);
            true
        });
        let current = settle_stream(second, FakeStream::open(&live), |hand_over| {
            hand_over(&mut slot);
            true
        });

        assert!(!stale);
        assert!(current);
        assert!(slot.is_active());
        assert_eq!(live.get(), 1);
    }
}
