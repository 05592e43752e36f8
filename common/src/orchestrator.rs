//! ルートオーケストレータ
//!
//! 画像・モード・再生状態の唯一の持ち主。状態の変更はすべてここのメソッドを通す。

use crate::capture::{CaptureError, CaptureSource};
use crate::mode::{ModeFlow, ModeSelector, ModeTransitionError};
use crate::playback::{Phase, Playback, Scheduler, Tick, Timing, Transition};
use crate::script::{SCRIPT_LEN, STATUS_DEAL, STATUS_NEGOTIATING};
use crate::types::{CaptureMode, CapturedImage, RevealedLine, ViewFlags};

/// 描画用のスナップショット
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub image: Option<CapturedImage>,
    pub flags: ViewFlags,
    pub transcript: Vec<RevealedLine>,
    pub phase: Phase,
    /// アップロード画面に「カメラに切り替え」を出す
    pub offers_camera_switch: bool,
}

impl ViewState {
    /// 次の行を待っている（入力中インジケータを出す）
    pub fn awaiting_next_line(&self) -> bool {
        self.flags.show_results && !self.transcript.is_empty() && self.transcript.len() < SCRIPT_LEN
    }

    pub fn negotiation_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// チャット欄フッターの文言（結果表示前は None）
    pub fn status_label(&self) -> Option<&'static str> {
        if !self.flags.show_results {
            return None;
        }
        Some(if self.negotiation_complete() { STATUS_DEAL } else { STATUS_NEGOTIATING })
    }
}

pub struct Orchestrator<S: Scheduler> {
    scheduler: S,
    image: Option<CapturedImage>,
    selector: ModeSelector,
    playback: Playback<S::Handle>,
}

impl<S: Scheduler> Orchestrator<S> {
    pub fn new(scheduler: S, timing: Timing, flow: ModeFlow) -> Self {
        Self {
            scheduler,
            image: None,
            selector: ModeSelector::new(flow),
            playback: Playback::new(timing),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn mode(&self) -> CaptureMode {
        self.selector.mode()
    }

    pub fn flow(&self) -> ModeFlow {
        self.selector.flow()
    }

    pub fn timing(&self) -> Timing {
        self.playback.timing()
    }

    pub fn phase(&self) -> Phase {
        self.playback.phase()
    }

    pub fn generation(&self) -> u64 {
        self.playback.generation()
    }

    pub fn transcript(&self) -> &[RevealedLine] {
        self.playback.transcript()
    }

    pub fn flags(&self) -> ViewFlags {
        ViewFlags {
            is_analyzing: self.playback.is_analyzing(),
            show_results: self.playback.shows_results(),
            mode: self.selector.mode(),
        }
    }

    pub fn offers_camera_switch(&self) -> bool {
        self.image.is_none() && self.selector.offers_camera_switch()
    }

    pub fn snapshot(&self) -> ViewState {
        ViewState {
            image: self.image.clone(),
            flags: self.flags(),
            transcript: self.playback.transcript().to_vec(),
            phase: self.playback.phase(),
            offers_camera_switch: self.offers_camera_switch(),
        }
    }

    /// モードを選ぶ（画像を保持している間は不可）
    pub fn choose_mode(&mut self, mode: CaptureMode) -> Result<CaptureMode, ModeTransitionError> {
        if self.image.is_some() {
            return Err(ModeTransitionError::ImageHeld);
        }
        self.selector.choose(mode)
    }

    /// 画像を保持して再生を開始する。新しい世代番号を返す。
    pub fn submit_image(&mut self, image: CapturedImage) -> u64 {
        tracing::info!(mime = image.mime_type(), bytes = image.approx_byte_len(), "image submitted");
        self.image = Some(image);
        self.selector.on_capture();
        self.playback.start(&mut self.scheduler)
    }

    /// 取り込み結果のData URLを検証してから投入する
    ///
    /// 画像でなければ現在の画像はそのまま。
    pub fn submit_capture(&mut self, source: CaptureSource, data_url: String) -> Result<u64, CaptureError> {
        match CapturedImage::from_data_url(data_url) {
            Ok(image) => Ok(self.submit_image(image)),
            Err(err) => {
                tracing::debug!(?source, %err, "capture rejected");
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        tracing::info!(generation = self.playback.generation(), "session reset");
        self.playback.stop();
        self.image = None;
        self.selector.reset();
    }

    pub fn on_tick(&mut self, tick: Tick) -> Option<Transition> {
        self.playback.advance(tick, &mut self.scheduler)
    }
}
