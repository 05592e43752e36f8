//! 撮影モード選択のステートマシン
//!
//! none → upload / camera のみ。`ModeFlow::DirectSwitch` のときだけ upload → camera を許可。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CaptureMode;

/// モード選択の画面構成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeFlow {
    /// アップロード/カメラの2択を先に表示
    #[default]
    Selector,
    /// アップロード画面から直接カメラへ切り替え可能
    DirectSwitch,
}

impl std::str::FromStr for ModeFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selector" | "two-step" => Ok(ModeFlow::Selector),
            "direct-switch" | "direct" => Ok(ModeFlow::DirectSwitch),
            _ => Err(format!("Unknown mode flow: {}. Use selector or direct-switch", s)),
        }
    }
}

impl std::fmt::Display for ModeFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeFlow::Selector => write!(f, "selector"),
            ModeFlow::DirectSwitch => write!(f, "direct-switch"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeTransitionError {
    #[error("cannot switch capture mode from {from} to {to}")]
    NotAllowed { from: CaptureMode, to: CaptureMode },

    #[error("an image is already captured; reset first")]
    ImageHeld,
}

#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    flow: ModeFlow,
    mode: CaptureMode,
}

impl ModeSelector {
    pub fn new(flow: ModeFlow) -> Self {
        Self { flow, mode: CaptureMode::None }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn flow(&self) -> ModeFlow {
        self.flow
    }

    pub fn can_transition(&self, to: CaptureMode) -> bool {
        matches!(
            (self.mode, to, self.flow),
            (CaptureMode::None, CaptureMode::Upload | CaptureMode::Camera, _)
                | (CaptureMode::Upload, CaptureMode::Camera, ModeFlow::DirectSwitch)
        )
    }

    /// アップロード画面に「カメラに切り替え」を出すか
    pub fn offers_camera_switch(&self) -> bool {
        self.can_transition(CaptureMode::Camera) && self.mode == CaptureMode::Upload
    }

    pub fn choose(&mut self, to: CaptureMode) -> Result<CaptureMode, ModeTransitionError> {
        if !self.can_transition(to) {
            return Err(ModeTransitionError::NotAllowed { from: self.mode, to });
        }
        tracing::debug!(from = %self.mode, %to, "capture mode changed");
        self.mode = to;
        Ok(to)
    }

    /// 画像取り込み後はモード選択を抜ける
    pub fn on_capture(&mut self) {
        self.mode = CaptureMode::None;
    }

    pub fn reset(&mut self) {
        self.mode = CaptureMode::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let selector = ModeSelector::new(ModeFlow::Selector);
        assert_eq!(selector.mode(), CaptureMode::None);
    }

    #[test]
    fn test_choose_from_none() {
        let mut selector = ModeSelector::new(ModeFlow::Selector);
        assert_eq!(selector.choose(CaptureMode::Camera), Ok(CaptureMode::Camera));
        selector.reset();
        assert_eq!(selector.choose(CaptureMode::Upload), Ok(CaptureMode::Upload));
    }

    #[test]
    fn test_selector_flow_blocks_upload_to_camera() {
        let mut selector = ModeSelector::new(ModeFlow::Selector);
        selector.choose(CaptureMode::Upload).unwrap();
        assert!(!selector.offers_camera_switch());

        let err = selector.choose(CaptureMode::Camera).unwrap_err();
        assert_eq!(
            err,
            ModeTransitionError::NotAllowed { from: CaptureMode::Upload, to: CaptureMode::Camera }
        );
        assert_eq!(selector.mode(), CaptureMode::Upload);
    }

    #[test]
    fn test_direct_switch_flow_allows_upload_to_camera() {
        let mut selector = ModeSelector::new(ModeFlow::DirectSwitch);
        selector.choose(CaptureMode::Upload).unwrap();
        assert!(selector.offers_camera_switch());
        assert_eq!(selector.choose(CaptureMode::Camera), Ok(CaptureMode::Camera));
    }

    #[test]
    fn test_camera_to_upload_never_allowed() {
        for flow in [ModeFlow::Selector, ModeFlow::DirectSwitch] {
            let mut selector = ModeSelector::new(flow);
            selector.choose(CaptureMode::Camera).unwrap();
            assert!(selector.choose(CaptureMode::Upload).is_err());
        }
    }

    #[test]
    fn test_choose_none_is_rejected() {
        let mut selector = ModeSelector::new(ModeFlow::Selector);
        assert!(selector.choose(CaptureMode::None).is_err());
    }

    #[test]
    fn test_capture_and_reset_return_to_none() {
        let mut selector = ModeSelector::new(ModeFlow::Selector);
        selector.choose(CaptureMode::Camera).unwrap();
        selector.on_capture();
        assert_eq!(selector.mode(), CaptureMode::None);

        selector.choose(CaptureMode::Upload).unwrap();
        selector.reset();
        assert_eq!(selector.mode(), CaptureMode::None);
    }

    #[test]
    fn test_mode_flow_parse() {
        assert_eq!("selector".parse::<ModeFlow>(), Ok(ModeFlow::Selector));
        assert_eq!("Direct-Switch".parse::<ModeFlow>(), Ok(ModeFlow::DirectSwitch));
        assert!("hero".parse::<ModeFlow>().is_err());
        assert_eq!(ModeFlow::DirectSwitch.to_string(), "direct-switch");
    }
}
