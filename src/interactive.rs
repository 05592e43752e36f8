//! 対話式の取り込みモード選択
//!
//! 画像を引数で渡さなかったときに使う。モード遷移はオーケストレータに任せる。

use crate::capture::{self, LoadedImage};
use crate::error::{Back2woError, Result};
use back2wo_common::{CaptureError, CaptureMode, Orchestrator, Scheduler};
use dialoguer::{Input, Select};
use std::path::PathBuf;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Upload,
    Camera,
    EnterPath,
    SwitchToCamera,
    Back,
    Quit,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Upload => "Upload File",
            MenuItem::Camera => "Use Camera",
            MenuItem::EnterPath => "画像のパスを入力",
            MenuItem::SwitchToCamera => "Switch to Camera",
            MenuItem::Back => "戻る",
            MenuItem::Quit => "終了",
        }
    }
}

/// 現在のモードで出すメニュー
pub fn menu_for(mode: CaptureMode, offers_camera_switch: bool) -> Vec<MenuItem> {
    match mode {
        CaptureMode::None => vec![MenuItem::Upload, MenuItem::Camera, MenuItem::Quit],
        CaptureMode::Upload => {
            let mut items = vec![MenuItem::EnterPath];
            if offers_camera_switch {
                items.push(MenuItem::SwitchToCamera);
            }
            items.push(MenuItem::Back);
            items
        }
        CaptureMode::Camera => vec![MenuItem::Back],
    }
}

/// 画像が選ばれるまで対話する。終了を選んだら `None`。
pub fn select_image<S: Scheduler>(orchestrator: &mut Orchestrator<S>) -> Result<Option<LoadedImage>> {
    loop {
        let mode = orchestrator.mode();

        // 端末にはカメラが無いので、選ばれたら通知してモード選択へ戻す
        if mode == CaptureMode::Camera {
            report(&CaptureError::CameraUnavailable("no camera device in a terminal".into()));
            orchestrator.reset();
            continue;
        }

        let items = menu_for(mode, orchestrator.offers_camera_switch());
        let labels: Vec<&str> = items.iter().map(|item| item.label()).collect();
        let prompt = match mode {
            CaptureMode::Upload => "Upload Product Image",
            _ => "画像の取り込み方法を選択",
        };

        let choice = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()?;

        match items[choice] {
            MenuItem::Upload => {
                orchestrator.choose_mode(CaptureMode::Upload)?;
            }
            MenuItem::Camera | MenuItem::SwitchToCamera => {
                orchestrator.choose_mode(CaptureMode::Camera)?;
            }
            MenuItem::EnterPath => {
                let input: String = Input::new()
                    .with_prompt("画像ファイル (JPG, PNG, WebP)")
                    .interact_text()?;
                let path = PathBuf::from(input.trim());

                match capture::load_image(&path) {
                    Ok(loaded) => return Ok(Some(loaded)),
                    Err(Back2woError::Capture(err)) => report(&err),
                    Err(err) => println!("⚠ {}", err),
                }
            }
            MenuItem::Back => orchestrator.reset(),
            MenuItem::Quit => return Ok(None),
        }
    }
}

fn report(err: &CaptureError) {
    tracing::warn!(%err, "capture failed");
    match err.user_message() {
        Some(message) => println!("⚠ {}", message),
        None => println!("⚠ {}", err),
    }
}
