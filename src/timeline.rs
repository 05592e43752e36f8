//! 仮想時計での再生
//!
//! 実時間を待たずに、投入・解析完了・会話表示の全イベントを時刻付きで得る。

use crate::capture::LoadedImage;
use crate::presenter;
use back2wo_common::{ModeFlow, Simulation, TimelineEntry, Timing};

/// 仮想再生の条件
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineOptions {
    /// 次の画像を投入するまで（省略時は一回分の再生時間）
    pub resubmit_after_ms: Option<u64>,
    /// この時刻にリセット
    pub reset_at_ms: Option<u64>,
}

/// 画像を順に投入し、保留タスクが無くなるまで進める
pub fn simulate(images: &[LoadedImage], timing: Timing, flow: ModeFlow, options: TimelineOptions) -> Vec<TimelineEntry> {
    let step = options
        .resubmit_after_ms
        .unwrap_or_else(|| u64::try_from(timing.total().as_millis()).unwrap_or(u64::MAX));

    let mut sim = Simulation::new(timing, flow);
    let mut reset_pending = options.reset_at_ms;

    for (i, loaded) in images.iter().enumerate() {
        let at = step.saturating_mul(i as u64);
        if let Some(reset_at) = reset_pending.filter(|&r| r <= at) {
            sim.reset_at(reset_at);
            reset_pending = None;
        }
        sim.submit_at(at, loaded.image.clone());
    }

    if let Some(reset_at) = reset_pending {
        sim.reset_at(reset_at);
    }
    sim.run_to_idle();

    tracing::debug!(events = sim.timeline().len(), "simulation finished");
    sim.into_timeline()
}

pub fn render_text(entries: &[TimelineEntry]) -> String {
    entries
        .iter()
        .map(presenter::format_timeline_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(entries: &[TimelineEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
