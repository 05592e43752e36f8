//! tokio タイマーによるリアルタイム再生
//!
//! タイマータスクはティックをチャネルに送るだけ。オーケストレータはこのループだけが触る。

use crate::capture::LoadedImage;
use crate::error::Result;
use crate::presenter;
use back2wo_common::{ModeFlow, Orchestrator, Phase, Scheduler, TaskHandle, Tick, Timing, Transition};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub struct TokioScheduler {
    tx: UnboundedSender<Tick>,
}

/// abort でタイマーを取り消す
pub struct TokioHandle(JoinHandle<()>);

impl TaskHandle for TokioHandle {
    fn cancel(self) {
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioHandle;

    fn now_ms(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TokioHandle {
        let tx = self.tx.clone();
        TokioHandle(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // 受信側が先に終了していれば捨てる
            let _ = tx.send(tick);
        }))
    }
}

/// 再生結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub submitted: usize,
    pub revealed: usize,
    pub completed: bool,
    pub interrupted: bool,
}

pub struct Player {
    orchestrator: Orchestrator<TokioScheduler>,
    ticks: UnboundedReceiver<Tick>,
}

enum Outcome {
    Completed,
    Superseded,
    Interrupted,
}

impl Player {
    pub fn new(timing: Timing, flow: ModeFlow) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        let orchestrator = Orchestrator::new(TokioScheduler { tx }, timing, flow);
        Self { orchestrator, ticks }
    }

    pub fn orchestrator_mut(&mut self) -> &mut Orchestrator<TokioScheduler> {
        &mut self.orchestrator
    }

    /// 画像を順に投入して再生する
    ///
    /// `resubmit_after` があれば、その時間後に再生途中でも次の画像を投入する。
    pub async fn play(&mut self, images: &[LoadedImage], resubmit_after: Option<Duration>) -> Result<PlaybackReport> {
        let mut report = PlaybackReport::default();

        for (i, loaded) in images.iter().enumerate() {
            println!(
                "📷 {} ({}x{}, {})",
                loaded.file_name,
                loaded.width,
                loaded.height,
                loaded.image.mime_type()
            );
            self.orchestrator.submit_image(loaded.image.clone());
            report.submitted += 1;

            let deadline = match resubmit_after {
                Some(after) if i + 1 < images.len() => Some(Instant::now() + after),
                _ => None,
            };

            match self.play_one(&loaded.file_name, deadline, &mut report).await {
                Outcome::Completed => report.completed = true,
                Outcome::Superseded => {
                    report.completed = false;
                    println!("↻ 次の画像を投入します\n");
                }
                Outcome::Interrupted => {
                    report.interrupted = true;
                    self.orchestrator.reset();
                    println!("\n中断しました");
                    break;
                }
            }
        }

        Ok(report)
    }

    async fn play_one(&mut self, file_name: &str, deadline: Option<Instant>, report: &mut PlaybackReport) -> Outcome {
        let mut spinner = Some(presenter::analyzing_spinner(file_name));
        let resubmit_at = deadline.unwrap_or_else(Instant::now);

        let outcome = loop {
            tokio::select! {
                Some(tick) = self.ticks.recv() => {
                    match self.orchestrator.on_tick(tick) {
                        Some(Transition::AnalysisFinished { .. }) => {
                            if let Some(spinner) = spinner.take() {
                                spinner.finish_and_clear();
                            }
                            println!("✔ 解析完了\n");
                            presenter::print_analysis_panel();
                            println!("🤖 AI Agents Conversation\n");
                        }
                        Some(Transition::Revealed { line, .. }) => {
                            report.revealed += 1;
                            presenter::print_line(&line);
                        }
                        None => {}
                    }
                    if self.orchestrator.phase() == Phase::Complete {
                        presenter::print_deal();
                        break Outcome::Completed;
                    }
                }
                _ = tokio::time::sleep_until(resubmit_at), if deadline.is_some() => {
                    break Outcome::Superseded;
                }
                _ = tokio::signal::ctrl_c() => {
                    break Outcome::Interrupted;
                }
            }
        };

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use back2wo_common::{CapturedImage, SCRIPT_LEN};

    fn loaded(name: &str) -> LoadedImage {
        LoadedImage {
            file_name: name.to_string(),
            width: 1,
            height: 1,
            image: CapturedImage::from_bytes("image/png", b"\x89PNG").unwrap(),
        }
    }

    fn fast() -> Timing {
        Timing { analysis_delay_ms: 20, reveal_interval_ms: 5 }
    }

    #[tokio::test]
    async fn test_play_single_image_reveals_whole_script() {
        let mut player = Player::new(fast(), ModeFlow::Selector);
        let report = player.play(&[loaded("a.png")], None).await.unwrap();

        assert_eq!(report.submitted, 1);
        assert_eq!(report.revealed, SCRIPT_LEN);
        assert!(report.completed);
        assert_eq!(player.orchestrator_mut().transcript().len(), SCRIPT_LEN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_discards_previous_playback() {
        let timing = Timing { analysis_delay_ms: 2000, reveal_interval_ms: 1500 };
        let mut player = Player::new(timing, ModeFlow::Selector);
        let report = player
            .play(&[loaded("a.png"), loaded("b.png")], Some(Duration::from_millis(500)))
            .await
            .unwrap();

        assert_eq!(report.submitted, 2);
        assert_eq!(report.revealed, SCRIPT_LEN);
        assert!(report.completed);
        assert_eq!(player.orchestrator_mut().generation(), 2);
    }
}
