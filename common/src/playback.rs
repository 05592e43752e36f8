//! 解析演出と会話再生のスケジューラ
//!
//! 画像1枚ごとに1回起動する:
//! 1. 解析中フラグを立て、会話をクリア
//! 2. `analysis_delay_ms` 後に解析完了（結果表示）
//! 3. その後 `reveal_interval_ms` ごとに台本を1行ずつ表示
//!
//! タイマーは `Scheduler` 越しに登録する。保留中のタスクは常に最大1つで、
//! 新しい再生・リセット時は先にキャンセルする。ティックは世代番号を持ち、古い世代は無視する。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::script::{NEGOTIATION_SCRIPT, SCRIPT_LEN};
use crate::types::RevealedLine;

pub const ANALYSIS_DELAY_MS: u64 = 2000;
pub const REVEAL_INTERVAL_MS: u64 = 1500;

/// 再生タイミング設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    pub analysis_delay_ms: u64,
    pub reveal_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            analysis_delay_ms: ANALYSIS_DELAY_MS,
            reveal_interval_ms: REVEAL_INTERVAL_MS,
        }
    }
}

impl Timing {
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// 解析開始から最終行までの所要時間
    pub fn total(&self) -> Duration {
        Duration::from_millis(
            self.reveal_interval_ms
                .saturating_mul(SCRIPT_LEN as u64)
                .saturating_add(self.analysis_delay_ms),
        )
    }
}

/// タイマーで実行する処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AnalysisDone,
    Reveal(usize),
}

/// スケジューラに登録する単位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub step: Step,
}

/// キャンセル可能なタスクハンドル
pub trait TaskHandle {
    fn cancel(self);
}

/// 遅延実行の仕組み（ブラウザ: gloo / CLI: tokio / テスト: 仮想時計）
pub trait Scheduler {
    type Handle: TaskHandle;

    /// 現在時刻（ミリ秒）
    fn now_ms(&self) -> u64;

    /// `delay` 後に `tick` を配送する
    fn schedule(&mut self, delay: Duration, tick: Tick) -> Self::Handle;
}

/// 再生フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Revealing { next: usize },
    Complete,
}

/// ティック処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AnalysisFinished { generation: u64 },
    Revealed { generation: u64, line: RevealedLine },
}

pub struct Playback<H: TaskHandle> {
    timing: Timing,
    generation: u64,
    phase: Phase,
    transcript: Vec<RevealedLine>,
    pending: Option<H>,
}

impl<H: TaskHandle> Playback<H> {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            generation: 0,
            phase: Phase::Idle,
            transcript: Vec::with_capacity(SCRIPT_LEN),
            pending: None,
        }
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[RevealedLine] {
        &self.transcript
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    pub fn shows_results(&self) -> bool {
        matches!(self.phase, Phase::Revealing { .. } | Phase::Complete)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// 新しい再生を開始し、その世代番号を返す
    pub fn start<S>(&mut self, scheduler: &mut S) -> u64
    where
        S: Scheduler<Handle = H>,
    {
        self.cancel_pending();
        self.generation += 1;
        self.transcript.clear();
        self.phase = Phase::Analyzing;

        let tick = Tick { generation: self.generation, step: Step::AnalysisDone };
        self.pending = Some(scheduler.schedule(self.timing.analysis_delay(), tick));
        tracing::debug!(generation = self.generation, "analysis started");
        self.generation
    }

    /// 再生を止めて初期状態に戻す
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.transcript.clear();
        self.phase = Phase::Idle;
    }

    /// 配送されたティックを処理する。古い世代・順序外のティックは無視。
    pub fn advance<S>(&mut self, tick: Tick, scheduler: &mut S) -> Option<Transition>
    where
        S: Scheduler<Handle = H>,
    {
        if tick.generation != self.generation {
            tracing::debug!(
                tick = tick.generation,
                current = self.generation,
                "stale tick ignored"
            );
            return None;
        }

        match (self.phase, tick.step) {
            (Phase::Analyzing, Step::AnalysisDone) => {
                // 発火済みのハンドルはキャンセル不要
                self.pending = None;
                self.phase = Phase::Revealing { next: 0 };
                self.schedule_reveal(0, scheduler);
                tracing::debug!(generation = self.generation, "analysis finished");
                Some(Transition::AnalysisFinished { generation: self.generation })
            }
            (Phase::Revealing { next }, Step::Reveal(index)) if index == next => {
                self.pending = None;
                let script = NEGOTIATION_SCRIPT[index];
                let line = RevealedLine {
                    index,
                    speaker: script.speaker,
                    text: script.text,
                    revealed_at_ms: scheduler.now_ms(),
                };
                self.transcript.push(line);

                if index + 1 < SCRIPT_LEN {
                    self.phase = Phase::Revealing { next: index + 1 };
                    self.schedule_reveal(index + 1, scheduler);
                } else {
                    self.phase = Phase::Complete;
                }
                tracing::debug!(generation = self.generation, index, speaker = %line.speaker, "line revealed");
                Some(Transition::Revealed { generation: self.generation, line })
            }
            (phase, step) => {
                tracing::debug!(?phase, ?step, "out-of-order tick ignored");
                None
            }
        }
    }

    fn schedule_reveal<S>(&mut self, index: usize, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        let tick = Tick { generation: self.generation, step: Step::Reveal(index) };
        self.pending = Some(scheduler.schedule(self.timing.reveal_interval(), tick));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}
