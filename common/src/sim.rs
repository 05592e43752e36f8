//! 仮想時計によるスケジューラとシミュレーション
//!
//! テストとCLIの `timeline` コマンドで使う。実時間は待たない。

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::mode::ModeFlow;
use crate::orchestrator::Orchestrator;
use crate::playback::{Scheduler, TaskHandle, Tick, Timing, Transition};
use crate::types::{CapturedImage, Speaker};

#[derive(Debug)]
struct Entry {
    id: u64,
    due_ms: u64,
    tick: Tick,
}

#[derive(Debug, Default)]
struct Queue {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

/// 仮想時計スケジューラ
///
/// クローンは同じキューを共有する。
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

pub struct ManualHandle {
    id: u64,
    queue: Rc<RefCell<Queue>>,
}

impl TaskHandle for ManualHandle {
    fn cancel(self) {
        self.queue.borrow_mut().entries.retain(|e| e.id != self.id);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未配送のタスク数
    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    /// 次に配送されるタスクの予定時刻
    pub fn next_due(&self) -> Option<u64> {
        self.queue.borrow().entries.iter().map(|e| e.due_ms).min()
    }

    /// `until_ms` までに期限が来るタスクを1つ取り出し、時計をその時刻に進める
    pub fn pop_due(&self, until_ms: u64) -> Option<Tick> {
        let mut queue = self.queue.borrow_mut();
        let position = queue
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.id))
            .map(|(i, _)| i)?;
        let entry = queue.entries.remove(position);
        queue.now_ms = queue.now_ms.max(entry.due_ms);
        Some(entry.tick)
    }

    /// 時計を進める（巻き戻しはしない）
    pub fn set_now(&self, now_ms: u64) {
        let mut queue = self.queue.borrow_mut();
        queue.now_ms = queue.now_ms.max(now_ms);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn now_ms(&self) -> u64 {
        self.queue.borrow().now_ms
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let due_ms = queue.now_ms.saturating_add(delay_ms);
        queue.entries.push(Entry { id, due_ms, tick });
        ManualHandle { id, queue: Rc::clone(&self.queue) }
    }
}

/// タイムライン上の出来事
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum TimelineEvent {
    #[serde(rename_all = "camelCase")]
    Submitted { generation: u64, mime: String },
    Reset,
    #[serde(rename_all = "camelCase")]
    AnalysisFinished { generation: u64 },
    #[serde(rename_all = "camelCase")]
    Revealed {
        generation: u64,
        index: usize,
        speaker: Speaker,
        text: &'static str,
    },
}

impl From<Transition> for TimelineEvent {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::AnalysisFinished { generation } => TimelineEvent::AnalysisFinished { generation },
            Transition::Revealed { generation, line } => TimelineEvent::Revealed {
                generation,
                index: line.index,
                speaker: line.speaker,
                text: line.text,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: TimelineEvent,
}

/// 仮想時計上でオーケストレータを動かし、出来事を記録する
pub struct Simulation {
    clock: ManualScheduler,
    orchestrator: Orchestrator<ManualScheduler>,
    timeline: Vec<TimelineEntry>,
}

impl Simulation {
    pub fn new(timing: Timing, flow: ModeFlow) -> Self {
        let clock = ManualScheduler::new();
        let orchestrator = Orchestrator::new(clock.clone(), timing, flow);
        Self { clock, orchestrator, timeline: Vec::new() }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &ManualScheduler {
        &self.clock
    }

    pub fn orchestrator(&self) -> &Orchestrator<ManualScheduler> {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut Orchestrator<ManualScheduler> {
        &mut self.orchestrator
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn into_timeline(self) -> Vec<TimelineEntry> {
        self.timeline
    }

    /// `at_ms` まで進めてから画像を投入
    pub fn submit_at(&mut self, at_ms: u64, image: CapturedImage) -> u64 {
        self.advance_to(at_ms);
        let mime = image.mime_type().to_string();
        let generation = self.orchestrator.submit_image(image);
        self.record(TimelineEvent::Submitted { generation, mime });
        generation
    }

    /// `at_ms` まで進めてからリセット
    pub fn reset_at(&mut self, at_ms: u64) {
        self.advance_to(at_ms);
        self.orchestrator.reset();
        self.record(TimelineEvent::Reset);
    }

    /// `until_ms` までの期限到来タスクを順に配送する
    pub fn advance_to(&mut self, until_ms: u64) {
        while let Some(tick) = self.clock.pop_due(until_ms) {
            if let Some(transition) = self.orchestrator.on_tick(tick) {
                self.record(transition.into());
            }
        }
        self.clock.set_now(until_ms);
    }

    /// 保留タスクが無くなるまで進める
    pub fn run_to_idle(&mut self) {
        while let Some(due) = self.clock.next_due() {
            self.advance_to(due);
        }
    }

    fn record(&mut self, event: TimelineEvent) {
        self.timeline.push(TimelineEntry { at_ms: self.clock.now_ms(), event });
    }
}
