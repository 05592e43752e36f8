//! Back2Wo Common Library
//!
//! CLIとWeb(WASM)で共有される型・固定データ・再生ステートマシン

pub mod types;
pub mod error;
pub mod script;
pub mod catalog;
pub mod capture;
pub mod mode;
pub mod playback;
pub mod orchestrator;
pub mod sim;

pub use types::{CaptureMode, CapturedImage, RevealedLine, ScriptLine, Speaker, ViewFlags};
pub use error::{Error, Result};
pub use script::{NEGOTIATION_SCRIPT, SCRIPT_LEN};
pub use catalog::{Finding, FindingKind, SupplierRecord, FINDINGS, SUPPLIERS};
pub use capture::{settle_stream, CameraSlot, CaptureError, CaptureSource, DeviceStream, FrameSize};
pub use mode::{ModeFlow, ModeSelector, ModeTransitionError};
pub use playback::{Phase, Playback, Scheduler, Step, TaskHandle, Tick, Timing, Transition};
pub use orchestrator::{Orchestrator, ViewState};
pub use sim::{ManualScheduler, Simulation, TimelineEntry, TimelineEvent};
