//! gloo のタイマーで動くスケジューラ

use std::rc::Rc;
use std::time::Duration;

use back2wo_common::{Scheduler, TaskHandle, Tick};
use gloo::timers::callback::Timeout;

/// ティックの配送先
pub type Deliver = Rc<dyn Fn(Tick)>;

pub struct GlooScheduler {
    deliver: Deliver,
}

impl GlooScheduler {
    pub fn new(deliver: Deliver) -> Self {
        Self { deliver }
    }
}

/// 破棄またはキャンセルで clearTimeout される
pub struct TimerHandle(Timeout);

impl TaskHandle for TimerHandle {
    fn cancel(self) {
        self.0.cancel();
    }
}

impl Scheduler for GlooScheduler {
    type Handle = TimerHandle;

    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerHandle {
        let deliver = Rc::clone(&self.deliver);
        // setTimeout は i32 を超える遅延を即時実行にしてしまう
        let millis = u32::try_from(delay.as_millis().min(i32::MAX as u128)).unwrap_or(i32::MAX as u32);
        // 配送中にこの Timeout 自身が破棄されるので、コールバックを抜けてから配送する
        TimerHandle(Timeout::new(millis, move || {
            wasm_bindgen_futures::spawn_local(async move { deliver(tick) });
        }))
    }
}
