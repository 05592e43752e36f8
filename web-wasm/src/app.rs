//! メインアプリケーションコンポーネント

use std::rc::Rc;

use back2wo_common::{
    CaptureError, CaptureMode, CaptureSource, ModeFlow, Orchestrator, Timing, ViewState,
};
use leptos::logging::{log, warn};
use leptos::prelude::*;

use crate::components::{
    agent_chat::AgentChat,
    camera_capture::CameraCapture,
    header::Header,
    mode_selector::ModeSelector,
    product_analysis::ProductAnalysis,
    upload_area::UploadArea,
};
use crate::scheduler::{Deliver, GlooScheduler};

type Session = Orchestrator<GlooScheduler>;

/// オーケストレータへの唯一の入口
///
/// 変更のたびにスナップショットをシグナルへ流す。
#[derive(Clone, Copy)]
pub struct SessionHandle {
    session: StoredValue<Option<Session>, LocalStorage>,
    view: RwSignal<ViewState>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            session: StoredValue::new_local(None),
            view: RwSignal::new(ViewState::default()),
        }
    }

    fn install(&self, session: Session) {
        self.session.set_value(Some(session));
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let updated = self
            .session
            .try_update_value(|slot| {
                slot.as_mut().map(|session| {
                    let result = f(session);
                    (result, session.snapshot())
                })
            })
            .flatten();
        updated.map(|(result, snapshot)| {
            self.view.set(snapshot);
            result
        })
    }

    pub fn view(&self) -> ReadSignal<ViewState> {
        self.view.read_only()
    }
}

/// `?flow=direct-switch` でモード選択の構成を切り替える
pub fn flow_from_query(search: &str) -> ModeFlow {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "flow")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or_default()
}

fn current_flow() -> ModeFlow {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|search| flow_from_query(&search))
        .unwrap_or_default()
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let flow = current_flow();
    let handle = SessionHandle::new();

    // タイマーからのティックもSessionHandle経由で反映する
    let deliver: Deliver = Rc::new(move |tick| {
        handle.update(|session| session.on_tick(tick));
    });
    handle.install(Orchestrator::new(GlooScheduler::new(deliver), Timing::default(), flow));
    log!("back2wo started (flow: {})", flow);

    let view_state = handle.view();
    let (notice, set_notice) = signal(None::<String>);

    let has_image = Memo::new(move |_| view_state.with(|s| s.image.is_some()));
    let mode = Memo::new(move |_| view_state.with(|s| s.flags.mode));
    let show_results = Memo::new(move |_| view_state.with(|s| s.flags.show_results));
    let image_url = Memo::new(move |_| {
        view_state.with(|s| s.image.as_ref().map(|image| image.data_url().to_string()))
    });

    let on_capture = move |source: CaptureSource, data_url: String| {
        match handle.update(|session| session.submit_capture(source, data_url)) {
            Some(Ok(generation)) => {
                set_notice.set(None);
                log!("capture accepted ({:?}, generation {})", source, generation);
            }
            Some(Err(err)) => report_capture_error(err, set_notice),
            None => {}
        }
    };

    let on_capture_error = move |err: CaptureError| report_capture_error(err, set_notice);

    let on_choose = move |target: CaptureMode| {
        if let Some(Err(err)) = handle.update(|session| session.choose_mode(target)) {
            warn!("mode change rejected: {}", err);
        }
    };

    let on_reset = move |_| {
        set_notice.set(None);
        handle.update(|session| session.reset());
    };

    let offers_camera_switch = Memo::new(move |_| view_state.with(|s| s.offers_camera_switch));

    view! {
        <div class="app">
            <Header />

            <Show when=move || !has_image.get()>
                <section class="hero">
                    <h2>"AI Agents Working for You"</h2>
                    <p class="hero-lead">
                        "AI agents are designed to make decisions and achieve goals on behalf of users"
                    </p>
                    <p class="text-muted">
                        "Upload a product photo and watch our AI seller pitch it to our AI buyer, analyze materials, and connect with affordable & sustainable suppliers"
                    </p>
                </section>
            </Show>

            {move || notice.get().map(|message| view! {
                <div class="notice" role="alert">
                    <p>{message}</p>
                    <button class="btn btn-small" on:click=move |_| set_notice.set(None)>"Dismiss"</button>
                </div>
            })}

            <main class="container">
                {move || {
                    if has_image.get() {
                        view! {
                            <div class="results-grid">
                                <div class="results-left">
                                    <div class="image-card">
                                        <img
                                            src=move || image_url.get().unwrap_or_default()
                                            alt="Uploaded product"
                                        />
                                        <div class="image-actions">
                                            <button class="btn btn-tertiary" on:click=on_reset>
                                                "Upload New Image"
                                            </button>
                                        </div>
                                    </div>
                                    <Show when=move || show_results.get()>
                                        <ProductAnalysis />
                                    </Show>
                                </div>
                                <div class="results-right">
                                    <AgentChat view_state=view_state />
                                </div>
                            </div>
                        }
                        .into_any()
                    } else {
                        match mode.get() {
                            CaptureMode::None => view! { <ModeSelector on_choose=on_choose /> }.into_any(),
                            CaptureMode::Upload => view! {
                                <div class="capture-panel">
                                    <UploadArea on_capture=on_capture on_error=on_capture_error />
                                    <div class="capture-nav">
                                        <button class="btn btn-secondary" on:click=on_reset>"Back"</button>
                                        <Show when=move || offers_camera_switch.get()>
                                            <button
                                                class="btn btn-secondary"
                                                on:click=move |_| on_choose(CaptureMode::Camera)
                                            >
                                                "Switch to Camera"
                                            </button>
                                        </Show>
                                    </div>
                                </div>
                            }
                            .into_any(),
                            CaptureMode::Camera => view! {
                                <div class="capture-panel">
                                    <CameraCapture on_capture=on_capture on_error=on_capture_error />
                                    <div class="capture-nav">
                                        <button class="btn btn-secondary" on:click=on_reset>"Back"</button>
                                    </div>
                                </div>
                            }
                            .into_any(),
                        }
                    }
                }}
            </main>

            <footer class="footer">
                <p>"Back2Wo - Making sustainable commerce centsible with AI agents"</p>
            </footer>
        </div>
    }
}

/// 無視してよいエラーはログのみ、それ以外は一度だけ画面に出す
fn report_capture_error(err: CaptureError, set_notice: WriteSignal<Option<String>>) {
    if err.is_silent() {
        log!("capture ignored: {}", err);
        return;
    }
    warn!("capture failed: {}", err);
    set_notice.set(err.user_message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_from_query_default() {
        assert_eq!(flow_from_query(""), ModeFlow::Selector);
        assert_eq!(flow_from_query("?lang=en"), ModeFlow::Selector);
    }

    #[test]
    fn test_flow_from_query_direct_switch() {
        assert_eq!(flow_from_query("?flow=direct-switch"), ModeFlow::DirectSwitch);
        assert_eq!(flow_from_query("?lang=en&flow=direct"), ModeFlow::DirectSwitch);
    }

    #[test]
    fn test_flow_from_query_unknown_value() {
        assert_eq!(flow_from_query("?flow=hero"), ModeFlow::Selector);
    }
}
