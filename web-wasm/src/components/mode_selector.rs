//! アップロード/カメラの選択

use back2wo_common::CaptureMode;
use leptos::prelude::*;

#[component]
pub fn ModeSelector<F>(on_choose: F) -> impl IntoView
where
    F: Fn(CaptureMode) + 'static + Clone + Send + Sync,
{
    let choose_upload = {
        let on_choose = on_choose.clone();
        move |_| on_choose(CaptureMode::Upload)
    };
    let choose_camera = move |_| on_choose(CaptureMode::Camera);

    view! {
        <div class="mode-selector">
            <h3>"Upload Your Product"</h3>
            <p class="text-muted">"Take a photo or upload an image to get started"</p>
            <div class="mode-buttons">
                <button class="btn btn-primary" on:click=choose_upload>"📁 Upload File"</button>
                <button class="btn btn-secondary" on:click=choose_camera>"📷 Use Camera"</button>
            </div>
        </div>
    }
}
