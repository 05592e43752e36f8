//! カメラ撮影コンポーネント
//!
//! getUserMedia のストリームは CameraSlot が保持し、アンマウント時に必ず解放する。

use back2wo_common::capture::CAMERA_FRAME_MIME;
use back2wo_common::{settle_stream, CameraSlot, CaptureError, CaptureSource, DeviceStream, FrameSize};
use leptos::html::{Canvas, Video};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

struct CameraStream(MediaStream);

impl DeviceStream for CameraStream {
    fn release(&self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

#[component]
pub fn CameraCapture<F, E>(on_capture: F, on_error: E) -> impl IntoView
where
    F: Fn(CaptureSource, String) + 'static + Clone + Send + Sync,
    E: Fn(CaptureError) + 'static + Clone + Send + Sync,
{
    let video_ref = NodeRef::<Video>::new();
    let canvas_ref = NodeRef::<Canvas>::new();
    let camera = StoredValue::new_local(CameraSlot::<CameraStream>::new());
    let (is_streaming, set_is_streaming) = signal(false);
    let (is_requesting, set_is_requesting) = signal(false);

    on_cleanup(move || {
        camera.try_update_value(|slot| slot.stop());
    });

    let start_camera = {
        let on_error = on_error.clone();
        move |_| {
            // 前のストリームは新しい要求の前に止める
            let Some(request) = camera.try_update_value(|slot| slot.begin_request()) else {
                return;
            };
            set_is_streaming.set(false);
            set_is_requesting.set(true);

            let on_error = on_error.clone();
            spawn_local(async move {
                let result = request_stream().await;
                set_is_requesting.try_set(false);
                match result {
                    Ok(stream) => {
                        // Stop やアンマウントの後に届いたストリームはここで解放される
                        let accepted = settle_stream(request, CameraStream(stream.clone()), |hand_over| {
                            camera.try_update_value(|slot| hand_over(slot)).is_some()
                        });
                        if !accepted {
                            log!("camera stream discarded (request {})", request);
                            return;
                        }
                        if let Some(video) = video_ref.get_untracked() {
                            video.set_src_object(Some(&stream));
                        }
                        set_is_streaming.set(true);
                    }
                    Err(err) => on_error(err),
                }
            });
        }
    };

    let capture_photo = {
        let on_error = on_error.clone();
        move |_| {
            if !camera.with_value(|slot| slot.is_active()) {
                on_error(CaptureError::NoActiveFrame);
                return;
            }
            let (Some(video), Some(canvas)) = (video_ref.get(), canvas_ref.get()) else {
                on_error(CaptureError::NoActiveFrame);
                return;
            };
            match grab_frame(&video, &canvas) {
                Ok(data_url) => on_capture(CaptureSource::Camera, data_url),
                Err(err) => on_error(err),
            }
        }
    };

    let stop_camera = move |_| {
        camera.update_value(|slot| {
            slot.stop();
        });
        if let Some(video) = video_ref.get() {
            video.set_src_object(None);
        }
        set_is_streaming.set(false);
        set_is_requesting.set(false);
    };

    view! {
        <div class="camera-capture">
            <video node_ref=video_ref class="camera-preview" autoplay=true playsinline=true muted=true />
            <canvas node_ref=canvas_ref style="display: none" />
            <div class="camera-actions">
                <button class="btn btn-primary" on:click=start_camera>
                    {move || if is_streaming.get() { "Restart Camera" } else { "Start Camera" }}
                </button>
                <button
                    class="btn btn-secondary"
                    disabled=move || !is_streaming.get()
                    on:click=capture_photo
                >
                    "Capture"
                </button>
                <button
                    class="btn btn-tertiary"
                    disabled=move || !is_streaming.get() && !is_requesting.get()
                    on:click=stop_camera
                >
                    "Stop"
                </button>
            </div>
        </div>
    }
}

async fn request_stream() -> Result<MediaStream, CaptureError> {
    let unavailable = |e: JsValue| CaptureError::CameraUnavailable(format!("{:?}", e));

    let window = web_sys::window()
        .ok_or_else(|| CaptureError::CameraUnavailable("no window".into()))?;
    let devices = window.navigator().media_devices().map_err(unavailable)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(unavailable)?;

    let stream = JsFuture::from(promise).await.map_err(unavailable)?;
    stream.dyn_into::<MediaStream>().map_err(unavailable)
}

/// 現在のフレームをネイティブ解像度でcanvasに描いてPNGのData URLにする
fn grab_frame(video: &HtmlVideoElement, canvas: &HtmlCanvasElement) -> Result<String, CaptureError> {
    let encoding = |e: JsValue| CaptureError::Encoding(format!("{:?}", e));

    let size = FrameSize::from_video(video.video_width(), video.video_height())?;
    canvas.set_width(size.width);
    canvas.set_height(size.height);

    let context = canvas
        .get_context("2d")
        .map_err(encoding)?
        .ok_or_else(|| CaptureError::Encoding("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CaptureError::Encoding("unexpected context type".into()))?;

    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(encoding)?;
    canvas.to_data_url_with_type(CAMERA_FRAME_MIME).map_err(encoding)
}
