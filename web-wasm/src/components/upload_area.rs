//! アップロードエリアコンポーネント
//!
//! ファイル選択・ドラッグ&ドロップ・端末カメラ（capture属性）の3経路

use back2wo_common::capture::{admit, ACCEPT_IMAGES, SUPPORTED_FORMATS_LABEL};
use back2wo_common::{CaptureError, CaptureSource};
use leptos::html::Input;
use leptos::logging::{log, warn};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileReader, HtmlInputElement};

#[component]
pub fn UploadArea<F, E>(on_capture: F, on_error: E) -> impl IntoView
where
    F: Fn(CaptureSource, String) + 'static + Clone + Send + Sync,
    E: Fn(CaptureError) + 'static + Clone + Send + Sync,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let file_input = NodeRef::<Input>::new();
    let camera_input = NodeRef::<Input>::new();

    let on_drop = {
        let on_capture = on_capture.clone();
        let on_error = on_error.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            let file = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            let mime = file.as_ref().map(|f| f.type_());

            match admit(CaptureSource::Drop, mime.as_deref()) {
                Ok(()) => {
                    if let Some(file) = file {
                        read_file(file, CaptureSource::Drop, on_capture.clone(), on_error.clone());
                    }
                }
                Err(err) => log!("drop ignored: {}", err),
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|files| files.get(0));
        let mime = file.as_ref().map(|f| f.type_());

        match admit(CaptureSource::FilePicker, mime.as_deref()) {
            Ok(()) => {
                if let Some(file) = file {
                    read_file(file, CaptureSource::FilePicker, on_capture.clone(), on_error.clone());
                }
            }
            Err(err) => log!("file selection ignored: {}", err),
        }
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
    };

    let open_file_picker = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let open_device_camera = move |_| {
        if let Some(input) = camera_input.get() {
            input.click();
        }
    };

    view! {
        <div
            class=move || {
                if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
        >
            <div class="upload-icon">"🖼️"</div>
            <h3>"Upload Your Product"</h3>
            <p class="text-muted">"Drag & drop an image here, or choose a file"</p>

            <div class="upload-buttons">
                <button class="btn btn-primary" on:click=open_file_picker>"Upload File"</button>
                <button class="btn btn-secondary" on:click=open_device_camera>"Take Photo"</button>
            </div>

            <p class="text-muted">{SUPPORTED_FORMATS_LABEL}</p>

            <input
                node_ref=file_input
                type="file"
                accept=ACCEPT_IMAGES
                class="hidden"
                on:change=on_change.clone()
            />
            <input
                node_ref=camera_input
                type="file"
                accept=ACCEPT_IMAGES
                capture="environment"
                class="hidden"
                on:change=on_change
            />
        </div>
    }
}

/// FileReaderでData URLに変換して渡す
///
/// 読み込みに失敗したら `Encoding` を `on_error` に渡す。
fn read_file<F, E>(file: File, source: CaptureSource, on_capture: F, on_error: E)
where
    F: Fn(CaptureSource, String) + 'static,
    E: Fn(CaptureError) + 'static + Clone,
{
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            on_error(CaptureError::Encoding(format!("{:?}", e)));
            return;
        }
    };

    let reader_clone = reader.clone();
    let on_loadend_error = on_error.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        match data_url_from_result(reader_clone.result()) {
            Ok(data_url) => on_capture(source, data_url),
            Err(err) => on_loadend_error(err),
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onloadend(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        warn!("failed to read {}: {:?}", file.name(), e);
        on_error(CaptureError::Encoding(format!("{:?}", e)));
    }
}

/// FileReader.result を Data URL 文字列として取り出す
fn data_url_from_result(result: Result<JsValue, JsValue>) -> Result<String, CaptureError> {
    let value = result.map_err(|e| CaptureError::Encoding(format!("{:?}", e)))?;
    value
        .as_string()
        .ok_or_else(|| CaptureError::Encoding("file reader result is not a string".into()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_data_url_from_string_result() {
        let value = JsValue::from_str("data:image/png;base64,iVBO");
        assert_eq!(data_url_from_result(Ok(value)), Ok("data:image/png;base64,iVBO".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_non_string_result_is_encoding_error() {
        // 読み込み中断時は result が null になる
        let err = data_url_from_result(Ok(JsValue::NULL)).unwrap_err();
        assert!(matches!(err, CaptureError::Encoding(_)));
        assert!(err.user_message().is_some());
    }

    #[wasm_bindgen_test]
    fn test_reader_error_is_encoding_error() {
        let err = data_url_from_result(Err(JsValue::from_str("InvalidStateError"))).unwrap_err();
        assert!(matches!(err, CaptureError::Encoding(_)));
    }
}
