//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="brand-mark">"✨"</div>
            <div>
                <h1>"Back2Wo"</h1>
                <p class="text-muted">"Centsible AI Agent Marketplace"</p>
            </div>
        </header>
    }
}
