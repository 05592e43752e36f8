//! エージェント会話コンポーネント

use back2wo_common::script::STATUS_ANALYZING;
use back2wo_common::{RevealedLine, Speaker, ViewState};
use leptos::prelude::*;

#[component]
pub fn AgentChat(view_state: ReadSignal<ViewState>) -> impl IntoView {
    let is_analyzing = move || view_state.with(|s| s.flags.is_analyzing);
    let awaiting_next_line = move || view_state.with(|s| s.awaiting_next_line());
    let status_label = move || view_state.with(|s| s.status_label());

    view! {
        <div class="agent-chat">
            <div class="chat-header">
                <h3>"🤖 AI Agents Conversation"</h3>
                <p class="text-muted">"Seller & Buyer negotiating"</p>
            </div>

            <div class="chat-messages">
                <Show when=is_analyzing>
                    <div class="chat-analyzing">
                        <div class="spinner" />
                        <p>{STATUS_ANALYZING}</p>
                    </div>
                </Show>

                <For
                    each=move || view_state.with(|s| s.transcript.clone())
                    key=|line| (line.index, line.revealed_at_ms)
                    children=move |line| view! { <ChatBubble line=line /> }
                />

                <Show when=awaiting_next_line>
                    <div class="chat-row seller">
                        <div class="avatar seller">"🤖"</div>
                        <div class="typing-indicator">
                            <span class="dot" />
                            <span class="dot" />
                            <span class="dot" />
                        </div>
                    </div>
                </Show>
            </div>

            {move || status_label().map(|label| view! {
                <div class="chat-footer">
                    <p>{label}</p>
                </div>
            })}
        </div>
    }
}

#[component]
fn ChatBubble(line: RevealedLine) -> impl IntoView {
    let side = line.speaker.as_str();
    let is_seller = line.speaker == Speaker::Seller;

    view! {
        <div class=format!("chat-row {}", side)>
            {is_seller.then(|| view! { <div class="avatar seller">"🤖"</div> })}
            <div class=format!("chat-bubble {}", side)>
                <span class="chat-speaker">{line.speaker.label()}</span>
                <p>{line.text}</p>
            </div>
            {(!is_seller).then(|| view! { <div class="avatar buyer">"🤖"</div> })}
        </div>
    }
}
