//! Copilot chat window over the host [`platform_host::ChatService`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod conversation;

use desktop_app_contract::AppMountContext;
use leptos::ev::KeyboardEvent;
use leptos::*;
use platform_host::{send_chat_checked, ChatRole};

pub use conversation::{Conversation, CONNECTION_ERROR, GREETING};

/// Mounts a Copilot window.
pub fn mount_copilot(context: AppMountContext) -> View {
    view! { <CopilotApp context=context /> }.into_view()
}

#[component]
/// Copilot window contents.
pub fn CopilotApp(
    /// Runtime-provided mount context.
    context: AppMountContext,
) -> impl IntoView {
    let chat = context.services.chat.clone();
    let lifetime = context.lifetime.clone();
    let conversation = create_rw_signal(Conversation::default());
    let input = create_rw_signal(String::new());
    let scroll = create_node_ref::<html::Div>();

    create_effect(move |_| {
        conversation.with(|_| ());
        if let Some(scroll) = scroll.get() {
            scroll.set_scroll_top(scroll.scroll_height());
        }
    });

    let send = move || {
        let mut request = None;
        conversation.update(|c| request = c.begin_send(&input.get_untracked()));
        let Some(request) = request else {
            return;
        };
        input.set(String::new());
        let chat = chat.clone();
        let lifetime = lifetime.clone();
        spawn_local(async move {
            let result = send_chat_checked(&*chat, request).await;
            if let Err(err) = &result {
                logging::warn!("copilot request failed: {err}");
            }
            if !lifetime.is_cancelled() {
                conversation.update(|c| c.finish(result));
            }
        });
    };
    let send_on_enter = send.clone();

    view! {
        <div class="app-shell app-copilot-shell" data-ui-kind="app-shell">
            <div node_ref=scroll class="copilot-messages" role="log" aria-live="polite">
                <For
                    each=move || conversation.with(|c| c.messages().iter().cloned().enumerate().collect::<Vec<_>>())
                    key=|(idx, _)| *idx
                    let:entry
                >
                    {
                        let (_, message) = entry;
                        let class = match message.role {
                            ChatRole::User => "copilot-message user",
                            ChatRole::Model => "copilot-message model",
                        };
                        view! {
                            <div class=class>
                                {message.text}
                                {message
                                    .images
                                    .into_iter()
                                    .map(|src| {
                                        view! {
                                            <img class="copilot-image" src=src alt="Generated image" />
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    }
                </For>
                <Show when=move || conversation.with(Conversation::is_waiting) fallback=|| ()>
                    <div class="copilot-message model thinking">"Copilot is thinking..."</div>
                </Show>
            </div>
            <div class="copilot-input-row">
                <input
                    type="text"
                    placeholder="Ask me anything..."
                    autofocus=true
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=move |ev: KeyboardEvent| {
                        if ev.key() == "Enter" {
                            send_on_enter();
                        }
                    }
                />
                <button
                    type="button"
                    disabled=move || conversation.with(Conversation::is_waiting)
                    on:click=move |_| send()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}
