//! Chat page - View Component

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use thaw::*;

use super::view_model::ChatPageVm;
use crate::domain::chat::session::Sender;

#[component]
#[allow(non_snake_case)]
pub fn ChatPage() -> impl IntoView {
    let vm = ChatPageVm::new();
    let session = vm.session;
    let draft = vm.draft;
    let navigate = use_navigate();
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();

    let input_locked = Signal::derive(move || session.with(|s| s.input_locked));

    // Scroll to bottom helper
    let scroll_to_bottom = {
        let messages_container_ref = messages_container_ref.clone();
        move || {
            if let Some(container) = messages_container_ref.get() {
                request_animation_frame(move || {
                    container.set_scroll_top(container.scroll_height());
                });
            }
        }
    };

    // Keep the transcript pinned to its end as entries stream in.
    Effect::new({
        let scroll_to_bottom = scroll_to_bottom.clone();
        move |_| {
            session.track();
            scroll_to_bottom();
        }
    });

    let handle_send = Callback::new({
        let vm = vm.clone();
        move |_| vm.send_command()
    });

    let on_logout = {
        let vm = vm.clone();
        let navigate = navigate.clone();
        move |_| vm.logout_command(navigate.clone())
    };

    view! {
        <div style="height: 100vh; display: flex; flex-direction: column; padding: 16px;">
            // Header
            <Flex
                justify=FlexJustify::SpaceBetween
                align=FlexAlign::Center
                style="margin-bottom: 12px; padding-bottom: 12px; border-bottom: 1px solid var(--colorNeutralStroke2);"
            >
                <h1 style="font-size: 18px; font-weight: bold;">"WebAI"</h1>
                <Flex align=FlexAlign::Center style="gap: 12px;">
                    <span class=move || {
                        format!("status-dot {}", session.with(|s| s.connection.css_class()))
                    }></span>
                    <span
                        class="status-text"
                        style="font-size: 14px; color: var(--colorNeutralForeground3);"
                    >
                        {move || session.with(|s| s.connection.label())}
                    </span>
                    <Button appearance=ButtonAppearance::Secondary on_click=on_logout>
                        "Logout"
                    </Button>
                </Flex>
            </Flex>

            // Messages area
            <div
                node_ref=messages_container_ref
                style="flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 12px; margin-bottom: 16px; padding: 12px; background: var(--colorNeutralBackground1); border: 1px solid var(--colorNeutralStroke2); border-radius: 8px;"
            >
                <Show
                    when=move || session.with(|s| !s.messages.is_empty())
                    fallback=|| {
                        view! {
                            <div class="welcome-message" style="margin: auto; opacity: 0.7;">
                                "Send a message to start chatting."
                            </div>
                        }
                    }
                >
                    <For
                        each=move || {
                            session.with(|s| s.messages.iter().cloned().enumerate().collect::<Vec<_>>())
                        }
                        key=|(index, msg)| (*index, msg.text.clone(), msg.thinking, msg.error)
                        let:entry
                    >
                        {{
                            let (_, msg) = entry;
                            let is_user = matches!(msg.sender, Sender::User);
                            let mut content_class = String::from("message-content");
                            if msg.thinking {
                                content_class.push_str(" message-thinking");
                            }
                            if msg.error {
                                content_class.push_str(" message-error");
                            }
                            view! {
                                <div style=if is_user {
                                    "align-self: flex-end; max-width: 70%;"
                                } else {
                                    "align-self: flex-start; max-width: 70%;"
                                }>
                                    <div
                                        class="message-header"
                                        style="font-size: 11px; opacity: 0.7; margin-bottom: 4px;"
                                    >
                                        {if is_user { "You" } else { "WebAI" }}
                                    </div>
                                    <div
                                        class=content_class
                                        style=if is_user {
                                            "background: var(--colorBrandBackground2); padding: 10px 14px; border-radius: 12px; white-space: pre-wrap;"
                                        } else {
                                            "background: var(--colorNeutralBackground2); padding: 10px 14px; border-radius: 12px; white-space: pre-wrap;"
                                        }
                                    >
                                        {msg.text.clone()}
                                    </div>
                                </div>
                            }
                        }}
                    </For>
                </Show>
            </div>

            // Input area
            <Flex style="gap: 8px; align-items: flex-end;">
                <div style="flex: 1;">
                    <Textarea
                        value=draft
                        placeholder="Type your message... (Ctrl+Enter to send)"
                        attr:style="width: 100%; min-height: 60px; max-height: 160px; resize: vertical;"
                        disabled=input_locked
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Enter" && ev.ctrl_key() {
                                ev.prevent_default();
                                handle_send.run(());
                            }
                        }
                    />
                </div>

                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=input_locked
                    on_click=move |_| handle_send.run(())
                >
                    {move || if session.with(|s| s.input_locked) { "Sending..." } else { "Send" }}
                </Button>
            </Flex>
        </div>
    }
}
