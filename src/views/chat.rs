use crate::app::AppContext;
use crate::handlers::Submission;
use dioxus::events::Key;
use dioxus::prelude::*;

#[component]
pub fn ChatPanel(messages_html: String) -> Element {
    let ctx = use_context::<AppContext>();
    let mut input = use_signal(String::new);
    let sending = use_signal(|| false);

    let mut send = {
        let mut input_signal = input;
        let mut sending_signal = sending;
        move || {
            let text = input_signal();
            if text.trim().is_empty() || sending_signal() {
                return;
            }
            sending_signal.set(true);
            let ctx = ctx.clone();
            spawn(async move {
                if ctx.send_message(&text).await == Submission::Done {
                    input_signal.set(String::new());
                }
                sending_signal.set(false);
            });
        }
    };

    rsx! {
        aside { class: "chat-panel",
            h3 { class: "section-title", "Live chat" }
            div { id: "chatMessages", class: "chat-messages", dangerous_inner_html: "{messages_html}" }
            div { class: "chat-input",
                input {
                    id: "chatInput",
                    r#type: "text",
                    placeholder: "Write a message...",
                    value: "{input}",
                    disabled: sending(),
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter {
                            ev.prevent_default();
                            send();
                        }
                    },
                }
            }
        }
    }
}
