use crate::app::{AppContext, Modal};
use dioxus::prelude::*;

#[component]
pub fn FeedView(posts_html: String, categories_html: String) -> Element {
    let ctx = use_context::<AppContext>();
    let signed_in = ctx.session.is_authenticated();

    rsx! {
        main { class: "main-container",
            div { class: "feed-toolbar",
                div { class: "categories", dangerous_inner_html: "{categories_html}" }
                if signed_in {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| ctx.show_modal(Modal::CreatePost),
                        "New Post"
                    }
                }
            }
            div { id: "postsContainer", class: "posts", dangerous_inner_html: "{posts_html}" }
        }
    }
}
