use crate::app::AppContext;
use crate::notify::Notification;
use dioxus::prelude::*;

#[component]
pub fn NotificationStack(items: Vec<Notification>) -> Element {
    rsx! {
        div { class: "notifications",
            for item in items {
                NotificationToast { key: "{item.id}", item: item.clone() }
            }
        }
    }
}

#[component]
fn NotificationToast(item: Notification) -> Element {
    let ctx = use_context::<AppContext>();
    let id = item.id;
    let class = format!("notification {} show", item.level.class());
    rsx! {
        div {
            class: "{class}",
            onclick: move |_| ctx.notifier.dismiss(id),
            "{item.message}"
        }
    }
}
