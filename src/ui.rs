use crate::app::{AppContext, Section, View};
use crate::bridge::{self, RawAction, SEARCH_INPUT_ID, UiAction};
use crate::notify::Notification;
use crate::views::{ChatPanel, FeedView, ModalLayer, NotificationStack};
use dioxus::prelude::*;
use std::time::{Duration, Instant};

const CAPAFRONT_CSS: Asset = asset!("/assets/capafront.css");
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let view = use_signal(|| ctx.view.snapshot());
    let notifications = use_signal(Vec::<Notification>::new);

    use_startup(ctx.clone());
    use_repaint(ctx.clone(), view, notifications);
    use_action_bridge(ctx);

    let snapshot = view();

    rsx! {
        document::Link { rel: "stylesheet", href: CAPAFRONT_CSS }
        AppHeader { section: snapshot.section, user_actions: snapshot.user_actions_html.clone() }
        div { class: "layout",
            FeedView {
                posts_html: snapshot.posts_html.clone(),
                categories_html: snapshot.categories_html.clone(),
            }
            ChatPanel { messages_html: snapshot.messages_html.clone() }
        }
        ModalLayer { open: snapshot.open_modals.clone(), edit_draft: snapshot.edit_draft.clone() }
        NotificationStack { items: notifications() }
    }
}

/// Runs the page-load sequence once.
fn use_startup(ctx: AppContext) {
    use_future(move || {
        let ctx = ctx.clone();
        async move {
            if ctx.start().await.is_some() {
                tracing::debug!("chat simulation running");
            }
        }
    });
}

/// Copies the shared view into signals whenever its revision moves, and
/// keeps the notification stack in step with the clock.
fn use_repaint(ctx: AppContext, view: Signal<View>, notifications: Signal<Vec<Notification>>) {
    use_future(move || {
        let ctx = ctx.clone();
        let mut view = view;
        let mut notifications = notifications;
        async move {
            let mut seen = ctx.view.revision();
            loop {
                let revision = ctx.view.revision();
                if revision != seen {
                    seen = revision;
                    view.set(ctx.view.snapshot());
                }

                let now = Instant::now();
                ctx.notifier.prune(now);
                let active = ctx.notifier.active(now);
                if *notifications.peek() != active {
                    notifications.set(active);
                }

                tokio::time::sleep(REPAINT_INTERVAL).await;
            }
        }
    });
}

/// Installs the click/keyboard script and forwards its actions.
fn use_action_bridge(ctx: AppContext) {
    use_future(move || {
        let ctx = ctx.clone();
        async move {
            let mut eval = document::eval(&bridge::action_listener_script());
            loop {
                match eval.recv::<RawAction>().await {
                    Ok(raw) => {
                        if let Some(action) = UiAction::parse(raw) {
                            let ctx = ctx.clone();
                            spawn(async move { ctx.dispatch(action).await });
                        }
                    }
                    Err(err) => {
                        tracing::warn!(?err, "ui bridge closed");
                        break;
                    }
                }
            }
        }
    });
}

#[component]
fn AppHeader(section: Section, user_actions: String) -> Element {
    let ctx = use_context::<AppContext>();
    let search_ctx = ctx.clone();

    rsx! {
        header { class: "header",
            div { class: "header-content",
                h1 { class: "logo", "CapaFront" }
                nav { class: "nav-menu",
                    for entry in Section::ALL {
                        NavLink { active: entry == section, section: entry }
                    }
                }
                input {
                    id: SEARCH_INPUT_ID,
                    class: "search-input",
                    r#type: "search",
                    placeholder: "Search posts (Ctrl+K)",
                    oninput: move |ev| {
                        let query = ev.value();
                        let ctx = search_ctx.clone();
                        spawn(async move { ctx.on_search_input(&query).await });
                    },
                }
                div { class: "user-actions", dangerous_inner_html: "{user_actions}" }
            }
        }
    }
}

#[component]
fn NavLink(active: bool, section: Section) -> Element {
    let ctx = use_context::<AppContext>();
    let class = if active { "nav-link active" } else { "nav-link" };
    rsx! {
        a {
            class: class,
            href: "#",
            onclick: move |ev| {
                ev.prevent_default();
                ctx.show_section(section);
            },
            "{section.label()}"
        }
    }
}
