use crate::app::{AppContext, EditDraft, Modal};
use crate::handlers::{EditPostForm, LoginForm, PostForm, RegisterForm, Submission};
use dioxus::prelude::*;
use std::collections::BTreeSet;

#[component]
pub fn ModalLayer(open: BTreeSet<Modal>, edit_draft: Option<EditDraft>) -> Element {
    rsx! {
        if open.contains(&Modal::Login) {
            LoginModal {}
        }
        if open.contains(&Modal::Register) {
            RegisterModal {}
        }
        if open.contains(&Modal::CreatePost) {
            CreatePostModal {}
        }
        if open.contains(&Modal::EditPost) {
            if let Some(draft) = edit_draft.clone() {
                EditPostModal { key: "{draft.post_id}", draft }
            }
        }
    }
}

/// Backdrop plus dialog box. Clicking the backdrop closes the modal.
#[component]
fn ModalFrame(modal: Modal, title: &'static str, children: Element) -> Element {
    let ctx = use_context::<AppContext>();
    let close_ctx = ctx.clone();

    rsx! {
        div {
            id: modal.dom_id(),
            class: "modal",
            style: "display: block;",
            onclick: move |_| ctx.close_modal(modal),
            div {
                class: "modal-content",
                onclick: move |ev| ev.stop_propagation(),
                div { class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "close",
                        r#type: "button",
                        onclick: move |_| close_ctx.close_modal(modal),
                        "×"
                    }
                }
                {children}
            }
        }
    }
}

#[component]
fn LoginModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let on_submit = move |ev: FormEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email(),
            password: password(),
        };
        let ctx = ctx.clone();
        spawn(async move {
            if ctx.handle_login(&form).await == Submission::Done {
                email.set(String::new());
                password.set(String::new());
            }
        });
    };

    rsx! {
        ModalFrame { modal: Modal::Login, title: "Sign in",
            form { id: "loginForm", onsubmit: on_submit,
                input {
                    id: "loginEmail",
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |ev| email.set(ev.value()),
                }
                input {
                    id: "loginPassword",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |ev| password.set(ev.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", "Sign in" }
            }
        }
    }
}

#[component]
fn RegisterModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let on_submit = move |ev: FormEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            username: username(),
            email: email(),
            password: password(),
        };
        let ctx = ctx.clone();
        spawn(async move {
            if ctx.handle_register(&form).await == Submission::Done {
                username.set(String::new());
                email.set(String::new());
                password.set(String::new());
            }
        });
    };

    rsx! {
        ModalFrame { modal: Modal::Register, title: "Create account",
            form { id: "registerForm", onsubmit: on_submit,
                input {
                    id: "registerUsername",
                    r#type: "text",
                    placeholder: "Username",
                    value: "{username}",
                    oninput: move |ev| username.set(ev.value()),
                }
                input {
                    id: "registerEmail",
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |ev| email.set(ev.value()),
                }
                input {
                    id: "registerPassword",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |ev| password.set(ev.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", "Register" }
            }
        }
    }
}

#[component]
fn PostFields(prefix: &'static str, fields: Signal<PostForm>) -> Element {
    let mut fields = fields;
    let current = fields();

    rsx! {
        input {
            id: "{prefix}Title",
            r#type: "text",
            placeholder: "Title",
            value: "{current.title}",
            oninput: move |ev| fields.write().title = ev.value(),
        }
        textarea {
            id: "{prefix}Content",
            rows: "6",
            placeholder: "What do you want to share?",
            value: "{current.content}",
            oninput: move |ev| fields.write().content = ev.value(),
        }
        input {
            id: "{prefix}Category",
            r#type: "text",
            placeholder: "Category (optional)",
            value: "{current.category}",
            oninput: move |ev| fields.write().category = ev.value(),
        }
        input {
            id: "{prefix}Tags",
            r#type: "text",
            placeholder: "Tags, separated by commas",
            value: "{current.tags}",
            oninput: move |ev| fields.write().tags = ev.value(),
        }
    }
}

#[component]
fn CreatePostModal() -> Element {
    let ctx = use_context::<AppContext>();
    let mut fields = use_signal(PostForm::default);

    let on_submit = move |ev: FormEvent| {
        ev.prevent_default();
        let form = fields();
        let ctx = ctx.clone();
        spawn(async move {
            if ctx.handle_create_post(&form).await == Submission::Done {
                fields.set(PostForm::default());
            }
        });
    };

    rsx! {
        ModalFrame { modal: Modal::CreatePost, title: "New post",
            form { id: "createPostForm", onsubmit: on_submit,
                PostFields { prefix: "post", fields }
                button { class: "btn btn-primary", r#type: "submit", "Publish" }
            }
        }
    }
}

#[component]
fn EditPostModal(draft: EditDraft) -> Element {
    let ctx = use_context::<AppContext>();
    let post_id = draft.post_id.clone();
    let fields = use_signal(move || EditPostForm::from(draft).post);

    let on_submit = move |ev: FormEvent| {
        ev.prevent_default();
        let form = EditPostForm {
            post_id: post_id.clone(),
            post: fields(),
        };
        let ctx = ctx.clone();
        spawn(async move {
            ctx.handle_edit_post(&form).await;
        });
    };

    rsx! {
        ModalFrame { modal: Modal::EditPost, title: "Edit post",
            form { id: "editPostForm", onsubmit: on_submit,
                PostFields { prefix: "editPost", fields }
                button { class: "btn btn-primary", r#type: "submit", "Save changes" }
            }
        }
    }
}
