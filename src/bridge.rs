//! Bridge between rendered markup and the Rust handlers.
//!
//! Rendered fragments are plain HTML, so their buttons cannot carry Rust
//! closures. Instead each control has a `data-action` attribute; the script
//! below listens for clicks at the document level and forwards the action
//! through `dioxus.send`, where it is parsed into a [`UiAction`].
//!
//! The same script owns the global keyboard shortcuts.

use crate::app::Modal;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiAction {
    ReloadPosts,
    EditPost(String),
    DeletePost(String),
    FilterCategory(String),
    OpenModal(Modal),
    CloseModals,
    Logout,
}

/// What the script sends over the wire.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAction {
    pub action: String,
    #[serde(rename = "postId", default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub modal: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl UiAction {
    pub fn parse(raw: RawAction) -> Option<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        match raw.action.as_str() {
            "reload-posts" => Some(UiAction::ReloadPosts),
            "edit-post" => non_empty(raw.post_id).map(UiAction::EditPost),
            "delete-post" => non_empty(raw.post_id).map(UiAction::DeletePost),
            "filter-category" => non_empty(raw.category).map(UiAction::FilterCategory),
            "open-modal" => raw
                .modal
                .as_deref()
                .and_then(Modal::from_dom_id)
                .map(UiAction::OpenModal),
            "close-modals" => Some(UiAction::CloseModals),
            "logout" => Some(UiAction::Logout),
            other => {
                tracing::warn!(action = other, "unknown ui action");
                None
            }
        }
    }
}

/// Click delegation and keyboard shortcuts, evaluated once at startup.
///
/// - Ctrl/Cmd+K focuses `#searchInput`
/// - Escape closes every modal
/// - delete asks for confirmation before it is forwarded
pub fn action_listener_script() -> String {
    format!(
        r#"
(function() {{
    'use strict';

    document.addEventListener('click', function(event) {{
        const target = event.target.closest('[data-action]');
        if (!target) return;
        const data = target.dataset;
        if (data.action === 'delete-post' && !confirm({confirm:?})) {{
            return;
        }}
        event.preventDefault();
        dioxus.send({{
            action: data.action,
            postId: data.postId || null,
            modal: data.modal || null,
            category: data.category || null
        }});
    }});

    document.addEventListener('keydown', function(event) {{
        if ((event.ctrlKey || event.metaKey) && event.key === 'k') {{
            event.preventDefault();
            const search = document.getElementById('{search}');
            if (search) search.focus();
        }}
        if (event.key === 'Escape') {{
            dioxus.send({{ action: 'close-modals' }});
        }}
    }});
}})();
"#,
        confirm = DELETE_CONFIRMATION,
        search = SEARCH_INPUT_ID,
    )
}

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this post?";
pub const SEARCH_INPUT_ID: &str = "searchInput";
