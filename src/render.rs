//! Markup for the feed, the chat panel and the session-dependent header.
//!
//! Everything here is a pure function of its inputs. Interactive controls
//! carry `data-action` attributes that the UI bridge turns back into
//! [`crate::bridge::UiAction`]s.

use crate::types::{Category, ChatMessage, Post, Session};
use maud::{Markup, html};
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const MINUTE_MS: i128 = 60_000;
const HOUR_MS: i128 = 3_600_000;
const DAY_MS: i128 = 86_400_000;
const MONTH_MS: i128 = 2_592_000_000;

const ABSOLUTE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
pub const UNKNOWN_SENDER: &str = "User";

/// Relative label for an RFC 3339 timestamp. Unparseable input is shown as-is.
pub fn format_date(raw: &str, now: OffsetDateTime) -> String {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(created) => {
            let created = match UtcOffset::current_local_offset() {
                Ok(offset) => created.to_offset(offset),
                Err(_) => created,
            };
            format_elapsed(created, now)
        }
        Err(_) => raw.to_string(),
    }
}

/// Buckets the time since `created`: `now`, `<n>m`, `<n>h`, `<n>d`, then
/// the absolute date in `created`'s offset.
pub fn format_elapsed(created: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = (now - created).whole_milliseconds();
    if elapsed < MINUTE_MS {
        return "now".to_string();
    }
    if elapsed < HOUR_MS {
        return format!("{}m", elapsed / MINUTE_MS);
    }
    if elapsed < DAY_MS {
        return format!("{}h", elapsed / HOUR_MS);
    }
    if elapsed < MONTH_MS {
        return format!("{}d", elapsed / DAY_MS);
    }
    created
        .format(ABSOLUTE_DATE_FORMAT)
        .unwrap_or_else(|_| created.date().to_string())
}

pub fn owns_post(session: Option<&Session>, post: &Post) -> bool {
    match (session.and_then(|s| s.id.as_ref()), post.author_id()) {
        (Some(user), Some(author)) => user == author,
        _ => false,
    }
}

pub fn author_label(post: &Post) -> &str {
    post.author
        .as_ref()
        .and_then(|author| author.username())
        .unwrap_or(ANONYMOUS_AUTHOR)
}

pub fn render_loading() -> String {
    html! {
        div class="loading-spinner" {
            div class="spinner" {}
            p { "Loading posts..." }
        }
    }
    .into_string()
}

pub fn render_load_error() -> String {
    html! {
        div class="error-message" {
            p { "Failed to load posts. Please try again later." }
            button data-action="reload-posts" class="btn btn-primary" { "Retry" }
        }
    }
    .into_string()
}

pub fn render_posts(posts: &[Post], session: Option<&Session>, now: OffsetDateTime) -> String {
    let markup = html! {
        @if posts.is_empty() {
            div class="post-card empty-state" {
                p { "No posts available yet. Be the first to create one!" }
                @if session.is_some() {
                    button data-action="open-modal" data-modal="createPostModal" class="btn btn-primary" {
                        "Create Post"
                    }
                }
            }
        } @else {
            @for post in posts {
                (post_card(post, session, now))
            }
        }
    };
    markup.into_string()
}

pub fn render_post_card(post: &Post, session: Option<&Session>, now: OffsetDateTime) -> String {
    post_card(post, session, now).into_string()
}

fn post_card(post: &Post, session: Option<&Session>, now: OffsetDateTime) -> Markup {
    let id = post.id.as_str();
    let created = post.created_at.as_deref().unwrap_or_default();

    html! {
        article class="post-card" data-id=(id) {
            div class="post-header" {
                div {
                    h3 class="post-title" { (post.title) }
                    div class="post-meta" {
                        span class="author" { (author_label(post)) }
                        span { "•" }
                        time datetime=(created) { (format_date(created, now)) }
                        @if let Some(category) = &post.category {
                            span { "•" }
                            span class="category-tag" { (category.label()) }
                        }
                        @if !post.tags.is_empty() {
                            span { "•" }
                            div class="tags" {
                                @for tag in &post.tags {
                                    span class="tag" { "#" (tag) }
                                }
                            }
                        }
                    }
                }
                @if owns_post(session, post) {
                    div class="post-actions" {
                        button data-action="edit-post" data-post-id=(id) class="btn-icon" { "✏️" }
                        button data-action="delete-post" data-post-id=(id) class="btn-icon" { "🗑️" }
                    }
                }
            }
            div class="post-content" { (post.content) }
            div class="post-stats" {
                span class="stat-item" { "👁️ " (post.view_count.unwrap_or(0)) " views" }
                span class="stat-item" { "💬 " (post.comments.len()) " comments" }
                span class="stat-item" { "👍 " (post.likes.len()) " likes" }
            }
        }
    }
}

pub fn render_messages(messages: &[ChatMessage]) -> String {
    let markup = html! {
        @for message in messages {
            @let author = message
                .sender
                .as_ref()
                .and_then(|sender| sender.username())
                .unwrap_or(UNKNOWN_SENDER);
            div class=(if message.synthetic { "message synthetic" } else { "message" }) {
                div class="message-author" { (author) }
                div class="message-text" { (message.content) }
            }
        }
    };
    markup.into_string()
}

/// The "All" chip reloads; named categories filter the cached feed.
pub fn render_categories(categories: &[Category]) -> String {
    let markup = html! {
        button data-action="reload-posts" class="category-chip" { "All" }
        @for category in categories.iter().filter(|c| !c.name.is_empty()) {
            button data-action="filter-category" data-category=(category.name) class="category-chip" {
                (category.name)
            }
        }
    };
    markup.into_string()
}

/// Header controls: the user badge and sign-out when signed in, otherwise
/// sign-in and register.
pub fn render_user_actions(session: Option<&Session>) -> String {
    let markup = html! {
        @match session {
            Some(session) => {
                span class="user-badge premium-badge" { "⭐ " (session.username) }
                button data-action="logout" class="btn btn-secondary" { "Sign out" }
            }
            None => {
                button data-action="open-modal" data-modal="loginModal" class="btn btn-secondary" { "Sign in" }
                button data-action="open-modal" data-modal="registerModal" class="btn btn-primary" { "Register" }
            }
        }
    };
    markup.into_string()
}
