//! Loads, filters and form/click handlers.
//!
//! Handlers validate locally first: a missing field or a missing session is
//! reported as a warning and no request goes out. After a successful write
//! the post list is refetched in full; the cache is never patched in place.

use crate::app::{AppContext, EditDraft, Modal, Section};
use crate::bridge::UiAction;
use crate::render;
use crate::types::{
    CategoriesResponse, MessagesResponse, NewMessage, NewPost, Post, PostUpdate, RegisterRequest,
};
use serde_json::Value;

/// Searches start at this many characters; an empty box reloads the feed.
pub const SEARCH_MIN_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Rejected locally; nothing was sent.
    Rejected,
    /// Sent, but the API call failed (already reported).
    Failed,
    Done,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub category: String,
    /// Comma-separated.
    pub tags: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditPostForm {
    pub post_id: String,
    pub post: PostForm,
}

struct CleanPost<'a> {
    title: &'a str,
    content: &'a str,
    category: Option<&'a str>,
    tags: Vec<String>,
}

impl PostForm {
    fn clean(&self) -> CleanPost<'_> {
        CleanPost {
            title: self.title.trim(),
            content: self.content.trim(),
            category: Some(self.category.trim()).filter(|c| !c.is_empty()),
            tags: parse_tags(&self.tags),
        }
    }
}

impl From<EditDraft> for EditPostForm {
    fn from(draft: EditDraft) -> Self {
        Self {
            post_id: draft.post_id,
            post: PostForm {
                title: draft.title,
                content: draft.content,
                category: draft.category,
                tags: draft.tags,
            },
        }
    }
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes a `/posts` payload. Anything but an array is an error; entries
/// that fail to decode are logged and skipped.
fn parse_post_list(value: Value) -> Result<Vec<Post>, String> {
    let Value::Array(items) = value else {
        return Err("expected an array of posts".to_string());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Post>(item) {
            Ok(post) => Some(post),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping undecodable post");
                None
            }
        })
        .collect())
}

const MISSING_POST_FIELDS: &str = "Title and content are required";

impl AppContext {
    // ============================================
    // Loads
    // ============================================

    pub async fn load_posts(&self) -> bool {
        self.view
            .update(|view| view.posts_html = render::render_loading());

        let token = self.session.token();
        let response: Option<Value> = self.api.get("/posts", token.as_deref()).await;
        match response.map(parse_post_list) {
            Some(Ok(posts)) => {
                tracing::debug!(count = posts.len(), "loaded posts");
                self.cache.replace_posts(posts.clone());
                self.render_posts(&posts);
                true
            }
            Some(Err(reason)) => {
                tracing::warn!(%reason, "unexpected /posts payload");
                self.view
                    .update(|view| view.posts_html = render::render_load_error());
                false
            }
            None => {
                self.view
                    .update(|view| view.posts_html = render::render_load_error());
                false
            }
        }
    }

    pub async fn load_categories(&self) -> bool {
        let token = self.session.token();
        let Some(response) = self
            .api
            .get::<CategoriesResponse>("/categories", token.as_deref())
            .await
        else {
            return false;
        };
        self.cache.replace_categories(response.categories);
        self.render_categories();
        true
    }

    pub async fn load_messages(&self) -> bool {
        let token = self.session.token();
        let Some(response) = self
            .api
            .get::<MessagesResponse>("/messages", token.as_deref())
            .await
        else {
            return false;
        };
        self.cache.replace_messages(response.messages);
        self.render_messages(&self.cache.messages());
        true
    }

    // ============================================
    // Client-side filtering
    // ============================================

    pub fn filter_by_category(&self, category: &str) {
        let posts = self.cache.filter_by_category(category);
        self.render_posts(&posts);
    }

    pub async fn search_posts(&self, query: &str) {
        if query.is_empty() {
            self.load_posts().await;
            return;
        }
        let posts = self.cache.search(query);
        self.render_posts(&posts);
    }

    /// Search box policy: 3+ characters filter locally, empty reloads,
    /// anything in between is ignored.
    pub async fn on_search_input(&self, query: &str) {
        let length = query.chars().count();
        if length >= SEARCH_MIN_CHARS {
            self.search_posts(query).await;
        } else if length == 0 {
            self.load_posts().await;
        }
    }

    // ============================================
    // Session
    // ============================================

    pub async fn handle_login(&self, form: &LoginForm) -> Submission {
        let email = form.email.trim();
        if email.is_empty() || form.password.is_empty() {
            self.notifier.warning("Email and password are required");
            return Submission::Rejected;
        }

        match self.session.login(&self.api, email, &form.password).await {
            Some(session) => {
                tracing::info!(username = %session.username, "signed in");
                self.render_user_chrome();
                self.render_posts(&self.cache.posts());
                self.close_modal(Modal::Login);
                self.notifier.success("Signed in");
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    pub async fn handle_register(&self, form: &RegisterForm) -> Submission {
        let username = form.username.trim();
        let email = form.email.trim();
        if username.is_empty() || email.is_empty() || form.password.is_empty() {
            self.notifier
                .warning("Username, email and password are required");
            return Submission::Rejected;
        }

        let request = RegisterRequest {
            username,
            email,
            password: &form.password,
        };
        let token = self.session.token();
        match self
            .api
            .post::<Value, _>("/users/register", &request, token.as_deref())
            .await
        {
            Some(_) => {
                self.close_modal(Modal::Register);
                self.notifier.success("Account created");
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        self.render_user_chrome();
        self.render_posts(&self.cache.posts());
        self.notifier.success("Signed out");
    }

    // ============================================
    // Posts
    // ============================================

    pub async fn handle_create_post(&self, form: &PostForm) -> Submission {
        let post = form.clean();
        if post.title.is_empty() || post.content.is_empty() {
            self.notifier.warning(MISSING_POST_FIELDS);
            return Submission::Rejected;
        }

        let Some(author) = self.session.user_id() else {
            self.notifier.warning("You must sign in to create a post");
            self.show_modal(Modal::Login);
            return Submission::Rejected;
        };

        let request = NewPost {
            title: post.title,
            content: post.content,
            author: &author,
            category: post.category,
            tags: &post.tags,
        };
        let token = self.session.token();
        match self
            .api
            .post::<Value, _>("/posts/posts", &request, token.as_deref())
            .await
        {
            Some(_) => {
                self.close_modal(Modal::CreatePost);
                self.load_posts().await;
                self.notifier.success("Post created");
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    /// Refetches one post and checks the signed-in user wrote it. Advisory
    /// only; the API enforces ownership itself.
    async fn fetch_owned_post(&self, post_id: &str, denied: &str) -> Option<Post> {
        let token = self.session.token();
        let post: Post = self
            .api
            .get(&format!("/posts/{post_id}"), token.as_deref())
            .await?;
        let session = self.session.current();
        if !render::owns_post(session.as_ref(), &post) {
            tracing::debug!(post_id, "ownership check failed");
            self.notifier.warning(denied);
            return None;
        }
        Some(post)
    }

    /// Opens the edit modal pre-filled with the post's current values.
    pub async fn begin_edit(&self, post_id: &str) -> bool {
        let Some(post) = self
            .fetch_owned_post(post_id, "Only the author can edit this post")
            .await
        else {
            return false;
        };

        let draft = EditDraft {
            post_id: post.id.to_string(),
            title: post.title.clone(),
            content: post.content.clone(),
            category: post
                .category
                .as_ref()
                .map(|category| category.form_value().to_string())
                .unwrap_or_default(),
            tags: post.tags.join(", "),
        };
        self.view.update(|view| {
            view.edit_draft = Some(draft);
            view.open_modals.insert(Modal::EditPost);
        });
        true
    }

    pub async fn handle_edit_post(&self, form: &EditPostForm) -> Submission {
        let post_id = form.post_id.trim();
        let post = form.post.clean();
        if post.title.is_empty() || post.content.is_empty() {
            self.notifier.warning(MISSING_POST_FIELDS);
            return Submission::Rejected;
        }

        if self
            .fetch_owned_post(post_id, "Only the author can edit this post")
            .await
            .is_none()
        {
            return Submission::Rejected;
        }

        let request = PostUpdate {
            title: post.title,
            content: post.content,
            category: post.category,
            tags: &post.tags,
        };
        let token = self.session.token();
        match self
            .api
            .put::<Value, _>(&format!("/posts/{post_id}"), &request, token.as_deref())
            .await
        {
            Some(_) => {
                self.view.update(|view| {
                    view.open_modals.remove(&Modal::EditPost);
                    view.edit_draft = None;
                });
                self.load_posts().await;
                self.notifier.success("Post updated");
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    /// Deletes after the ownership check. Confirmation is the caller's job.
    pub async fn delete_post(&self, post_id: &str) -> Submission {
        if self
            .fetch_owned_post(post_id, "Only the author can delete this post")
            .await
            .is_none()
        {
            return Submission::Rejected;
        }

        let token = self.session.token();
        match self
            .api
            .delete::<Value>(&format!("/posts/{post_id}"), token.as_deref())
            .await
        {
            Some(_) => {
                self.notifier.success("Post deleted");
                self.load_posts().await;
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    // ============================================
    // Chat
    // ============================================

    pub async fn send_message(&self, text: &str) -> Submission {
        let content = text.trim();
        if content.is_empty() {
            return Submission::Rejected;
        }

        let Some(sender) = self.session.user_id() else {
            self.notifier.warning("You must sign in to send messages");
            return Submission::Rejected;
        };

        let request = NewMessage {
            content,
            sender: &sender,
        };
        let token = self.session.token();
        match self
            .api
            .post::<Value, _>("/messages", &request, token.as_deref())
            .await
        {
            Some(_) => {
                self.load_messages().await;
                Submission::Done
            }
            None => Submission::Failed,
        }
    }

    // ============================================
    // Modals and navigation
    // ============================================

    pub fn show_modal(&self, modal: Modal) {
        self.view.update(|view| view.open_modals.insert(modal));
    }

    pub fn close_modal(&self, modal: Modal) {
        self.view.update(|view| {
            view.open_modals.remove(&modal);
            if modal == Modal::EditPost {
                view.edit_draft = None;
            }
        });
    }

    pub fn close_all_modals(&self) {
        self.view.update(|view| {
            view.open_modals.clear();
            view.edit_draft = None;
        });
    }

    pub fn show_section(&self, section: Section) {
        tracing::info!(section = section.label(), "switching section");
        self.view.update(|view| view.section = section);
    }

    /// Routes a click coming out of rendered markup.
    pub async fn dispatch(&self, action: UiAction) {
        tracing::debug!(?action, "ui action");
        match action {
            UiAction::ReloadPosts => {
                self.load_posts().await;
            }
            UiAction::EditPost(post_id) => {
                self.begin_edit(&post_id).await;
            }
            UiAction::DeletePost(post_id) => {
                self.delete_post(&post_id).await;
            }
            UiAction::FilterCategory(category) => self.filter_by_category(&category),
            UiAction::OpenModal(modal) => self.show_modal(modal),
            UiAction::CloseModals => self.close_all_modals(),
            UiAction::Logout => self.logout(),
        }
    }
}
