//! Last-fetched posts, categories and chat messages.
//!
//! Each list is replaced wholesale on fetch. Filtering and search work on the
//! current snapshot and never touch the network.

use crate::types::{Category, ChatMessage, Post};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Snapshot {
    posts: Vec<Post>,
    categories: Vec<Category>,
    messages: Vec<ChatMessage>,
}

#[derive(Clone, Default)]
pub struct ContentCache {
    inner: Arc<RwLock<Snapshot>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.read().messages.clone()
    }

    pub fn replace_posts(&self, posts: Vec<Post>) {
        self.write().posts = posts;
    }

    pub fn replace_categories(&self, categories: Vec<Category>) {
        self.write().categories = categories;
    }

    pub fn replace_messages(&self, messages: Vec<ChatMessage>) {
        self.write().messages = messages;
    }

    pub fn push_message(&self, message: ChatMessage) {
        self.write().messages.push(message);
    }

    /// Chips carry the category name; posts may reference it by id only, so
    /// the name is also resolved to its id through the cached categories.
    pub fn filter_by_category(&self, category: &str) -> Vec<Post> {
        let snapshot = self.read();
        let wanted = category.to_lowercase();
        let resolved_id = snapshot
            .categories
            .iter()
            .find(|known| known.name.to_lowercase() == wanted)
            .and_then(|known| known.id.as_ref())
            .map(|id| id.as_str().to_string());

        snapshot
            .posts
            .iter()
            .filter(|post| {
                in_category(post, category)
                    || resolved_id.as_deref().is_some_and(|id| in_category(post, id))
            })
            .cloned()
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<Post> {
        self.read()
            .posts
            .iter()
            .filter(|post| matches_query(post, query))
            .cloned()
            .collect()
    }
}

pub fn in_category(post: &Post, category: &str) -> bool {
    post.category
        .as_ref()
        .is_some_and(|reference| reference.matches(category))
}

/// Case-insensitive substring match on title or content.
pub fn matches_query(post: &Post, query: &str) -> bool {
    let needle = query.to_lowercase();
    post.title.to_lowercase().contains(&needle) || post.content.to_lowercase().contains(&needle)
}
