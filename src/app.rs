//! Application state shared by every handler.
//!
//! `AppContext` is a bundle of cheap handles (`Arc`s inside); clone it into
//! whatever task needs it. Locks are only taken for short synchronous
//! sections and never held across an `.await`.

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::cache::ContentCache;
use crate::config::Config;
use crate::notify::Notifier;
use crate::render;
use crate::session::SessionStore;
use crate::simulation;
use crate::storage::Storage;
use crate::types::{ChatMessage, Post};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use time::OffsetDateTime;
use tokio::task::JoinHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modal {
    Login,
    Register,
    CreatePost,
    EditPost,
}

impl Modal {
    pub const ALL: [Modal; 4] = [Modal::Login, Modal::Register, Modal::CreatePost, Modal::EditPost];

    /// Element id used in rendered markup.
    pub fn dom_id(self) -> &'static str {
        match self {
            Modal::Login => "loginModal",
            Modal::Register => "registerModal",
            Modal::CreatePost => "createPostModal",
            Modal::EditPost => "editPostModal",
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|modal| modal.dom_id() == id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Home,
    Trending,
    Categories,
    Chat,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Home,
        Section::Trending,
        Section::Categories,
        Section::Chat,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Trending => "Trending",
            Section::Categories => "Categories",
            Section::Chat => "Chat",
        }
    }
}

/// Values the edit modal is pre-filled with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditDraft {
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
}

/// Everything the UI paints, as last rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    pub posts_html: String,
    pub messages_html: String,
    pub categories_html: String,
    pub user_actions_html: String,
    pub open_modals: BTreeSet<Modal>,
    pub edit_draft: Option<EditDraft>,
    pub section: Section,
}

#[derive(Clone, Default)]
pub struct ViewState {
    view: Arc<RwLock<View>>,
    revision: Arc<AtomicU64>,
}

impl ViewState {
    pub fn snapshot(&self) -> View {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bumped on every change; the UI repaints when it moves.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn update<R>(&self, change: impl FnOnce(&mut View) -> R) -> R {
        let result = change(&mut self.view.write().unwrap_or_else(PoisonError::into_inner));
        self.revision.fetch_add(1, Ordering::AcqRel);
        result
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .open_modals
            .contains(&modal)
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub session: SessionStore,
    pub cache: ContentCache,
    pub notifier: Notifier,
    pub view: ViewState,
}

impl AppContext {
    pub fn new(config: Config, transport: Arc<dyn Transport>, storage: Storage) -> Self {
        let notifier = Notifier::new();
        let api = ApiClient::new(config.api_base_url.clone(), transport, notifier.clone());
        Self {
            config: Arc::new(config),
            api,
            session: SessionStore::new(storage),
            cache: ContentCache::new(),
            notifier,
            view: ViewState::default(),
        }
    }

    /// Real HTTP transport and the configured durable storage.
    pub fn from_config(config: Config) -> Self {
        let storage = config.storage();
        Self::new(config, Arc::new(HttpTransport::new()), storage)
    }

    /// Page-load sequence: restore the saved session, paint the header, fetch
    /// everything, then optionally seed demo content and start the chat
    /// simulation. The returned handle is only for observers; dropping it
    /// does not stop the simulation.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        self.session.restore();
        self.render_user_chrome();

        let (categories, posts, messages) = futures::join!(
            self.load_categories(),
            self.load_posts(),
            self.load_messages()
        );
        tracing::info!(categories, posts, messages, "initial load finished");

        if self.config.demo_data {
            self.seed_demo_content();
        }

        self.config
            .simulate_chat
            .then(|| simulation::spawn(self.clone(), self.config.simulation_interval))
    }

    pub fn render_posts(&self, posts: &[Post]) {
        let session = self.session.current();
        let html = render::render_posts(posts, session.as_ref(), OffsetDateTime::now_utc());
        self.view.update(|view| view.posts_html = html);
    }

    pub fn render_messages(&self, messages: &[ChatMessage]) {
        let html = render::render_messages(messages);
        self.view.update(|view| view.messages_html = html);
    }

    pub fn render_categories(&self) {
        let html = render::render_categories(&self.cache.categories());
        self.view.update(|view| view.categories_html = html);
    }

    /// Header chrome for the current session state.
    pub fn render_user_chrome(&self) {
        let session = self.session.current();
        let html = render::render_user_actions(session.as_ref());
        self.view.update(|view| view.user_actions_html = html);
    }
}
