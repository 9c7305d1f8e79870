//! Shared fixtures: a scripted transport and a context wired to it.

#![allow(dead_code)]

use async_trait::async_trait;
use capafront::api::{ApiRequest, GatewayError, Method, Transport};
use capafront::notify::{Notification, NotificationLevel};
use capafront::storage::Storage;
use capafront::types::{RecordId, Session};
use capafront::{AppContext, Config};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub const BASE_URL: &str = "http://test.local/api";

/// Answers from a route table keyed by method and path, and records every
/// request it sees. Unknown routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Result<Value, u16>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(body));
    }

    pub fn fail(&self, method: Method, path: &str, status: u16) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(status));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method && path_of(request) == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

pub fn path_of(request: &ApiRequest) -> &str {
    request.url.strip_prefix(BASE_URL).unwrap_or(&request.url)
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let key = (request.method, path_of(&request).to_string());
        self.requests.lock().unwrap().push(request);
        match self.routes.lock().unwrap().get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(GatewayError::Status(*status)),
            None => Err(GatewayError::Status(404)),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        api_base_url: BASE_URL.to_string(),
        simulate_chat: false,
        ..Config::default()
    }
}

pub fn context() -> (AppContext, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let ctx = AppContext::new(test_config(), transport.clone(), Storage::in_memory());
    (ctx, transport)
}

pub fn sign_in(ctx: &AppContext, id: &str, username: &str) {
    ctx.session.set(Session {
        id: Some(RecordId::from(id)),
        username: username.to_string(),
        token: format!("token-{id}"),
        profile: Map::new(),
    });
}

pub fn post_json(id: &str, title: &str, author_id: &str, author_name: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "content": format!("{title} body"),
        "author": { "_id": author_id, "username": author_name },
        "category": { "_id": "c1", "name": "General" },
        "tags": ["rust"],
        "createdAt": "2025-06-15T10:00:00Z",
        "viewCount": 3,
        "comments": [],
        "likes": []
    })
}

pub fn notifications(ctx: &AppContext) -> Vec<Notification> {
    ctx.notifier.active(Instant::now())
}

pub fn has_notification(ctx: &AppContext, level: NotificationLevel, message: &str) -> bool {
    notifications(ctx)
        .iter()
        .any(|n| n.level == level && n.message == message)
}
