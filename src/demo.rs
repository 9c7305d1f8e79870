//! Sample feed for running the client without a server
//! (`CAPAFRONT_DEMO_DATA=true`).

use crate::app::AppContext;
use crate::types::{CategoryRef, ChatMessage, Post, RecordId, UserRef, UserSummary};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

fn user(id: u32, username: &str) -> Option<UserRef> {
    Some(UserRef::Populated(UserSummary {
        id: Some(RecordId::new(id.to_string())),
        username: Some(username.to_string()),
    }))
}

fn stamp(now: OffsetDateTime, ago: Duration) -> Option<String> {
    (now - ago).format(&Rfc3339).ok()
}

pub fn demo_posts(now: OffsetDateTime) -> Vec<Post> {
    let entries = [
        (
            "Which web framework would you pick for a new project?",
            "React is still everywhere, but Vue and Svelte keep gaining ground. What would you choose for a greenfield app today, and why?",
            "programming",
            (1, "DevMaster"),
            234,
            2,
            15,
        ),
        (
            "On-device image recognition in mobile apps",
            "I need image recognition inside a mobile app. Has anyone shipped TensorFlow Lite or Core ML? Interested in pitfalls and good practices.",
            "ai",
            (2, "AIEnthusiast"),
            156,
            1,
            8,
        ),
        (
            "Moving to the cloud: AWS vs Azure vs Google Cloud",
            "We are evaluating all three for a migration. What factors mattered most for you when choosing?",
            "cloud",
            (3, "CloudArchitect"),
            89,
            3,
            22,
        ),
        (
            "Speeding up React Native on older devices",
            "Lazy loading and memoization helped a bit. What else made a real difference for you?",
            "mobile",
            (4, "MobileDev"),
            178,
            1,
            12,
        ),
        (
            "Is the new laptop generation worth the upgrade?",
            "Thinking about replacing a three-year-old machine. Has anyone measured build times on the new chips?",
            "hardware",
            (5, "TechReviewer"),
            445,
            2,
            31,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(
            |(index, (title, content, category, (uid, name), views, comments, likes))| {
                let hours = index as i64 + 1;
                Post {
                    id: RecordId::new((index + 1).to_string()),
                    title: title.to_string(),
                    content: content.to_string(),
                    author: user(uid, name),
                    category: Some(CategoryRef::Key(category.to_string())),
                    tags: Vec::new(),
                    created_at: stamp(now, Duration::hours(hours)),
                    view_count: Some(views),
                    comments: (0..comments).map(|n| json!({ "id": n })).collect(),
                    likes: (0..likes).map(|n| json!(n)).collect(),
                }
            },
        )
        .collect()
}

pub fn demo_messages(now: OffsetDateTime) -> Vec<ChatMessage> {
    let entries = [
        ("Hi all! How is everyone doing?", (1, "DevMaster")),
        ("Good, working on something fun 🚀", (2, "AIEnthusiast")),
        ("Has anyone tried the framework that just came out?", (3, "CloudArchitect")),
        ("Yes, played with it yesterday. Looks promising 👍", (4, "MobileDev")),
        ("Could you share the link?", (5, "TechReviewer")),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (content, (uid, name)))| ChatMessage {
            id: RecordId::new((index + 1).to_string()),
            content: content.to_string(),
            sender: user(uid, name),
            created_at: stamp(now, Duration::minutes(5 - index as i64)),
            synthetic: true,
        })
        .collect()
}

impl AppContext {
    /// Replaces the feed and chat with the sample set and repaints both.
    pub fn seed_demo_content(&self) {
        let now = OffsetDateTime::now_utc();
        let posts = demo_posts(now);
        let messages = demo_messages(now);
        tracing::info!(posts = posts.len(), messages = messages.len(), "seeding demo content");
        self.cache.replace_posts(posts.clone());
        self.cache.replace_messages(messages.clone());
        self.render_posts(&posts);
        self.render_messages(&messages);
    }
}
