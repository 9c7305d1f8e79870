//! Synthetic chat traffic for demos.
//!
//! Every tick there is a fixed chance of appending a made-up message to the
//! cached chat list. These messages are marked `synthetic`, never sent to the
//! server and never persisted.

use crate::app::AppContext;
use crate::types::{ChatMessage, RecordId, UserRef, UserSummary};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::task::JoinHandle;

pub const MESSAGE_PROBABILITY: f64 = 0.3;

pub const SAMPLE_MESSAGES: [&str; 8] = [
    "Great discussion, everyone!",
    "Has anyone worked with GraphQL in production?",
    "That last post about AI was really interesting",
    "Any recommendations for learning Rust?",
    "Next week's meetup looks great",
    "Thoughts on the new laptops?",
    "Kubernetes keeps changing everything 🚀",
    "Is anyone else following WebAssembly lately?",
];

pub const SAMPLE_USERNAMES: [&str; 8] = [
    "CodeNinja",
    "DataScientist",
    "FullStackDev",
    "UIDesigner",
    "DevOpsGuru",
    "CyberSecExpert",
    "BlockchainDev",
    "MLEngineer",
];

/// Builds one synthetic message stamped at `now`.
pub fn synthesize<R: Rng>(rng: &mut R, now: OffsetDateTime) -> ChatMessage {
    let content = SAMPLE_MESSAGES.choose(rng).copied().unwrap_or_default();
    let username = SAMPLE_USERNAMES.choose(rng).copied().unwrap_or_default();
    let sender_id: u32 = rng.gen_range(0..100);
    let millis = now.unix_timestamp_nanos() / 1_000_000;

    ChatMessage {
        id: RecordId::new(millis.to_string()),
        content: content.to_string(),
        sender: Some(UserRef::Populated(UserSummary {
            id: Some(RecordId::new(sender_id.to_string())),
            username: Some(username.to_string()),
        })),
        created_at: now.format(&Rfc3339).ok(),
        synthetic: true,
    }
}

pub fn maybe_synthesize<R: Rng>(rng: &mut R, now: OffsetDateTime) -> Option<ChatMessage> {
    rng.gen_bool(MESSAGE_PROBABILITY)
        .then(|| synthesize(rng, now))
}

/// One timer tick: maybe append a message and repaint the chat list.
pub fn tick<R: Rng>(ctx: &AppContext, rng: &mut R) -> bool {
    let Some(message) = maybe_synthesize(rng, OffsetDateTime::now_utc()) else {
        return false;
    };
    tracing::trace!(content = %message.content, "synthetic chat message");
    ctx.cache.push_message(message);
    ctx.render_messages(&ctx.cache.messages());
    true
}

/// Ticks forever at `period`. The first tick fires one period after start.
pub async fn run(ctx: AppContext, period: Duration) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    loop {
        ticker.tick().await;
        tick(&ctx, &mut rng);
    }
}

pub fn spawn(ctx: AppContext, period: Duration) -> JoinHandle<()> {
    tracing::info!(period_ms = period.as_millis() as u64, "starting chat simulation");
    tokio::spawn(run(ctx, period))
}
