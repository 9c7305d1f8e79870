//! CapaFront: client for a posting and chat community.
//!
//! The client logic (gateway, session, cache, rendering, handlers) lives in
//! plain modules with no UI dependency. The dioxus shell in [`ui`] is behind
//! the `ui` feature.

pub mod api;
pub mod app;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod demo;
pub mod handlers;
pub mod notify;
pub mod render;
pub mod session;
pub mod simulation;
pub mod storage;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

pub use app::AppContext;
pub use config::Config;
