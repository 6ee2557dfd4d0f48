//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each handler owns `Arc<dyn Port>` dependencies and exposes `handle`.

pub mod handlers;
mod notifier;
mod settings_cache;

pub use notifier::Notifier;
pub use settings_cache::CachedSettings;
