/**
 * Calling-layer wiring for the marketplace pipelines:
 *  configuration, session state, a per-account snapshot
 *  cache, and a refresh event loop. The pipelines
 *  themselves live in `common` and stay stateless.
 */
pub mod cache;
pub mod config;
pub mod refresh;
pub mod state;

pub use cache::{CachedSnapshot, SnapshotCache};
pub use config::Config;
pub use refresh::{RefreshCoordinator, RefreshEvent};
pub use state::State;
