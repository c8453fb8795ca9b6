// Library exports for the CLI and for other front ends

/// HTTP client for a blob server, implementing the storage
///  and signing collaborators of the sharing core
pub mod client;
/// Log subscriber setup
pub mod logging;
/// On-disk configuration (~/.blobshare)
pub mod state;

pub use client::{ApiError, ServerClient};
pub use state::{AppConfig, AppState, StateError};
