//! HTTP server for Riki page history.
//!
//! Serves history listings and rendered changes for wiki pages, and accepts
//! new edits. Histories live in memory and are optionally snapshotted to a
//! data directory after every edit.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::RikiServer;
pub use state::AppState;
