//! Client core for the HireHub recruiter tools.
//!
//! The backend is a REST service exposing a salary calculator, a
//! job-description generator, per-user history, and profiles behind JWT
//! bearer auth. This crate holds everything a shell (TUI, webview, tests)
//! needs short of rendering: the session lifecycle, the guarded HTTP
//! transport, and typed endpoint wrappers.
//!
//! The usual wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use hirehub_client::{ApiClient, Config, MemoryNavigator, SessionManager, TokenStore};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(TokenStore::new(Config::data_dir()?));
//! let navigator = Arc::new(MemoryNavigator::new("/"));
//! let api = ApiClient::new(
//!     config.api_base_url.as_str(),
//!     Arc::clone(&store),
//!     navigator.clone(),
//! )?;
//! let session = SessionManager::new(api.clone(), store, navigator);
//! let _sweep = session.spawn_expiry_sweep(std::time::Duration::from_secs(30));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionManager, SweepHandle, TokenStore};
pub use config::Config;
pub use nav::{MemoryNavigator, Navigator};
