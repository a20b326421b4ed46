//! Chatdeck - a headless chat workspace
//!
//! A reducer-driven conversation store, a simulated completion backend with
//! realistic latency, and JSON/PDF transcript export. Hosts drive everything
//! through a [`Session`].

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod backend;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod export;
pub mod ids;
pub mod platform;
pub mod session;
pub mod store;
pub mod types;

pub use config::{ConfigError, SessionConfig};
pub use export::{ExportError, ExportFormat};
pub use session::{ExportReceipt, Session, SessionError};
pub use store::{Action, Outcome, Store, StoreState};
