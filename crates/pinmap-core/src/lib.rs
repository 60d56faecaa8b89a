//! pinmap-core - Core library for Pinmap
//!
//! This crate contains the shared models, the backend and place-search
//! gateways, and the client state orchestration (overlays, pin draft,
//! session, refresh token) used by every Pinmap front end.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod util;

pub use error::{Error, ErrorKind, Result, ValidationIssue};
pub use models::{Attachment, Folder, FolderId, Pin, PinId, PinPayload, User, UserId};
pub use state::AppState;
