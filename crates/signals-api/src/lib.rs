//! Request boundary for Signals
//!
//! This crate provides:
//! - Record lookup (`store`)
//! - Request classification by principal and channel (`context`)
//! - Handlers for the private signal, attachment and summary endpoints (`handlers`)
//! - Transport-neutral responses (`responses`)
//! - JSON fixtures for the `signals-access` CLI (`fixture`)
//! - Logging setup (`logging`)

#![forbid(unsafe_code)]

pub mod context;
pub mod fixture;
pub mod handlers;
pub mod logging;
pub mod responses;
pub mod store;

pub use context::{Channel, RequestContext};
pub use fixture::{Fixture, FixtureError};
pub use handlers::{
    attachment_detail, delete_attachment, list_attachments, signal_detail, signal_summary_context,
    signal_summary_html,
};
pub use responses::ApiResponse;
pub use store::{MemoryStore, SignalStore};
