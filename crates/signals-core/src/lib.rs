//! Core types, configuration, and models for Signals
//!
//! This crate provides:
//! - Configuration management (`Config`, environment parsing)
//! - Data models (`Signal`, `Attachment`, `Principal`, etc.)
//! - The permission catalogue and workflow states
//! - Common error types

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod models;
pub mod permissions;
pub mod workflow;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Error as SignalsError, Result as SignalsResult};
pub use models::{
    Attachment, Category, Creator, Department, ExtraProperty, Feedback, Location, ParentCategory,
    Principal, Priority, Reporter, Signal, SignalAttachment, Stadsdeel, Status, StructuralKind,
};
pub use permissions::{Permission, PermissionSet};
pub use workflow::StatusState;
