//! Policy engines for Signals
//!
//! This crate provides:
//! - Access decisions for signals and their attachments (`access`)
//! - HTTP-method permission profiles (`method_permissions`)
//! - Contact-detail redaction and document contexts (`disclosure`)
//! - Email notification actions (`notifications`)
//! - Embedded template rendering (`templates`)
//!
//! Every function here is a pure evaluation over already-loaded records.

#![forbid(unsafe_code)]

pub mod access;
pub mod disclosure;
pub mod method_permissions;
pub mod notifications;
pub mod templates;

pub use access::{
    DenyReason, can_delete_attachment, can_view, can_view_attachment, required_delete_permission,
};
pub use disclosure::{
    ContactDetails, MASK, ReopenedFeedbackContext, RenderingContext, get_contact_details,
    get_rendering_context, get_reopened_notification_context, history_action,
};
pub use method_permissions::{HttpMethod, PermissionProfile};
pub use notifications::{EmailMessage, EmailTemplateKey, NotificationAction, SignalReopenedAction};
