//! Contextual disclosure of signal fields.
//!
//! Decides which reporter contact details a consumer gets to see and builds
//! the contexts that feed document and email templates. Redaction depends on
//! who is asking:
//!
//! - a trusted integration channel always gets the real values,
//! - an official holding `sia_can_view_contact_details` gets the real values,
//! - anyone else gets [`MASK`] for every value that exists.
//!
//! A value that does not exist stays `None`: "not provided" and "hidden"
//! must remain distinguishable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use signals_core::{Permission, Principal, Signal, StatusState};

/// Replacement shown for contact details the viewer may not see.
pub const MASK: &str = "*****";

/// Reporter email and phone as disclosed to one consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Reporter contact details for `principal`, or for a trusted channel when
/// `channel_override` is set.
#[must_use]
pub fn get_contact_details(
    signal: &Signal,
    principal: Option<&Principal>,
    channel_override: bool,
) -> ContactDetails {
    let reporter = &signal.reporter;
    let may_view = channel_override
        || principal.is_some_and(|p| p.has_perm(Permission::SiaCanViewContactDetails));

    if may_view {
        return ContactDetails {
            email: reporter.email.clone(),
            phone: reporter.phone.clone(),
        };
    }

    tracing::trace!(signal_id = signal.id, "masking reporter contact details");
    ContactDetails {
        email: reporter.email.as_ref().map(|_| MASK.to_string()),
        phone: reporter.phone.as_ref().map(|_| MASK.to_string()),
    }
}

// =============================================================================
// Document context
// =============================================================================

/// A timestamp pre-split for templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampContext {
    pub iso: String,
    /// `dd-mm-YYYY`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

impl From<DateTime<Utc>> for TimestampContext {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            iso: value.to_rfc3339(),
            date: value.format("%d-%m-%Y").to_string(),
            time: value.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryContext {
    pub name: String,
    pub slug: String,
    pub parent_name: Option<String>,
    pub departments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationContext {
    pub area: Option<String>,
    pub address_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusContext {
    pub state: StatusState,
    pub state_display: &'static str,
    pub text: Option<String>,
    pub user: Option<String>,
    pub created_at: TimestampContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraPropertyContext {
    pub label: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentContext {
    pub file_name: String,
    pub is_image: bool,
}

/// Everything a summary document of a signal shows.
///
/// Contact details follow [`get_contact_details`]; no other field is gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderingContext {
    pub id_display: String,
    pub created_at: TimestampContext,
    pub incident_date_start: Option<TimestampContext>,
    pub incident_date_end: Option<TimestampContext>,
    pub category: CategoryContext,
    pub priority: &'static str,
    pub text: String,
    pub source: String,
    pub location: Option<LocationContext>,
    pub status: &'static str,
    /// Status history, oldest first.
    pub statuses: Vec<StatusContext>,
    pub extra_properties: Vec<ExtraPropertyContext>,
    pub attachments: Vec<AttachmentContext>,
    pub reporter: ContactDetails,
    pub generated_by: Option<String>,
}

#[must_use]
pub fn get_rendering_context(
    signal: &Signal,
    principal: Option<&Principal>,
    channel_override: bool,
) -> RenderingContext {
    let mut history: Vec<_> = if signal.statuses.is_empty() {
        vec![&signal.status]
    } else {
        signal.statuses.iter().collect()
    };
    history.sort_by_key(|s| s.created_at);

    RenderingContext {
        id_display: signal.id_display(),
        created_at: signal.created_at.into(),
        incident_date_start: signal.incident_date_start.map(Into::into),
        incident_date_end: signal.incident_date_end.map(Into::into),
        category: CategoryContext {
            name: signal.category.name.clone(),
            slug: signal.category.slug.clone(),
            parent_name: signal.category.parent_name().map(str::to_string),
            departments: signal
                .category
                .departments
                .iter()
                .map(|d| d.code.clone())
                .collect(),
        },
        priority: signal.priority.label(),
        text: signal.text.clone(),
        source: signal.source.clone(),
        location: signal.location.as_ref().map(|l| LocationContext {
            area: l.area_display().map(str::to_string),
            address_text: l.address_text.clone(),
        }),
        status: signal.status.state.label(),
        statuses: history
            .into_iter()
            .map(|s| StatusContext {
                state: s.state,
                state_display: s.state.label(),
                text: s.text.clone(),
                user: s.user.clone(),
                created_at: s.created_at.into(),
            })
            .collect(),
        extra_properties: signal
            .extra_properties
            .iter()
            .map(|p| ExtraPropertyContext {
                label: p.label.clone(),
                answer: p.answer_display(),
            })
            .collect(),
        attachments: signal
            .attachments
            .iter()
            .map(|a| AttachmentContext {
                file_name: a.file_name.clone(),
                is_image: a.is_image,
            })
            .collect(),
        reporter: get_contact_details(signal, principal, channel_override),
        generated_by: principal.map(|p| p.email.clone()),
    }
}

// =============================================================================
// Reopened notification context
// =============================================================================

/// Feedback fields for the "signal reopened" email.
///
/// When no feedback was ever submitted every optional field is `None`, which
/// is different from a reporter answering "not satisfied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReopenedFeedbackContext {
    pub feedback_received: bool,
    pub feedback_is_satisfied: Option<bool>,
    pub feedback_text: Option<String>,
    pub feedback_text_extra: Option<String>,
    pub feedback_text_list: Option<Vec<String>>,
}

/// Derive the feedback context from the most recently submitted feedback.
///
/// Unsubmitted feedback forms are ignored. Equal submission times resolve to
/// the entry listed last.
#[must_use]
pub fn get_reopened_notification_context(signal: &Signal) -> ReopenedFeedbackContext {
    let latest = signal
        .feedback
        .iter()
        .filter_map(|f| f.submitted_at.map(|at| (at, f)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, f)| f);

    latest.map_or_else(ReopenedFeedbackContext::default, |f| ReopenedFeedbackContext {
        feedback_received: true,
        feedback_is_satisfied: f.is_satisfied,
        feedback_text: f.text.clone(),
        feedback_text_extra: f.text_extra.clone(),
        feedback_text_list: f.text_list.clone(),
    })
}

/// History line shown to a reporter for a status change.
#[must_use]
pub fn history_action(state: StatusState) -> String {
    format!("Status gewijzigd naar: {}", state.reporter_label())
}
