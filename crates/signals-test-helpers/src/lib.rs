//! Shared test helpers for the Signals workspace.
//!
//! Factories build in-memory records with sensible defaults so that tests
//! only spell out what they assert on. Ids come from one process-wide
//! counter and never repeat within a test binary. Timestamps are anchored to
//! [`fixed_now`] so that ordering assertions are deterministic.

#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

pub mod proptest_generators;

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use signals_core::{
    Attachment, Category, Creator, Department, ExtraProperty, Feedback, Location, ParentCategory,
    Permission, Principal, Priority, Reporter, Signal, Status, StatusState,
};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

/// Next unique id for any factory-built record.
pub fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The instant every factory-built record is created at.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// `minutes` after [`fixed_now`].
pub fn at_minutes(minutes: i64) -> DateTime<Utc> {
    fixed_now() + Duration::minutes(minutes)
}

// =============================================================================
// Department & Category
// =============================================================================

pub struct DepartmentFactory;

impl DepartmentFactory {
    pub fn create() -> Department {
        let id = next_id();
        Department {
            id,
            code: format!("D{id:03}"),
            name: format!("Afdeling {id}"),
        }
    }

    pub fn with_code(code: &str) -> Department {
        Department {
            code: code.to_string(),
            ..Self::create()
        }
    }
}

/// Builds a [`Category`]. A category built without departments gets one
/// fresh department so that it is never orphaned.
#[derive(Debug, Clone)]
pub struct CategoryFactory {
    category: Category,
}

impl Default for CategoryFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryFactory {
    pub fn new() -> Self {
        let id = next_id();
        Self {
            category: Category {
                id,
                slug: format!("categorie-{id}"),
                name: format!("Categorie {id}"),
                parent: None,
                departments: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.category.name = name.to_string();
        self.category.slug = slugify(name);
        self
    }

    pub fn parent_name(mut self, name: &str) -> Self {
        self.category.parent = Some(ParentCategory {
            id: next_id(),
            slug: slugify(name),
            name: name.to_string(),
        });
        self
    }

    pub fn department(mut self, department: Department) -> Self {
        self.category.departments.push(department);
        self
    }

    pub fn build(mut self) -> Category {
        if self.category.departments.is_empty() {
            self.category.departments.push(DepartmentFactory::create());
        }
        self.category
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

// =============================================================================
// Attachment
// =============================================================================

#[derive(Debug, Clone)]
pub struct AttachmentFactory {
    attachment: Attachment,
}

impl AttachmentFactory {
    pub fn image() -> Self {
        let id = next_id();
        Self {
            attachment: Attachment {
                id,
                file_name: format!("foto-{id}.jpg"),
                is_image: true,
                created_by: Creator::Anonymous,
                created_at: fixed_now(),
            },
        }
    }

    pub fn document() -> Self {
        let mut factory = Self::image();
        factory.attachment.file_name = format!("bijlage-{}.pdf", factory.attachment.id);
        factory.attachment.is_image = false;
        factory
    }

    /// `None` makes the attachment an anonymous (reporter) upload.
    pub fn created_by(mut self, email: Option<&str>) -> Self {
        self.attachment.created_by = Creator::from_email(email.map(str::to_string));
        self
    }

    pub fn file_name(mut self, file_name: &str) -> Self {
        self.attachment.file_name = file_name.to_string();
        self
    }

    pub fn build(self) -> Attachment {
        self.attachment
    }
}

// =============================================================================
// Signal
// =============================================================================

/// Builds a [`Signal`] in state `Gemeld` created at [`fixed_now`].
#[derive(Debug, Clone)]
pub struct SignalFactory {
    signal: Signal,
}

impl Default for SignalFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Signal> for SignalFactory {
    fn from(signal: Signal) -> Self {
        Self { signal }
    }
}

impl SignalFactory {
    pub fn new() -> Self {
        let created_at = fixed_now();
        let status = Status {
            state: StatusState::Gemeld,
            text: None,
            user: None,
            created_at,
        };
        Self {
            signal: Signal {
                id: next_id(),
                text: "Er ligt afval naast de container".to_string(),
                source: "online".to_string(),
                created_at,
                incident_date_start: None,
                incident_date_end: None,
                category: CategoryFactory::new().build(),
                parent_id: None,
                child_ids: Vec::new(),
                reporter: Reporter::default(),
                status: status.clone(),
                statuses: vec![status],
                priority: Priority::default(),
                location: None,
                extra_properties: Vec::new(),
                attachments: Vec::new(),
                feedback: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.signal.id = id;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.signal.text = text.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.signal.source = source.to_string();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.signal.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.signal.priority = priority;
        self
    }

    pub fn parent(mut self, parent_id: i64) -> Self {
        self.signal.parent_id = Some(parent_id);
        self
    }

    pub fn children(mut self, child_ids: impl IntoIterator<Item = i64>) -> Self {
        self.signal.child_ids.extend(child_ids);
        self
    }

    pub fn reporter_email(mut self, email: Option<&str>) -> Self {
        self.signal.reporter.email = email.map(str::to_string);
        self
    }

    pub fn reporter_phone(mut self, phone: Option<&str>) -> Self {
        self.signal.reporter.phone = phone.map(str::to_string);
        self
    }

    pub fn incident_date_start(mut self, at: DateTime<Utc>) -> Self {
        self.signal.incident_date_start = Some(at);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.signal.location = Some(location);
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.signal.attachments.push(attachment);
        self
    }

    pub fn extra_property(mut self, label: &str, answer: serde_json::Value) -> Self {
        let id = format!("extra_{}", self.signal.extra_properties.len() + 1);
        self.signal.extra_properties.push(ExtraProperty {
            id,
            label: label.to_string(),
            answer,
            category_url: None,
        });
        self
    }

    pub fn feedback(mut self, feedback: Feedback) -> Self {
        self.signal.feedback.push(feedback);
        self
    }

    /// Append a status to the history. The current status becomes the most
    /// recent entry.
    pub fn status_at(mut self, state: StatusState, text: Option<&str>, at: DateTime<Utc>) -> Self {
        self.signal.statuses.push(Status {
            state,
            text: text.map(str::to_string),
            user: None,
            created_at: at,
        });
        if let Some(latest) = self.signal.statuses.iter().max_by_key(|s| s.created_at) {
            self.signal.status = latest.clone();
        }
        self
    }

    /// Move the signal to `state` one minute after its latest status.
    pub fn status(self, state: StatusState) -> Self {
        let at = self
            .signal
            .statuses
            .iter()
            .map(|s| s.created_at)
            .max()
            .map_or_else(fixed_now, |latest| latest + Duration::minutes(1));
        self.status_at(state, None, at)
    }

    pub fn build(self) -> Signal {
        self.signal
    }
}

// =============================================================================
// Principal
// =============================================================================

/// Builds a [`Principal`] without departments or permissions.
#[derive(Debug, Clone)]
pub struct PrincipalFactory {
    principal: Principal,
}

impl PrincipalFactory {
    pub fn new(email: &str) -> Self {
        Self {
            principal: Principal {
                email: email.to_string(),
                ..Principal::default()
            },
        }
    }

    pub fn department(mut self, department_id: i64) -> Self {
        self.principal.departments.insert(department_id);
        self
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        self.principal.permissions.grant(permission);
        self
    }

    pub fn grant_all(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        for permission in permissions {
            self.principal.permissions.grant(permission);
        }
        self
    }

    pub fn build(self) -> Principal {
        self.principal
    }
}
