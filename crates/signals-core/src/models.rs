//! Data models for Signals
//!
//! These are in-memory snapshots of the relational records the boundary
//! loads per request. Nothing here is cached between requests; every
//! derived property (structural kind, area display) is computed from the
//! snapshot on demand.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::permissions::{Permission, PermissionSet};
use crate::workflow::StatusState;

// =============================================================================
// Department & Category
// =============================================================================

/// An organisational unit responsible for handling signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// Main category a sub category belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// The (sub) category a signal is filed under.
///
/// # Constraints
/// - `departments`: the departments responsible for this category. A
///   principal can only see signals in categories owned by one of their
///   departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<ParentCategory>,
    #[serde(default)]
    pub departments: Vec<Department>,
}

impl Category {
    #[must_use]
    pub fn department_ids(&self) -> BTreeSet<i64> {
        self.departments.iter().map(|d| d.id).collect()
    }

    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.name.as_str())
    }
}

// =============================================================================
// Reporter
// =============================================================================

/// Contact details left by the citizen who filed the signal.
///
/// Both fields are optional: reporters may stay anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Priority
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Laag",
            Self::Normal => "Normaal",
            Self::High => "Hoog",
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// City district a location falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stadsdeel {
    #[serde(rename = "A")]
    Centrum,
    #[serde(rename = "B")]
    Westpoort,
    #[serde(rename = "E")]
    West,
    #[serde(rename = "M")]
    Oost,
    #[serde(rename = "N")]
    Noord,
    #[serde(rename = "T")]
    Zuidoost,
    #[serde(rename = "K")]
    Zuid,
    #[serde(rename = "F")]
    NieuwWest,
    #[serde(rename = "H")]
    AmsterdamseBos,
    #[serde(rename = "W")]
    Weesp,
}

impl Stadsdeel {
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Centrum => 'A',
            Self::Westpoort => 'B',
            Self::West => 'E',
            Self::Oost => 'M',
            Self::Noord => 'N',
            Self::Zuidoost => 'T',
            Self::Zuid => 'K',
            Self::NieuwWest => 'F',
            Self::AmsterdamseBos => 'H',
            Self::Weesp => 'W',
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Centrum => "Centrum",
            Self::Westpoort => "Westpoort",
            Self::West => "West",
            Self::Oost => "Oost",
            Self::Noord => "Noord",
            Self::Zuidoost => "Zuidoost",
            Self::Zuid => "Zuid",
            Self::NieuwWest => "Nieuw-West",
            Self::AmsterdamseBos => "Het Amsterdamse Bos",
            Self::Weesp => "Weesp",
        }
    }

    /// Map an area slug (as delivered by the area service) to a district.
    #[must_use]
    pub fn from_area_slug(slug: &str) -> Option<Self> {
        match slug {
            "het-amsterdamse-bos" => Some(Self::AmsterdamseBos),
            "zuidoost" => Some(Self::Zuidoost),
            "centrum" => Some(Self::Centrum),
            "noord" => Some(Self::Noord),
            "westpoort" => Some(Self::Westpoort),
            "west" => Some(Self::West),
            "nieuw-west" => Some(Self::NieuwWest),
            "oost" => Some(Self::Oost),
            "zuid" | "stadsdeel-zuid" => Some(Self::Zuid),
            "weesp" => Some(Self::Weesp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub stadsdeel: Option<Stadsdeel>,
    #[serde(default)]
    pub area_code: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub address_text: Option<String>,
}

impl Location {
    /// Human readable area: district label, then area name, then area code.
    ///
    /// The area code is only used when no area name is known.
    #[must_use]
    pub fn area_display(&self) -> Option<&str> {
        if let Some(stadsdeel) = self.stadsdeel {
            return Some(stadsdeel.label());
        }
        self.area_name.as_deref().or(self.area_code.as_deref())
    }
}

// =============================================================================
// Status
// =============================================================================

/// One entry in a signal's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: StatusState,
    #[serde(default)]
    pub text: Option<String>,
    /// Email of the official who made the transition, if any.
    #[serde(default)]
    pub user: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Feedback
// =============================================================================

/// A feedback form sent to the reporter after a signal is handled.
///
/// `submitted_at` stays `None` until the reporter answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_satisfied: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_extra: Option<String>,
    #[serde(default)]
    pub text_list: Option<Vec<String>>,
}

// =============================================================================
// Extra properties
// =============================================================================

/// An answer to a category specific question asked when filing the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraProperty {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub answer: serde_json::Value,
    #[serde(default)]
    pub category_url: Option<String>,
}

impl ExtraProperty {
    /// Render the answer as text.
    ///
    /// Plain values are shown as-is, objects by their `label`, lists are
    /// joined with `", "`.
    #[must_use]
    pub fn answer_display(&self) -> String {
        display_answer(&self.answer)
    }
}

fn display_answer(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "Ja" } else { "Nee" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_answer)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => match map.get("label") {
            Some(Value::String(label)) => label.clone(),
            _ => map.get("value").map(display_answer).unwrap_or_default(),
        },
    }
}

// =============================================================================
// Attachment
// =============================================================================

/// Who uploaded an attachment.
///
/// `Anonymous` covers uploads made without a login: in practice the
/// reporter's own photos submitted with the signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Creator {
    #[default]
    Anonymous,
    User(String),
}

impl Creator {
    #[must_use]
    pub fn from_email(email: Option<String>) -> Self {
        email.map_or(Self::Anonymous, Self::User)
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(email) => Some(email),
        }
    }
}

impl Serialize for Creator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.email().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Creator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(Self::from_email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub file_name: String,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default)]
    pub created_by: Creator,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Signal
// =============================================================================

/// Position of a signal in the parent/child hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralKind {
    Normal,
    Parent,
    Child,
}

/// A citizen-filed incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub source: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub incident_date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub incident_date_end: Option<DateTime<Utc>>,
    pub category: Category,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub child_ids: Vec<i64>,
    #[serde(default)]
    pub reporter: Reporter,
    pub status: Status,
    /// Full status history, oldest first.
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub extra_properties: Vec<ExtraProperty>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

impl Signal {
    /// Display identifier, e.g. `SIG-123`.
    #[must_use]
    pub fn id_display(&self) -> String {
        format!("SIG-{}", self.id)
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }

    #[must_use]
    pub const fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Classify this signal in the hierarchy.
    ///
    /// Having children wins over having a parent: a child that itself has
    /// children is a `Parent`.
    #[must_use]
    pub fn structural_kind(&self) -> StructuralKind {
        if self.has_children() {
            StructuralKind::Parent
        } else if self.has_parent() {
            StructuralKind::Child
        } else {
            StructuralKind::Normal
        }
    }

    /// Look up one of this signal's attachments together with the signal.
    #[must_use]
    pub fn attachment(&self, attachment_id: i64) -> Option<SignalAttachment<'_>> {
        self.attachments
            .iter()
            .find(|a| a.id == attachment_id)
            .map(|attachment| SignalAttachment {
                signal: self,
                attachment,
            })
    }
}

/// An attachment viewed through the signal that owns it.
#[derive(Debug, Clone, Copy)]
pub struct SignalAttachment<'a> {
    pub signal: &'a Signal,
    pub attachment: &'a Attachment,
}

// =============================================================================
// Principal
// =============================================================================

/// An authenticated official making a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    #[serde(default)]
    pub departments: BTreeSet<i64>,
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl Principal {
    #[must_use]
    pub fn has_perm(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// True when this principal uploaded an attachment with the given creator.
    #[must_use]
    pub fn is_creator(&self, creator: &Creator) -> bool {
        creator.email() == Some(self.email.as_str())
    }
}
