//! Permission catalogue.
//!
//! Permissions are flat capabilities granted to a principal. There is no
//! inheritance and no dynamic lookup: a principal either holds a capability
//! or it does not.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Application label used to qualify permission codenames.
pub const APP_LABEL: &str = "signals";

/// A single grantable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    SiaRead,
    SiaWrite,
    SiaSignalCreateInitial,
    SiaSignalCreateNote,
    SiaSignalChangeStatus,
    SiaSignalChangeCategory,
    SiaSignalReport,
    SiaCanViewContactDetails,
    DeleteAttachmentOfOtherUser,
    DeleteAttachmentOfNormalSignal,
    DeleteAttachmentOfParentSignal,
    DeleteAttachmentOfChildSignal,
}

impl Permission {
    pub const ALL: [Self; 12] = [
        Self::SiaRead,
        Self::SiaWrite,
        Self::SiaSignalCreateInitial,
        Self::SiaSignalCreateNote,
        Self::SiaSignalChangeStatus,
        Self::SiaSignalChangeCategory,
        Self::SiaSignalReport,
        Self::SiaCanViewContactDetails,
        Self::DeleteAttachmentOfOtherUser,
        Self::DeleteAttachmentOfNormalSignal,
        Self::DeleteAttachmentOfParentSignal,
        Self::DeleteAttachmentOfChildSignal,
    ];

    /// Bare codename, e.g. `delete_attachment_of_child_signal`.
    #[must_use]
    pub const fn codename(self) -> &'static str {
        match self {
            Self::SiaRead => "sia_read",
            Self::SiaWrite => "sia_write",
            Self::SiaSignalCreateInitial => "sia_signal_create_initial",
            Self::SiaSignalCreateNote => "sia_signal_create_note",
            Self::SiaSignalChangeStatus => "sia_signal_change_status",
            Self::SiaSignalChangeCategory => "sia_signal_change_category",
            Self::SiaSignalReport => "sia_signal_report",
            Self::SiaCanViewContactDetails => "sia_can_view_contact_details",
            Self::DeleteAttachmentOfOtherUser => "delete_attachment_of_other_user",
            Self::DeleteAttachmentOfNormalSignal => "delete_attachment_of_normal_signal",
            Self::DeleteAttachmentOfParentSignal => "delete_attachment_of_parent_signal",
            Self::DeleteAttachmentOfChildSignal => "delete_attachment_of_child_signal",
        }
    }

    /// Codename qualified with the app label, e.g. `signals.sia_read`.
    #[must_use]
    pub fn qualified_name(self) -> String {
        format!("{APP_LABEL}.{}", self.codename())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

impl FromStr for Permission {
    type Err = Error;

    /// Accepts either the bare codename or the `signals.`-qualified name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let codename = trimmed
            .strip_prefix(APP_LABEL)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|p| p.codename() == codename)
            .ok_or_else(|| Error::UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.codename())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The set of capabilities granted to a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when every permission in `required` is held.
    #[must_use]
    pub fn contains_all(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.0.contains(p))
    }

    pub fn grant(&mut self, permission: Permission) -> &mut Self {
        self.0.insert(permission);
        self
    }

    pub fn revoke(&mut self, permission: Permission) -> &mut Self {
        self.0.remove(&permission);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(value: [Permission; N]) -> Self {
        value.into_iter().collect()
    }
}
