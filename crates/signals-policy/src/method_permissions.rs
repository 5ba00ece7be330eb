//! Per-endpoint permission profiles keyed by HTTP method.
//!
//! Officials hold binary read/write permissions plus a few action specific
//! ones. Each endpoint picks a profile; the profile lists the permissions
//! every request method requires. A method missing from the profile is not
//! allowed at all.

use std::fmt;
use std::str::FromStr;

use signals_core::{Permission, Principal, SignalsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Options,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SignalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "OPTIONS" => Ok(Self::Options),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(SignalsError::MethodNotAllowed(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionProfile {
    /// Plain read/write endpoints.
    Sia,
    SignalCreateInitial,
    SignalCreateNote,
    SignalChangeStatus,
    SignalChangeCategory,
    SiaReport,
}

const NONE: &[Permission] = &[];
const READ: &[Permission] = &[Permission::SiaRead];
const WRITE: &[Permission] = &[Permission::SiaWrite];

impl PermissionProfile {
    /// Permissions required for `method`, or `None` if the method is not
    /// allowed on endpoints with this profile.
    #[must_use]
    pub const fn required(self, method: HttpMethod) -> Option<&'static [Permission]> {
        use HttpMethod as M;
        match (self, method) {
            (_, M::Options | M::Head) => Some(NONE),
            (Self::SiaReport, M::Get) => {
                Some(&[Permission::SiaRead, Permission::SiaSignalReport])
            }
            (_, M::Get) => Some(READ),
            (Self::Sia, M::Post | M::Put | M::Patch | M::Delete)
            | (Self::SignalCreateInitial, M::Put | M::Patch) => Some(WRITE),
            (Self::SignalCreateInitial, M::Post) => {
                Some(&[Permission::SiaWrite, Permission::SiaSignalCreateInitial])
            }
            (Self::SignalCreateNote, M::Put | M::Patch) => {
                Some(&[Permission::SiaWrite, Permission::SiaSignalCreateNote])
            }
            (Self::SignalChangeStatus, M::Put | M::Patch) => {
                Some(&[Permission::SiaWrite, Permission::SiaSignalChangeStatus])
            }
            (Self::SignalChangeCategory, M::Put | M::Patch) => {
                Some(&[Permission::SiaWrite, Permission::SiaSignalChangeCategory])
            }
            _ => None,
        }
    }

    /// Check `principal` against the profile.
    ///
    /// Returns `Ok(false)` when a required permission is missing and
    /// `Err(MethodNotAllowed)` when the method is not part of the profile.
    pub fn has_permission(
        self,
        principal: &Principal,
        method: HttpMethod,
    ) -> Result<bool, SignalsError> {
        let required = self
            .required(method)
            .ok_or_else(|| SignalsError::MethodNotAllowed(method.to_string()))?;
        let granted = principal.permissions.contains_all(required);
        if !granted {
            tracing::debug!(
                principal = %principal.email,
                profile = ?self,
                %method,
                "method permission check failed"
            );
        }
        Ok(granted)
    }
}
