//! Access decisions for signals and their attachments.
//!
//! Viewing is scoped by department: a principal sees a signal only when one
//! of their departments owns the signal's category. Deleting an attachment
//! additionally requires the delete permission for the signal's structural
//! kind and either authorship of the attachment, the override permission,
//! or an anonymous (reporter) upload.
//!
//! Checks run in a fixed order and the first failing gate decides the
//! [`DenyReason`]. A department mismatch always wins over any more specific
//! reason.

use signals_core::{Permission, Principal, Signal, SignalAttachment, StructuralKind};
use thiserror::Error;

/// Why a request was refused. All variants map to HTTP 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("No access to the category of this signal")]
    NoDepartmentAccess,

    #[error(
        "You are not allowed to delete attachments of this signal, missing permission: {}",
        .0.qualified_name()
    )]
    MissingPermission(Permission),

    #[error("You are not allowed to delete attachments uploaded by another user")]
    NotOwner,
}

impl DenyReason {
    /// Stable identifier for logs and JSON error payloads.
    #[must_use]
    pub const fn error_type(self) -> &'static str {
        match self {
            Self::NoDepartmentAccess => "STRUCTURAL_DENY",
            Self::MissingPermission(_) => "PERMISSION_DENY",
            Self::NotOwner => "OWNERSHIP_DENY",
        }
    }

    /// User-facing `detail` for the 403 response.
    ///
    /// A department mismatch carries no detail so that it never leaks which
    /// finer-grained check would have failed next.
    #[must_use]
    pub fn detail(self) -> Option<String> {
        match self {
            Self::NoDepartmentAccess => None,
            Self::MissingPermission(_) | Self::NotOwner => Some(self.to_string()),
        }
    }

    #[must_use]
    pub const fn http_status(self) -> u16 {
        403
    }
}

/// Permission needed to delete attachments of a signal of the given kind.
#[must_use]
pub const fn required_delete_permission(kind: StructuralKind) -> Permission {
    match kind {
        StructuralKind::Normal => Permission::DeleteAttachmentOfNormalSignal,
        StructuralKind::Parent => Permission::DeleteAttachmentOfParentSignal,
        StructuralKind::Child => Permission::DeleteAttachmentOfChildSignal,
    }
}

/// True iff one of the principal's departments owns the signal's category.
///
/// No permission overrides a missing department.
#[must_use]
pub fn can_view(principal: &Principal, signal: &Signal) -> bool {
    let allowed = !signal
        .category
        .department_ids()
        .is_disjoint(&principal.departments);
    tracing::debug!(
        principal = %principal.email,
        signal_id = signal.id,
        category = %signal.category.slug,
        allowed,
        "signal view decision"
    );
    allowed
}

/// Attachments are visible exactly when their signal is.
#[must_use]
pub fn can_view_attachment(principal: &Principal, attachment: SignalAttachment<'_>) -> bool {
    can_view(principal, attachment.signal)
}

/// Decide whether `principal` may delete `attachment`.
///
/// Gates, in order:
/// 1. department access to the owning signal,
/// 2. the delete permission for the signal's structural kind,
/// 3. authorship, `delete_attachment_of_other_user`, or an anonymous upload.
pub fn can_delete_attachment(
    principal: &Principal,
    attachment: SignalAttachment<'_>,
) -> Result<(), DenyReason> {
    let decision = evaluate_delete(principal, attachment);
    match decision {
        Ok(()) => tracing::debug!(
            principal = %principal.email,
            signal_id = attachment.signal.id,
            attachment_id = attachment.attachment.id,
            "attachment delete allowed"
        ),
        Err(reason) => tracing::debug!(
            principal = %principal.email,
            signal_id = attachment.signal.id,
            attachment_id = attachment.attachment.id,
            reason = reason.error_type(),
            "attachment delete denied"
        ),
    }
    decision
}

fn evaluate_delete(
    principal: &Principal,
    attachment: SignalAttachment<'_>,
) -> Result<(), DenyReason> {
    if !can_view_attachment(principal, attachment) {
        return Err(DenyReason::NoDepartmentAccess);
    }

    let required = required_delete_permission(attachment.signal.structural_kind());
    if !principal.has_perm(required) {
        return Err(DenyReason::MissingPermission(required));
    }

    let creator = &attachment.attachment.created_by;
    if creator.is_anonymous()
        || principal.is_creator(creator)
        || principal.has_perm(Permission::DeleteAttachmentOfOtherUser)
    {
        Ok(())
    } else {
        Err(DenyReason::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signals_test_helpers::{
        AttachmentFactory, CategoryFactory, DepartmentFactory, PrincipalFactory, SignalFactory,
    };

    const OFFICIAL: &str = "ambtenaar@example.com";

    const ALL_KIND_PERMISSIONS: [Permission; 3] = [
        Permission::DeleteAttachmentOfNormalSignal,
        Permission::DeleteAttachmentOfParentSignal,
        Permission::DeleteAttachmentOfChildSignal,
    ];

    struct Setup {
        department: signals_core::Department,
        signal: Signal,
    }

    fn setup(created_by: Option<&str>) -> Setup {
        let department = DepartmentFactory::create();
        let category = CategoryFactory::new()
            .department(department.clone())
            .build();
        let signal = SignalFactory::new()
            .category(category)
            .attachment(AttachmentFactory::image().created_by(created_by).build())
            .build();
        Setup { department, signal }
    }

    fn first_attachment(signal: &Signal) -> SignalAttachment<'_> {
        let id = signal.attachments[0].id;
        signal.attachment(id).expect("attachment")
    }

    #[test]
    fn cannot_view_without_department() {
        let s = setup(Some(OFFICIAL));
        let principal = PrincipalFactory::new(OFFICIAL).build();
        assert!(!can_view(&principal, &s.signal));
        assert!(!can_view_attachment(&principal, first_attachment(&s.signal)));
    }

    #[test]
    fn can_view_with_department() {
        let s = setup(Some(OFFICIAL));
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .build();
        assert!(can_view(&principal, &s.signal));
        assert!(can_view_attachment(&principal, first_attachment(&s.signal)));
    }

    #[test]
    fn department_mismatch_beats_every_permission() {
        let s = setup(Some(OFFICIAL));
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id + 1000)
            .grant_all(signals_core::Permission::ALL)
            .build();
        assert!(!can_view(&principal, &s.signal));
        let err = can_delete_attachment(&principal, first_attachment(&s.signal)).unwrap_err();
        assert_eq!(err, DenyReason::NoDepartmentAccess);
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn cannot_delete_others_attachment_without_override() {
        let s = setup(Some("collega@example.com"));
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant_all(ALL_KIND_PERMISSIONS)
            .build();
        assert_eq!(
            can_delete_attachment(&principal, first_attachment(&s.signal)),
            Err(DenyReason::NotOwner)
        );
    }

    #[test]
    fn can_delete_own_attachment_without_override() {
        let s = setup(Some(OFFICIAL));
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant_all(ALL_KIND_PERMISSIONS)
            .build();
        assert_eq!(
            can_delete_attachment(&principal, first_attachment(&s.signal)),
            Ok(())
        );
    }

    #[test]
    fn override_allows_deleting_others_and_reporter_attachments() {
        for created_by in [Some("collega@example.com"), None, Some(OFFICIAL)] {
            let s = setup(created_by);
            let principal = PrincipalFactory::new(OFFICIAL)
                .department(s.department.id)
                .grant_all(ALL_KIND_PERMISSIONS)
                .grant(Permission::DeleteAttachmentOfOtherUser)
                .build();
            assert_eq!(
                can_delete_attachment(&principal, first_attachment(&s.signal)),
                Ok(()),
                "created_by={created_by:?}"
            );
        }
    }

    #[test]
    fn anonymous_attachment_needs_no_override() {
        let s = setup(None);
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant_all(ALL_KIND_PERMISSIONS)
            .build();
        assert_eq!(
            can_delete_attachment(&principal, first_attachment(&s.signal)),
            Ok(())
        );
    }

    #[test]
    fn normal_signal_needs_normal_permission() {
        let s = setup(Some(OFFICIAL));
        let mut factory = PrincipalFactory::new(OFFICIAL).department(s.department.id);
        let without = factory.clone().build();
        assert_eq!(
            can_delete_attachment(&without, first_attachment(&s.signal)),
            Err(DenyReason::MissingPermission(
                Permission::DeleteAttachmentOfNormalSignal
            ))
        );

        factory = factory.grant(Permission::DeleteAttachmentOfNormalSignal);
        assert_eq!(
            can_delete_attachment(&factory.build(), first_attachment(&s.signal)),
            Ok(())
        );
    }

    #[test]
    fn parent_signal_needs_parent_permission() {
        let s = setup(Some(OFFICIAL));
        let parent = SignalFactory::from(s.signal).children([9_001]).build();
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant(Permission::DeleteAttachmentOfNormalSignal)
            .grant(Permission::DeleteAttachmentOfChildSignal)
            .build();

        let err = can_delete_attachment(&principal, first_attachment(&parent)).unwrap_err();
        assert_eq!(
            err,
            DenyReason::MissingPermission(Permission::DeleteAttachmentOfParentSignal)
        );
        let detail = err.detail().expect("detail");
        assert!(detail.contains("delete_attachment_of_parent_signal"), "{detail}");

        let granted = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant(Permission::DeleteAttachmentOfParentSignal)
            .build();
        assert_eq!(
            can_delete_attachment(&granted, first_attachment(&parent)),
            Ok(())
        );
    }

    #[test]
    fn child_signal_needs_child_permission() {
        let s = setup(Some(OFFICIAL));
        let child = SignalFactory::from(s.signal).parent(4_242).build();
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .build();

        assert!(can_view_attachment(&principal, first_attachment(&child)));
        let err = can_delete_attachment(&principal, first_attachment(&child)).unwrap_err();
        assert!(
            err.detail()
                .expect("detail")
                .contains("delete_attachment_of_child_signal")
        );

        let granted = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant(Permission::DeleteAttachmentOfChildSignal)
            .build();
        assert_eq!(
            can_delete_attachment(&granted, first_attachment(&child)),
            Ok(())
        );
    }

    #[test]
    fn child_with_children_requires_parent_permission_only() {
        let s = setup(Some(OFFICIAL));
        let middle = SignalFactory::from(s.signal)
            .parent(1)
            .children([2])
            .build();

        let child_only = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant(Permission::DeleteAttachmentOfChildSignal)
            .build();
        assert_eq!(
            can_delete_attachment(&child_only, first_attachment(&middle)),
            Err(DenyReason::MissingPermission(
                Permission::DeleteAttachmentOfParentSignal
            ))
        );

        let parent_only = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .grant(Permission::DeleteAttachmentOfParentSignal)
            .build();
        assert_eq!(
            can_delete_attachment(&parent_only, first_attachment(&middle)),
            Ok(())
        );
    }

    #[test]
    fn permission_check_precedes_ownership_check() {
        let s = setup(Some("collega@example.com"));
        let principal = PrincipalFactory::new(OFFICIAL)
            .department(s.department.id)
            .build();
        assert_eq!(
            can_delete_attachment(&principal, first_attachment(&s.signal)),
            Err(DenyReason::MissingPermission(
                Permission::DeleteAttachmentOfNormalSignal
            ))
        );
    }

    #[test]
    fn deny_reason_metadata() {
        assert_eq!(DenyReason::NoDepartmentAccess.error_type(), "STRUCTURAL_DENY");
        assert_eq!(
            DenyReason::MissingPermission(Permission::DeleteAttachmentOfChildSignal).error_type(),
            "PERMISSION_DENY"
        );
        assert_eq!(DenyReason::NotOwner.error_type(), "OWNERSHIP_DENY");
        assert!(DenyReason::NotOwner.detail().is_some());
        assert_eq!(DenyReason::NotOwner.http_status(), 403);
    }

    #[test]
    fn required_permission_per_kind() {
        assert_eq!(
            required_delete_permission(StructuralKind::Normal),
            Permission::DeleteAttachmentOfNormalSignal
        );
        assert_eq!(
            required_delete_permission(StructuralKind::Parent),
            Permission::DeleteAttachmentOfParentSignal
        );
        assert_eq!(
            required_delete_permission(StructuralKind::Child),
            Permission::DeleteAttachmentOfChildSignal
        );
    }
}
