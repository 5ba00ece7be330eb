//! Property-based test generators for Signals records.
//!
//! Strategies produce the inputs the policy engines branch on: permission
//! sets, department memberships, structural kinds and optional contact
//! values.

use std::collections::BTreeSet;

use proptest::prelude::*;
use signals_core::{Feedback, Permission, PermissionSet, StructuralKind};

use crate::at_minutes;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Shared proptest configuration: 512 cases, generous shrink budget.
#[must_use]
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 512,
        max_shrink_iters: 5000,
        ..ProptestConfig::default()
    }
}

// ─── Leaf strategies ─────────────────────────────────────────────────────────

pub fn arb_permission() -> impl Strategy<Value = Permission> {
    proptest::sample::select(Permission::ALL.to_vec())
}

/// Any subset of the permission catalogue, each permission independently.
pub fn arb_permission_set() -> impl Strategy<Value = PermissionSet> {
    proptest::collection::vec(any::<bool>(), Permission::ALL.len()).prop_map(|mask| {
        mask.into_iter()
            .zip(Permission::ALL)
            .filter_map(|(granted, permission)| granted.then_some(permission))
            .collect()
    })
}

/// Department ids from a small range so that overlaps are common.
pub fn arb_department_ids() -> impl Strategy<Value = BTreeSet<i64>> {
    proptest::collection::btree_set(1..=12i64, 0..4)
}

pub fn arb_structural_kind() -> impl Strategy<Value = StructuralKind> {
    prop_oneof![
        Just(StructuralKind::Normal),
        Just(StructuralKind::Parent),
        Just(StructuralKind::Child),
    ]
}

pub fn arb_email() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(
        proptest::string::string_regex("[a-z]{1,12}@[a-z]{2,8}\\.nl").expect("valid regex"),
    )
}

pub fn arb_phone() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::string::string_regex("06[0-9]{8}").expect("valid regex"))
}

// ─── Composite strategies ────────────────────────────────────────────────────

/// Feedback that may or may not have been submitted, within the first day.
pub fn arb_feedback() -> impl Strategy<Value = Feedback> {
    (
        proptest::option::of(0..1440i64),
        proptest::option::of(any::<bool>()),
        proptest::option::of("[a-z ]{0,20}"),
    )
        .prop_map(|(minute, is_satisfied, text)| Feedback {
            submitted_at: minute.map(at_minutes),
            is_satisfied,
            text,
            text_extra: None,
            text_list: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::test_runner::TestRunner;

    #[test]
    fn permission_sets_stay_within_catalogue() {
        let mut runner = TestRunner::new(proptest_config());
        runner
            .run(&arb_permission_set(), |set| {
                prop_assert!(set.len() <= Permission::ALL.len());
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn department_ids_are_bounded() {
        let mut runner = TestRunner::default();
        runner
            .run(&arb_department_ids(), |ids| {
                prop_assert!(ids.len() < 4);
                prop_assert!(ids.iter().all(|id| (1..=12).contains(id)));
                Ok(())
            })
            .unwrap();
    }
}
