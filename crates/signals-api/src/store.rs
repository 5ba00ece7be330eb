//! Record lookup for the request boundary.
//!
//! Handlers resolve signals through [`SignalStore`] before consulting the
//! policy engines. Every lookup returns a fresh snapshot; nothing is cached
//! between requests.

use std::collections::BTreeMap;

use signals_core::{Signal, SignalsError, SignalsResult};

pub trait SignalStore {
    /// Snapshot of the signal with `id`, if it exists.
    fn signal(&self, id: i64) -> Option<Signal>;

    fn remove_attachment(&mut self, signal_id: i64, attachment_id: i64) -> SignalsResult<()>;
}

/// In-memory store keyed by signal id.
///
/// Keeps the parent/child relation consistent in both directions: a signal
/// inserted with a `parent_id` is registered in its parent's `child_ids`,
/// whichever of the two is inserted first. Re-inserting a signal under a
/// different parent unregisters it from the previous one.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    signals: BTreeMap<i64, Signal>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut signal: Signal) {
        let id = signal.id;

        let previous_parent = self.signals.get(&id).and_then(|old| old.parent_id);
        if previous_parent != signal.parent_id
            && let Some(old_parent) = previous_parent.and_then(|p| self.signals.get_mut(&p))
        {
            old_parent.child_ids.retain(|child| *child != id);
        }

        // Children inserted before this parent.
        for other in self.signals.values() {
            if other.parent_id == Some(id) && !signal.child_ids.contains(&other.id) {
                signal.child_ids.push(other.id);
            }
        }

        if let Some(parent) = signal
            .parent_id
            .and_then(|parent_id| self.signals.get_mut(&parent_id))
            && !parent.child_ids.contains(&id)
        {
            parent.child_ids.push(id);
        }

        self.signals.insert(id, signal);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

}

impl FromIterator<Signal> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        let mut store = Self::new();
        for signal in iter {
            store.insert(signal);
        }
        store
    }
}

impl SignalStore for MemoryStore {
    fn signal(&self, id: i64) -> Option<Signal> {
        self.signals.get(&id).cloned()
    }

    fn remove_attachment(&mut self, signal_id: i64, attachment_id: i64) -> SignalsResult<()> {
        let signal = self
            .signals
            .get_mut(&signal_id)
            .ok_or(SignalsError::SignalNotFound(signal_id))?;
        let before = signal.attachments.len();
        signal.attachments.retain(|a| a.id != attachment_id);
        if signal.attachments.len() == before {
            return Err(SignalsError::AttachmentNotFound {
                signal_id,
                attachment_id,
            });
        }
        tracing::info!(signal_id, attachment_id, "attachment removed");
        Ok(())
    }
}
