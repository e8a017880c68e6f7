use serde_json::Value;

use crate::history::{NavigationStack, Reconciliation};
use crate::page::PageId;

use super::host::{HistoryPayload, HostHistory};

/// Mirrors stack transitions into host session history and folds host-side
/// traversals back into the stack. Inert when no host history is attached.
pub struct HistorySynchronizer {
    host: Option<Box<dyn HostHistory>>,
    epoch: u64,
}

impl HistorySynchronizer {
    pub fn new(host: Box<dyn HostHistory>) -> Self {
        Self {
            host: Some(host),
            epoch: 0,
        }
    }

    pub fn inert() -> Self {
        Self {
            host: None,
            epoch: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.host.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn mirror_push(&mut self, page: &PageId) {
        let payload = HistoryPayload::with_epoch(page.clone(), self.epoch);
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if let Err(err) = host.push_entry(&payload) {
            log::warn!("could not push host history entry for {page}: {err}");
        }
    }

    /// Used for pops so the host list does not grow with them.
    pub fn mirror_replace(&mut self, page: &PageId) {
        let payload = HistoryPayload::with_epoch(page.clone(), self.epoch);
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if let Err(err) = host.replace_entry(&payload) {
            log::warn!("could not replace host history entry with {page}: {err}");
        }
    }

    /// Starts a new epoch so host entries written before the reset are no
    /// longer reconciled, then stamps `page` into the current entry.
    pub fn mirror_reset(&mut self, page: &PageId) {
        self.epoch = self.epoch.saturating_add(1);
        self.mirror_replace(page);
    }

    /// Applies a host traversal to the stack without writing back to the
    /// host. `state` falls back to the host's current entry when the signal
    /// carried none. Returns `None` when nothing changed.
    pub fn reconcile(
        &self,
        stack: &mut NavigationStack,
        state: Option<&Value>,
    ) -> Option<Reconciliation> {
        let host = self.host.as_ref()?;
        let payload = match state {
            Some(state) => HistoryPayload::from_state(state),
            None => host
                .current_state()
                .as_ref()
                .and_then(HistoryPayload::from_state),
        };
        let Some(payload) = payload else {
            log::debug!("host history entry has no page payload; leaving stack as is");
            return None;
        };
        if payload.epoch != self.epoch {
            log::debug!(
                "host history entry for {} predates the last reset (epoch {} < {}); ignoring",
                payload.page,
                payload.epoch,
                self.epoch
            );
            return None;
        }

        match stack.reconcile(payload.page) {
            Reconciliation::Unchanged => None,
            other => Some(other),
        }
    }
}

impl std::fmt::Debug for HistorySynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistorySynchronizer")
            .field("active", &self.is_active())
            .field("epoch", &self.epoch)
            .finish()
    }
}
