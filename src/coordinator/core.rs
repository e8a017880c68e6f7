use crate::event::{NavReason, NavSignal, PageChange, SignalOutcome};
use crate::history::{DEFAULT_HISTORY_CAPACITY, NavigationStack};
use crate::page::PageId;
use crate::sync::HistorySynchronizer;

use super::listeners::{ListenerId, ListenerSet};

/// Public façade over the page stack, host-history mirroring and page-change
/// listeners. The only writer of navigation state.
#[derive(Debug)]
pub struct Coordinator {
    stack: NavigationStack,
    sync: HistorySynchronizer,
    listeners: ListenerSet,
}

impl Coordinator {
    /// Stamps `initial` into the host's current entry so traversing back to
    /// it later is recognizable.
    pub fn new(initial: PageId, capacity: usize, mut sync: HistorySynchronizer) -> Self {
        sync.mirror_replace(&initial);
        Self {
            stack: NavigationStack::with_capacity(initial, capacity),
            sync,
            listeners: ListenerSet::default(),
        }
    }

    /// A coordinator with no host history, e.g. for hybrid shells and tests.
    pub fn standalone(initial: impl Into<PageId>) -> Self {
        Self::new(
            initial.into(),
            DEFAULT_HISTORY_CAPACITY,
            HistorySynchronizer::inert(),
        )
    }

    pub fn current(&self) -> &PageId {
        self.stack.current()
    }

    pub fn history(&self) -> Vec<PageId> {
        self.stack.to_vec()
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.can_go_back()
    }

    pub fn is_syncing_host_history(&self) -> bool {
        self.sync.is_active()
    }

    pub fn navigate_to(&mut self, page: impl Into<PageId>) {
        let page = page.into();
        let from = self.stack.current().clone();
        if !self.stack.push(page.clone()) {
            return;
        }
        self.sync.mirror_push(&page);
        log::debug!("navigate {from} -> {page}");
        self.emit(from, page, NavReason::Navigate);
    }

    /// `false` means nothing was popped and the host default should run.
    pub fn go_back(&mut self) -> bool {
        let from = self.stack.current().clone();
        let Some(to) = self.stack.pop() else {
            log::debug!("back at root {from}; passing to host");
            return false;
        };
        self.sync.mirror_replace(&to);
        log::debug!("back {from} -> {to}");
        self.emit(from, to, NavReason::Back);
        true
    }

    /// Drops all history; the previous pages are no longer reachable by back.
    pub fn reset_to(&mut self, page: impl Into<PageId>) {
        let page = page.into();
        let from = self.stack.current().clone();
        self.stack.reset(page.clone());
        self.sync.mirror_reset(&page);
        log::debug!("reset {from} -> {page}");
        if from != page {
            self.emit(from, page, NavReason::Reset);
        }
    }

    pub fn handle_signal(&mut self, signal: NavSignal) -> SignalOutcome {
        match signal {
            NavSignal::Back { source } => {
                log::trace!("back signal from {source}");
                if self.go_back() {
                    SignalOutcome::Absorbed
                } else {
                    SignalOutcome::PassThrough
                }
            }
            NavSignal::HostHistory { state } => {
                let from = self.stack.current().clone();
                match self.sync.reconcile(&mut self.stack, state.as_ref()) {
                    Some(reconciliation) => {
                        let to = self.stack.current().clone();
                        log::debug!("host history {from} -> {to} ({reconciliation:?})");
                        self.emit(from, to, NavReason::External);
                        SignalOutcome::Reconciled
                    }
                    None => SignalOutcome::Ignored,
                }
            }
        }
    }

    pub fn on_page_change(&mut self, listener: impl FnMut(&PageChange) + 'static) -> ListenerId {
        let id = self.listeners.add(listener);
        log::trace!("page listener {id:?} added; {} listening", self.listeners.len());
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscribe(&mut self) -> flume::Receiver<PageChange> {
        let rx = self.listeners.subscribe();
        log::trace!("page subscriber added; {} listening", self.listeners.len());
        rx
    }

    fn emit(&mut self, from: PageId, to: PageId, reason: NavReason) {
        let change = PageChange { from, to, reason };
        self.listeners.notify(&change);
    }
}
