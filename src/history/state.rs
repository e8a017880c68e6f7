use std::collections::VecDeque;

use crate::page::PageId;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// History was cut back to end at an earlier visit of the page.
    Truncated { removed: usize },
    Appended,
}

/// Ordered, bounded record of visited pages.
///
/// `entries` is never empty and its last element is always `current`.
/// Non-adjacent duplicates are allowed; adjacent ones are not.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    entries: VecDeque<PageId>,
    current: PageId,
    capacity: usize,
}

impl NavigationStack {
    pub fn new(initial: PageId) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(initial: PageId, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(1));
        entries.push_back(initial.clone());
        Self {
            entries,
            current: initial,
            capacity: capacity.max(1),
        }
    }

    pub fn current(&self) -> &PageId {
        &self.current
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn entries(&self) -> impl Iterator<Item = &PageId> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<PageId> {
        self.entries.iter().cloned().collect()
    }

    /// Returns `false` when `page` is already current.
    pub fn push(&mut self, page: PageId) -> bool {
        if page == self.current {
            return false;
        }
        self.append(page);
        true
    }

    pub fn pop(&mut self) -> Option<PageId> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_back();
        let top = self.entries.back()?.clone();
        self.current = top.clone();
        Some(top)
    }

    pub fn reset(&mut self, page: PageId) {
        self.entries.clear();
        self.entries.push_back(page.clone());
        self.current = page;
    }

    /// Aligns the stack with a page the host made current on its own.
    ///
    /// With duplicates present the latest visit wins, so the fewest entries
    /// are discarded.
    pub fn reconcile(&mut self, page: PageId) -> Reconciliation {
        if page == self.current {
            return Reconciliation::Unchanged;
        }

        match self.entries.iter().rposition(|entry| *entry == page) {
            Some(index) => {
                let removed = self.entries.len() - (index + 1);
                self.entries.truncate(index + 1);
                self.current = page;
                Reconciliation::Truncated { removed }
            }
            None => {
                self.append(page);
                Reconciliation::Appended
            }
        }
    }

    fn append(&mut self, page: PageId) {
        self.entries.push_back(page.clone());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.current = page;
    }
}
