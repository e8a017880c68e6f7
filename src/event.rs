use serde_json::Value;

use crate::page::PageId;
use crate::platform::ChannelKind;

/// Describes *why* the active page changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavReason {
    /// Forward navigation requested by the UI (`navigate_to`).
    Navigate,
    /// Stack pop, from a UI back affordance or a platform back signal.
    Back,
    /// Full re-initialization (`reset_to`), e.g. after login.
    Reset,
    /// Host history traversal the coordinator did not initiate.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChange {
    pub from: PageId,
    pub to: PageId,
    pub reason: NavReason,
}

/// A platform event as delivered by one registered channel, before
/// coalescing. The channel has already suppressed the host default.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSignal {
    BackPressed { channel: ChannelKind },
    HistoryChanged { state: Option<Value> },
}

/// Canonical signal handed to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum NavSignal {
    Back { source: ChannelKind },
    HostHistory { state: Option<Value> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The stack popped; the host default stays suppressed.
    Absorbed,
    /// At root; the host default (exit, leave page) should proceed.
    PassThrough,
    /// Internal stack realigned to a host history traversal.
    Reconciled,
    /// Nothing to do (unrecognized payload, already in sync, inert sync).
    Ignored,
}
