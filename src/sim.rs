//! In-memory host used by the scenario runner and the test suites.
//!
//! Models a session-history list with back/forward traversal and the two
//! native bridges, and records what the shell asked of it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::page::PageId;
use crate::platform::{BackChannel, ChannelKind, HostCapabilities, SignalSink};
use crate::shell::HostEnvironment;
use crate::sync::{HistoryPayload, HostHistory};

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/131.0";
const ANDROID_WEBVIEW_USER_AGENT: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8 Build/UD1A; wv) AppleWebKit/537.36";

#[derive(Debug)]
struct SimState {
    caps: HostCapabilities,
    entries: Vec<Option<Value>>,
    index: usize,
    history_writes: usize,
    fail_history_writes: bool,
    fail_registration: Option<ChannelKind>,
    sinks: HashMap<ChannelKind, SignalSink>,
    suppressed_defaults: usize,
    released: Vec<ChannelKind>,
    exit_requested: bool,
}

#[derive(Debug, Clone)]
pub struct SimulatedHost {
    inner: Rc<RefCell<SimState>>,
}

impl SimulatedHost {
    /// The loaded document starts as a single entry with no state.
    pub fn new(caps: HostCapabilities) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimState {
                caps,
                entries: vec![None],
                index: 0,
                history_writes: 0,
                fail_history_writes: false,
                fail_registration: None,
                sinks: HashMap::new(),
                suppressed_defaults: 0,
                released: Vec::new(),
                exit_requested: false,
            })),
        }
    }

    pub fn browser() -> Self {
        Self::new(HostCapabilities {
            session_history: true,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            ..HostCapabilities::default()
        })
    }

    pub fn hybrid() -> Self {
        Self::new(HostCapabilities {
            plugin_bridge: true,
            session_history: true,
            user_agent: ANDROID_WEBVIEW_USER_AGENT.to_string(),
            ..HostCapabilities::default()
        })
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.inner.borrow().caps.clone()
    }

    pub fn session_history(&self) -> SimSessionHistory {
        SimSessionHistory {
            state: Rc::clone(&self.inner),
        }
    }

    pub fn back_channel(&self, kind: ChannelKind) -> SimChannel {
        SimChannel {
            kind,
            state: Rc::clone(&self.inner),
        }
    }

    /// One physical back gesture. Every registered bridge reports it; with
    /// only browser history registered the browser traverses and reports the
    /// entry it landed on. Returns the number of raw signals raised.
    pub fn press_back(&self) -> usize {
        let mut state = self.inner.borrow_mut();
        let mut raised = 0;
        for kind in [ChannelKind::PluginBridge, ChannelKind::MessageChannel] {
            if let Some(sink) = state.sinks.get(&kind).cloned() {
                state.suppressed_defaults += 1;
                if sink.back_pressed(kind) {
                    raised += 1;
                }
            }
        }
        if raised > 0 {
            return raised;
        }

        if state.index == 0 {
            state.exit_requested = true;
            return 0;
        }
        state.index -= 1;
        let landed = state.entries[state.index].clone();
        let Some(sink) = state.sinks.get(&ChannelKind::BrowserHistory) else {
            return 0;
        };
        usize::from(sink.history_changed(landed))
    }

    pub fn press_forward(&self) -> usize {
        let mut state = self.inner.borrow_mut();
        if state.index + 1 >= state.entries.len() {
            return 0;
        }
        state.index += 1;
        let landed = state.entries[state.index].clone();
        let Some(sink) = state.sinks.get(&ChannelKind::BrowserHistory) else {
            return 0;
        };
        usize::from(sink.history_changed(landed))
    }

    pub fn fail_registration(&self, kind: ChannelKind) {
        self.inner.borrow_mut().fail_registration = Some(kind);
    }

    pub fn fail_history_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_history_writes = fail;
    }

    pub fn registered(&self) -> Vec<ChannelKind> {
        let mut kinds: Vec<ChannelKind> = self.inner.borrow().sinks.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.as_str());
        kinds
    }

    pub fn history_pages(&self) -> Vec<Option<PageId>> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| {
                entry
                    .as_ref()
                    .and_then(HistoryPayload::from_state)
                    .map(|payload| payload.page)
            })
            .collect()
    }

    pub fn history_index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn current_page(&self) -> Option<PageId> {
        let index = self.history_index();
        self.history_pages().into_iter().nth(index).flatten()
    }

    pub fn history_writes(&self) -> usize {
        self.inner.borrow().history_writes
    }

    pub fn suppressed_defaults(&self) -> usize {
        self.inner.borrow().suppressed_defaults
    }

    pub fn released_defaults(&self) -> Vec<ChannelKind> {
        self.inner.borrow().released.clone()
    }

    pub fn exit_requested(&self) -> bool {
        self.inner.borrow().exit_requested
    }
}

impl HostEnvironment for SimulatedHost {
    fn probe(&self) -> HostCapabilities {
        self.capabilities()
    }

    fn channel(&mut self, kind: ChannelKind) -> AppResult<Box<dyn BackChannel>> {
        Ok(Box::new(self.back_channel(kind)))
    }

    fn host_history(&mut self) -> Option<Box<dyn HostHistory>> {
        if !self.inner.borrow().caps.session_history {
            return None;
        }
        Some(Box::new(self.session_history()))
    }
}

#[derive(Debug)]
pub struct SimChannel {
    kind: ChannelKind,
    state: Rc<RefCell<SimState>>,
}

impl BackChannel for SimChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn register(&mut self, sink: SignalSink) -> AppResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_registration == Some(self.kind) {
            return Err(AppError::registration(self.kind, "host rejected listener"));
        }
        state.sinks.insert(self.kind, sink);
        Ok(())
    }

    fn unregister(&mut self) {
        self.state.borrow_mut().sinks.remove(&self.kind);
    }

    fn release_default(&mut self) {
        let mut state = self.state.borrow_mut();
        state.released.push(self.kind);
        if self.kind.is_bridge() {
            state.exit_requested = true;
        }
    }
}

#[derive(Debug)]
pub struct SimSessionHistory {
    state: Rc<RefCell<SimState>>,
}

impl HostHistory for SimSessionHistory {
    fn push_entry(&mut self, payload: &HistoryPayload) -> AppResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_history_writes {
            return Err(AppError::host_history("pushState rejected"));
        }
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(Some(payload.to_value()));
        state.index = keep;
        state.history_writes += 1;
        Ok(())
    }

    fn replace_entry(&mut self, payload: &HistoryPayload) -> AppResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_history_writes {
            return Err(AppError::host_history("replaceState rejected"));
        }
        let index = state.index;
        state.entries[index] = Some(payload.to_value());
        state.history_writes += 1;
        Ok(())
    }

    fn current_state(&self) -> Option<Value> {
        let state = self.state.borrow();
        state.entries.get(state.index).cloned().flatten()
    }
}
