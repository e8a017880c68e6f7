use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::page::PageId;

/// State object stored in each host history entry the shell writes.
///
/// `epoch` counts resets; entries written before the latest reset belong to
/// an older epoch and no longer map onto the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPayload {
    pub page: PageId,
    #[serde(default)]
    pub epoch: u64,
}

impl HistoryPayload {
    pub fn new(page: PageId) -> Self {
        Self::with_epoch(page, 0)
    }

    pub fn with_epoch(page: PageId, epoch: u64) -> Self {
        Self { page, epoch }
    }

    pub fn to_value(&self) -> Value {
        json!({ "page": self.page, "epoch": self.epoch })
    }

    /// `None` for entries the shell did not write, e.g. the entry that
    /// preceded the application.
    pub fn from_state(state: &Value) -> Option<Self> {
        serde_json::from_value(state.clone()).ok()
    }
}

/// The host's session-history list. Owned by the host; the shell only
/// appends, overwrites the current entry, and reads it back.
pub trait HostHistory {
    fn push_entry(&mut self, payload: &HistoryPayload) -> AppResult<()>;

    fn replace_entry(&mut self, payload: &HistoryPayload) -> AppResult<()>;

    fn current_state(&self) -> Option<Value>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::HistoryPayload;
    use crate::page::PageId;

    #[test]
    fn parses_page_and_ignores_extra_fields() {
        let state = json!({ "page": "grades", "scroll": 120 });
        let payload = HistoryPayload::from_state(&state).expect("payload should parse");
        assert_eq!(payload.page, PageId::from("grades"));
        assert_eq!(payload.epoch, 0);
    }

    #[test]
    fn rejects_foreign_state() {
        assert_eq!(HistoryPayload::from_state(&json!(null)), None);
        assert_eq!(HistoryPayload::from_state(&json!({ "route": "/x" })), None);
        assert_eq!(HistoryPayload::from_state(&json!({ "page": 7 })), None);
    }

    #[test]
    fn to_value_matches_wire_shape() {
        let payload = HistoryPayload::with_epoch("library".into(), 2);
        assert_eq!(payload.to_value(), json!({ "page": "library", "epoch": 2 }));
    }
}
