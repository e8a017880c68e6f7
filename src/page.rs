use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a logical screen, e.g. `"dashboard"` or `"grades"`.
///
/// Carries no structure beyond equality; it is never parsed as a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for PageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::PageId;

    #[test]
    fn serializes_as_bare_string() {
        let page = PageId::from("grades");
        let json = serde_json::to_string(&page).expect("page id should serialize");
        assert_eq!(json, "\"grades\"");

        let back: PageId = serde_json::from_str(&json).expect("page id should deserialize");
        assert_eq!(back, "grades");
    }
}
