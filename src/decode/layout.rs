//! Page layout configuration

use serde::{Deserialize, Serialize};

/// Where the pagination fields live inside a reply.
///
/// Paths use dot notation (`results.num-records`, optionally prefixed with
/// `$.`). The items path may also be a JSONPath wildcard expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Path to the declared record count
    pub num_records_path: String,
    /// Path to the item container
    pub items_path: String,
    /// Path to the continuation token
    pub next_tag_path: String,
    /// Path to the call status, `None` to skip status checks
    pub status_path: Option<String>,
    /// Path to the error number of a failed call
    pub errno_path: String,
    /// Path to the error reason of a failed call
    pub reason_path: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            num_records_path: "num-records".to_string(),
            items_path: "attributes-list".to_string(),
            next_tag_path: "next-tag".to_string(),
            status_path: Some("status".to_string()),
            errno_path: "errno".to_string(),
            reason_path: "reason".to_string(),
        }
    }
}

impl PageLayout {
    /// Create the default layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Nest every path under a common root element
    #[must_use]
    pub fn under(mut self, root: &str) -> Self {
        let root = root.strip_prefix("$.").unwrap_or(root);
        let nest = |path: &str| format!("{root}.{}", path.strip_prefix("$.").unwrap_or(path));
        self.num_records_path = nest(&self.num_records_path);
        self.items_path = nest(&self.items_path);
        self.next_tag_path = nest(&self.next_tag_path);
        self.errno_path = nest(&self.errno_path);
        self.reason_path = nest(&self.reason_path);
        self.status_path = self.status_path.as_deref().map(nest);
        self
    }

    /// Set the item container path
    #[must_use]
    pub fn with_items_path(mut self, path: impl Into<String>) -> Self {
        self.items_path = path.into();
        self
    }

    /// Disable status checks
    #[must_use]
    pub fn without_status(mut self) -> Self {
        self.status_path = None;
        self
    }
}
