use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a single mail item returned by a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
    pub thread_id: Option<String>,
}

impl MessageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// One page of listing results plus the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<MessageRef>,
    pub next_page_token: Option<String>,
}

/// From/Subject headers of a single message, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub sender: Option<String>,
    pub subject: Option<String>,
}

impl fmt::Display for MessageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Sender: {}, Subject: {}",
            self.id,
            self.sender.as_deref().unwrap_or("N/A"),
            self.subject.as_deref().unwrap_or("N/A")
        )
    }
}

/// Why acting on one message failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The delete call was rejected for this message
    DeleteFailed(String),
    /// The metadata fetch failed while describing matches
    FetchFailed(String),
}

/// One recorded per-message failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    pub message_id: String,
    pub kind: FailureKind,
}

/// Aggregated result of one pipeline run
///
/// Mutated as each message is processed, read once at the end. Holds the
/// invariant `deleted_count <= matched_count`; `matches` is populated only
/// when match descriptions were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub matched_count: usize,
    pub deleted_count: usize,
    pub errors: Vec<SweepFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub matches: Vec<MessageSummary>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render the summary as pretty-printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn record_failure(&mut self, message_id: impl Into<String>, kind: FailureKind) {
        self.errors.push(SweepFailure {
            message_id: message_id.into(),
            kind,
        });
    }
}
