//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use gmail_sweep::client::{GmailClient, LabelInfo};
use gmail_sweep::error::{Result, SweepError};
use gmail_sweep::models::{MessagePage, MessageRef, MessageSummary};
use mockall::mock;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Create a test message ref with a derived thread id
pub fn msg_ref(id: &str) -> MessageRef {
    MessageRef {
        id: id.to_string(),
        thread_id: Some(format!("thread_{}", id)),
    }
}

/// Create a listing page from ids plus an optional continuation token
pub fn page(ids: &[&str], next_page_token: Option<&str>) -> MessagePage {
    MessagePage {
        messages: ids.iter().map(|id| msg_ref(id)).collect(),
        next_page_token: next_page_token.map(|t| t.to_string()),
    }
}

/// Create a message summary with derived sender/subject
pub fn summary_for(id: &str) -> MessageSummary {
    MessageSummary {
        id: id.to_string(),
        sender: Some(format!("{}@example.com", id)),
        subject: Some(format!("Subject {}", id)),
    }
}

// Mock implementation of GmailClient for testing
mock! {
    pub GmailClient {}

    #[async_trait]
    impl GmailClient for GmailClient {
        async fn list_page<'a, 'b, 'c>(&'a self, query: &'b str, page_token: Option<&'c str>) -> Result<MessagePage>;
        async fn get_summary(&self, id: &str) -> Result<MessageSummary>;
        async fn delete_message(&self, id: &str) -> Result<()>;
        async fn list_labels(&self) -> Result<Vec<LabelInfo>>;
        async fn create_label(&self, name: &str) -> Result<String>;
        async fn batch_modify(
            &self,
            message_ids: &[String],
            add_label_ids: &[String],
            remove_label_ids: &[String],
        ) -> Result<usize>;
    }
}

/// Record of the calls a `ScriptedClient` received
#[derive(Clone, Default)]
pub struct CallLog {
    pub list_calls: Arc<Mutex<usize>>,
    pub delete_calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn list_count(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

/// Deterministic scripted client for property tests
///
/// Serves a fixed sequence of listing pages and fails deletes for a fixed
/// set of ids; everything else is off-limits.
pub struct ScriptedClient {
    pages: Mutex<VecDeque<MessagePage>>,
    failing_deletes: HashSet<String>,
    log: CallLog,
}

impl ScriptedClient {
    pub fn new(pages: Vec<MessagePage>, failing_deletes: HashSet<String>) -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                pages: Mutex::new(pages.into()),
                failing_deletes,
                log: log.clone(),
            },
            log,
        )
    }
}

#[async_trait]
impl GmailClient for ScriptedClient {
    async fn list_page(&self, _query: &str, _page_token: Option<&str>) -> Result<MessagePage> {
        *self.log.list_calls.lock().unwrap() += 1;
        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn get_summary(&self, id: &str) -> Result<MessageSummary> {
        Ok(summary_for(id))
    }

    async fn delete_message(&self, id: &str) -> Result<()> {
        self.log.delete_calls.lock().unwrap().push(id.to_string());
        if self.failing_deletes.contains(id) {
            Err(SweepError::MessageNotFound(id.to_string()))
        } else {
            Ok(())
        }
    }

    async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
        panic!("list_labels is not scripted");
    }

    async fn create_label(&self, _name: &str) -> Result<String> {
        panic!("create_label is not scripted");
    }

    async fn batch_modify(&self, _: &[String], _: &[String], _: &[String]) -> Result<usize> {
        panic!("batch_modify is not scripted");
    }
}
