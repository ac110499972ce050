//! Gmail API client trait and its production implementation

use async_trait::async_trait;
use google_gmail1::api::{BatchModifyMessagesRequest, Label, Message};
use tracing::debug;

use crate::auth::{GmailHub, MAIL_SCOPE};
use crate::error::{Result, SweepError};
use crate::models::{MessagePage, MessageRef, MessageSummary};

/// All requests act on the authenticated account
const USER_ID: &str = "me";

/// Gmail allows at most 1000 ids per batchModify call
const BATCH_MODIFY_LIMIT: usize = 1000;

/// Label info returned from Gmail API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInfo {
    pub id: String,
    pub name: String,
}

/// Mailbox operations the rest of the crate depends on
///
/// The pipeline and maintenance loops are written against this trait so they
/// can be exercised with a mock client instead of the live API.
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// Fetch one page of message refs matching a query
    ///
    /// Pass the continuation token from the previous page to advance;
    /// a page without a token is the last one.
    async fn list_page(&self, query: &str, page_token: Option<&str>) -> Result<MessagePage>;

    /// Fetch From/Subject headers for a single message
    async fn get_summary(&self, id: &str) -> Result<MessageSummary>;

    /// Permanently delete a single message
    async fn delete_message(&self, id: &str) -> Result<()>;

    /// List all labels in the account
    async fn list_labels(&self) -> Result<Vec<LabelInfo>>;

    /// Create a new label, returning its ID
    async fn create_label(&self, name: &str) -> Result<String>;

    /// Add and/or remove labels on multiple messages
    ///
    /// Ids are chunked to the API's per-call limit. Returns the number of
    /// messages modified.
    async fn batch_modify(
        &self,
        message_ids: &[String],
        add_label_ids: &[String],
        remove_label_ids: &[String],
    ) -> Result<usize>;
}

/// Client backed by the live Gmail API
pub struct ProductionGmailClient {
    hub: GmailHub,
    page_size: u32,
}

impl ProductionGmailClient {
    /// # Arguments
    /// * `hub` - authenticated Gmail hub
    /// * `page_size` - listing page size (the API caps it at 500)
    pub fn new(hub: GmailHub, page_size: u32) -> Self {
        Self { hub, page_size }
    }
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn list_page(&self, query: &str, page_token: Option<&str>) -> Result<MessagePage> {
        let mut call = self
            .hub
            .users()
            .messages_list(USER_ID)
            .q(query)
            .max_results(self.page_size);

        if let Some(token) = page_token {
            call = call.page_token(token);
        }

        let (_, response) = call.add_scope(MAIL_SCOPE).doit().await?;

        let messages: Vec<MessageRef> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|msg| {
                msg.id.map(|id| MessageRef {
                    id,
                    thread_id: msg.thread_id,
                })
            })
            .collect();

        debug!(
            "Listed page of {} messages, more: {}",
            messages.len(),
            response.next_page_token.is_some()
        );

        Ok(MessagePage {
            messages,
            next_page_token: response.next_page_token,
        })
    }

    async fn get_summary(&self, id: &str) -> Result<MessageSummary> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get(USER_ID, id)
            .format("metadata")
            .add_metadata_headers("From")
            .add_metadata_headers("Subject")
            .add_scope(MAIL_SCOPE)
            .doit()
            .await?;

        Ok(parse_message_summary(id, msg))
    }

    async fn delete_message(&self, id: &str) -> Result<()> {
        self.hub
            .users()
            .messages_delete(USER_ID, id)
            .add_scope(MAIL_SCOPE)
            .doit()
            .await?;

        debug!("Deleted message {}", id);
        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
        let (_, response) = self
            .hub
            .users()
            .labels_list(USER_ID)
            .add_scope(MAIL_SCOPE)
            .doit()
            .await?;

        let labels = response
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|label| match (label.id, label.name) {
                (Some(id), Some(name)) => Some(LabelInfo { id, name }),
                _ => None,
            })
            .collect();

        Ok(labels)
    }

    async fn create_label(&self, name: &str) -> Result<String> {
        let label = Label {
            name: Some(name.to_string()),
            message_list_visibility: Some("show".to_string()),
            label_list_visibility: Some("labelShow".to_string()),
            ..Default::default()
        };

        let (_, created) = self
            .hub
            .users()
            .labels_create(label, USER_ID)
            .add_scope(MAIL_SCOPE)
            .doit()
            .await?;

        created
            .id
            .ok_or_else(|| SweepError::LabelError("Created label has no ID".to_string()))
    }

    async fn batch_modify(
        &self,
        message_ids: &[String],
        add_label_ids: &[String],
        remove_label_ids: &[String],
    ) -> Result<usize> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let add = (!add_label_ids.is_empty()).then(|| add_label_ids.to_vec());
        let remove = (!remove_label_ids.is_empty()).then(|| remove_label_ids.to_vec());

        let mut total_modified = 0;
        for chunk in message_ids.chunks(BATCH_MODIFY_LIMIT) {
            let request = BatchModifyMessagesRequest {
                ids: Some(chunk.to_vec()),
                add_label_ids: add.clone(),
                remove_label_ids: remove.clone(),
            };

            self.hub
                .users()
                .messages_batch_modify(request, USER_ID)
                .add_scope(MAIL_SCOPE)
                .doit()
                .await?;

            total_modified += chunk.len();
        }

        Ok(total_modified)
    }
}

/// Pull From/Subject headers out of a metadata-format message
fn parse_message_summary(requested_id: &str, msg: Message) -> MessageSummary {
    let mut sender = None;
    let mut subject = None;

    if let Some(headers) = msg.payload.as_ref().and_then(|p| p.headers.as_ref()) {
        for header in headers {
            if let (Some(name), Some(value)) = (&header.name, &header.value) {
                match name.to_lowercase().as_str() {
                    "from" => sender = Some(value.clone()),
                    "subject" => subject = Some(value.clone()),
                    _ => {}
                }
            }
        }
    }

    MessageSummary {
        id: msg.id.unwrap_or_else(|| requested_id.to_string()),
        sender,
        subject,
    }
}
