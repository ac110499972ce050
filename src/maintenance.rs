//! Bulk mailbox maintenance: mark-all-read and archive-all-mail

use chrono::Utc;
use tracing::{debug, info};

use crate::client::GmailClient;
use crate::error::Result;

const UNREAD_LABEL: &str = "UNREAD";
const INBOX_LABEL: &str = "INBOX";

/// Result of an archive-all-mail run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub archived: usize,
    pub label_name: String,
}

/// Mark every unread message as read, one page at a time
///
/// Returns the total number of messages modified.
pub async fn mark_all_read(client: &dyn GmailClient) -> Result<usize> {
    let mut total = 0;
    let mut page_token: Option<String> = None;

    loop {
        let page = client
            .list_page("is:unread", page_token.as_deref())
            .await?;

        if page.messages.is_empty() {
            break;
        }

        let ids: Vec<String> = page.messages.iter().map(|m| m.id.clone()).collect();
        let modified = client
            .batch_modify(&ids, &[], &[UNREAD_LABEL.to_string()])
            .await?;
        total += modified;
        debug!("Marked {} messages as read in this batch", modified);

        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }

    info!("Total marked as read: {} messages", total);
    Ok(total)
}

/// Move everything out of the inbox under a timestamped archive label
///
/// Each run gets its own `archive_<timestamp>` label so separate runs stay
/// distinguishable in the label list.
pub async fn archive_all_mail(client: &dyn GmailClient) -> Result<ArchiveOutcome> {
    let label_name = format!("archive_{}", Utc::now().format("%Y%m%d_%H%M%S"));
    let label_id = get_or_create_label(client, &label_name).await?;

    let mut total = 0;
    let mut page_token: Option<String> = None;

    loop {
        let page = client.list_page("in:inbox", page_token.as_deref()).await?;

        if page.messages.is_empty() {
            break;
        }

        let ids: Vec<String> = page.messages.iter().map(|m| m.id.clone()).collect();
        let modified = client
            .batch_modify(
                &ids,
                &[label_id.clone()],
                &[INBOX_LABEL.to_string()],
            )
            .await?;
        total += modified;
        debug!(
            "Archived {} messages under '{}' in this batch",
            modified, label_name
        );

        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }

    info!("Total archived: {} messages", total);
    Ok(ArchiveOutcome {
        archived: total,
        label_name,
    })
}

/// Find a label by name, creating it when absent; returns its ID
pub async fn get_or_create_label(client: &dyn GmailClient, label_name: &str) -> Result<String> {
    let labels = client.list_labels().await?;

    if let Some(existing) = labels.into_iter().find(|l| l.name == label_name) {
        return Ok(existing.id);
    }

    client.create_label(label_name).await
}
