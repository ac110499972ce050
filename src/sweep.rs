//! Search-and-act pipeline: query -> paginated listing -> per-message action -> summary

use async_stream::stream;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::GmailClient;
use crate::error::{Result, SweepError};
use crate::models::{FailureKind, MessagePage, RunSummary};

/// What to do with each matched message
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Delete every matched message; off means a dry-run listing
    pub delete: bool,
    /// Fetch From/Subject per match and record it in the summary
    pub describe: bool,
}

/// A run that stopped before reaching the end of the result set
///
/// `partial` carries the summary accumulated up to the failing page so the
/// caller can still report it; it is `None` when the very first list call
/// failed and nothing was processed.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct SweepAborted {
    pub partial: Option<RunSummary>,
    #[source]
    pub source: SweepError,
}

impl SweepAborted {
    fn before_start(source: SweepError) -> Self {
        Self {
            partial: None,
            source,
        }
    }
}

/// Lazily yield result pages for a query
///
/// Advances only via the continuation token returned by the previous page
/// and ends after the first page without one. A listing error is yielded
/// once and terminates the stream.
pub fn page_stream<'a>(
    client: &'a dyn GmailClient,
    query: &'a str,
) -> Pin<Box<dyn Stream<Item = Result<MessagePage>> + Send + 'a>> {
    Box::pin(stream! {
        let mut page_token: Option<String> = None;

        loop {
            match client.list_page(query, page_token.as_deref()).await {
                Ok(page) => {
                    page_token = page.next_page_token.clone();
                    let last = page_token.is_none();
                    yield Ok(page);
                    if last {
                        break;
                    }
                }
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}

/// Drives one search-and-act run over a mailbox
pub struct SweepPipeline {
    client: Box<dyn GmailClient>,
    options: SweepOptions,
}

impl SweepPipeline {
    pub fn new(client: Box<dyn GmailClient>, options: SweepOptions) -> Self {
        Self { client, options }
    }

    /// Enumerate all messages matching `query` and apply the configured
    /// action to each, producing a run summary
    ///
    /// Per-message failures are recorded and never abort the run. A failed
    /// list call is fatal: on the first page nothing was processed, on a
    /// continuation page the summary so far travels with the error.
    pub async fn run(&self, query: &str) -> std::result::Result<RunSummary, SweepAborted> {
        if query.trim().is_empty() {
            return Err(SweepAborted::before_start(SweepError::BadRequest(
                "search query must not be empty".to_string(),
            )));
        }

        let mut summary = RunSummary::default();
        let mut first_page = true;

        let mut pages = page_stream(self.client.as_ref(), query);
        while let Some(next) = pages.next().await {
            let page = match next {
                Ok(page) => page,
                Err(source) => {
                    let partial = if first_page { None } else { Some(summary) };
                    return Err(SweepAborted { partial, source });
                }
            };
            first_page = false;

            debug!("Processing page of {} messages", page.messages.len());

            for msg in &page.messages {
                summary.matched_count += 1;

                if self.options.describe {
                    match self.client.get_summary(&msg.id).await {
                        Ok(details) => summary.matches.push(details),
                        Err(e) => {
                            warn!("Failed to fetch message {}: {}", msg.id, e);
                            summary
                                .record_failure(&msg.id, FailureKind::FetchFailed(e.to_string()));
                        }
                    }
                }

                if self.options.delete {
                    match self.client.delete_message(&msg.id).await {
                        Ok(()) => summary.deleted_count += 1,
                        Err(e) => {
                            warn!("Failed to delete message {}: {}", msg.id, e);
                            summary
                                .record_failure(&msg.id, FailureKind::DeleteFailed(e.to_string()));
                        }
                    }
                }
            }
        }

        info!(
            "Sweep complete: {} matched, {} deleted, {} errors",
            summary.matched_count,
            summary.deleted_count,
            summary.errors.len()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LabelInfo;
    use crate::models::MessageSummary;
    use async_trait::async_trait;

    /// Fails the test if the pipeline touches the network at all
    struct UnreachableClient;

    #[async_trait]
    impl GmailClient for UnreachableClient {
        async fn list_page(&self, _: &str, _: Option<&str>) -> Result<MessagePage> {
            panic!("list_page must not be called");
        }

        async fn get_summary(&self, _: &str) -> Result<MessageSummary> {
            panic!("get_summary must not be called");
        }

        async fn delete_message(&self, _: &str) -> Result<()> {
            panic!("delete_message must not be called");
        }

        async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
            panic!("list_labels must not be called");
        }

        async fn create_label(&self, _: &str) -> Result<String> {
            panic!("create_label must not be called");
        }

        async fn batch_modify(&self, _: &[String], _: &[String], _: &[String]) -> Result<usize> {
            panic!("batch_modify must not be called");
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_fatal_before_any_call() {
        let pipeline = SweepPipeline::new(Box::new(UnreachableClient), SweepOptions::default());

        let err = pipeline.run("   ").await.unwrap_err();
        assert!(err.partial.is_none());
        assert!(matches!(err.source, SweepError::BadRequest(_)));
    }
}
