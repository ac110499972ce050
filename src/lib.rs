//! Gmail Sweep
//!
//! A command-line utility that authenticates against the Gmail API via
//! OAuth2, searches a mailbox using Gmail's query syntax, and optionally
//! deletes the matching messages.
//!
//! # Overview
//!
//! - **Authentication**: OAuth2 installed-application flow with token caching
//! - **Search-and-act pipeline**: lazy paginated listing with a per-message
//!   delete action and a run summary
//! - **Maintenance**: bulk mark-as-read and inbox archiving
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_sweep::auth;
//! use gmail_sweep::client::ProductionGmailClient;
//! use gmail_sweep::sweep::{SweepOptions, SweepPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hub = auth::initialize_gmail_hub(
//!         "volume/credentials.json".as_ref(),
//!         "token.json".as_ref(),
//!     )
//!     .await?;
//!
//!     let client = ProductionGmailClient::new(hub, 500);
//!     let pipeline = SweepPipeline::new(Box::new(client), SweepOptions::default());
//!
//!     let summary = pipeline.run("from:newsletter@example.com").await?;
//!     println!("{} messages matched", summary.matched_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail hub initialization
//! - [`cli`] - Command-line surface and summary rendering
//! - [`client`] - Gmail API client trait and production implementation
//! - [`config`] - Configuration file handling
//! - [`error`] - Error types and result alias
//! - [`maintenance`] - Bulk mark-as-read and archive operations
//! - [`models`] - Core data structures
//! - [`sweep`] - The search-and-act pipeline

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod models;
pub mod sweep;

// Re-export commonly used types for convenience
pub use error::{Result, SweepError};

pub use models::{FailureKind, MessagePage, MessageRef, MessageSummary, RunSummary, SweepFailure};

pub use client::{GmailClient, LabelInfo, ProductionGmailClient};

pub use sweep::{page_stream, SweepAborted, SweepOptions, SweepPipeline};

pub use maintenance::ArchiveOutcome;

pub use config::{AuthConfig, Config, SweepConfig};

pub use cli::{Cli, ProgressReporter};
