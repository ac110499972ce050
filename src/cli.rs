//! Command-line interface

use clap::{ArgGroup, Parser};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{FailureKind, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "gmail-sweep")]
#[command(version)]
#[command(about = "Search a Gmail mailbox and optionally delete what matches", long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["search", "mark_read", "archive_all_mail"])
))]
pub struct Cli {
    /// Gmail search query (Gmail search syntax, e.g. "from:foo older_than:1y")
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Permanently delete every matched message
    #[arg(long, requires = "search")]
    pub delete: bool,

    /// Print sender and subject for each matched message
    #[arg(long, requires = "search")]
    pub show: bool,

    /// Mark every unread message as read
    #[arg(long)]
    pub mark_read: bool,

    /// Move all inbox mail under a timestamped archive label
    #[arg(long)]
    pub archive_all_mail: bool,

    /// Skip the confirmation prompt before deleting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Emit the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 client-secret file (overrides config)
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Path to token cache file (overrides config)
    #[arg(long)]
    pub token_cache: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Ask the user to confirm a destructive sweep
///
/// Escape or a read error counts as a decline.
pub fn confirm_delete(query: &str) -> bool {
    inquire::Confirm::new(&format!(
        "Permanently delete ALL messages matching '{}'?",
        query
    ))
    .with_default(false)
    .with_help_message("There is no undo; deleted messages skip the trash")
    .prompt()
    .unwrap_or(false)
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        Self {
            multi: MultiProgress::new(),
            spinner_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Finish a spinner and clear it from the display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        println!("  ✓ {}", msg);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the human-readable run summary block
pub fn print_run_summary(
    query: &str,
    run_id: &str,
    summary: &RunSummary,
    delete_requested: bool,
    elapsed_secs: f64,
) {
    if !summary.matches.is_empty() {
        println!("\nMessages:");
        for details in &summary.matches {
            println!("  {}", details);
        }
    }

    println!("\n========================================");
    println!("Sweep Summary");
    println!("========================================");
    println!("Run ID: {}", run_id);
    println!("Query: {}", query);
    println!(
        "Mode: {}",
        if delete_requested { "delete" } else { "dry run (listing only)" }
    );
    println!("Messages matched: {}", summary.matched_count);
    println!("Messages deleted: {}", summary.deleted_count);
    if summary.is_clean() {
        println!("Errors: 0");
    } else {
        println!("Errors: {}", summary.errors.len());
        for failure in &summary.errors {
            match &failure.kind {
                FailureKind::DeleteFailed(reason) => {
                    println!("  - {}: delete failed: {}", failure.message_id, reason)
                }
                FailureKind::FetchFailed(reason) => {
                    println!("  - {}: fetch failed: {}", failure.message_id, reason)
                }
            }
        }
    }
    println!("Completed in {:.2} seconds", elapsed_secs);
    println!("========================================");
}
