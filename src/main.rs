use anyhow::Result;
use clap::Parser;
use gmail_sweep::cli::{self, Cli};
use gmail_sweep::client::ProductionGmailClient;
use gmail_sweep::config::Config;
use gmail_sweep::error::SweepError;
use gmail_sweep::sweep::{SweepAborted, SweepOptions, SweepPipeline};
use gmail_sweep::{auth, maintenance};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        display_error(&e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Install default crypto provider for rustls
    // On non-Windows platforms, use aws-lc-rs (better performance, FIPS support)
    // On Windows, use ring (better compatibility, no NASM/CMake required)
    #[cfg(not(windows))]
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    #[cfg(windows)]
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    // Initialize tracing with level based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_sweep=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("gmail_sweep=info,warn,error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let started = Instant::now();
    let run_id = uuid::Uuid::new_v4();

    let mut config = Config::load(&cli.config).await?;
    if let Some(path) = &cli.credentials {
        config.auth.credentials = path.clone();
    }
    if let Some(path) = &cli.token_cache {
        config.auth.token_cache = path.clone();
    }

    // Destructive runs are confirmed before doing any work at all
    if cli.delete && !cli.yes {
        let query = cli.search.as_deref().unwrap_or_default();
        if !cli::confirm_delete(query) {
            println!("Aborted.");
            return Ok(());
        }
    }

    let reporter = cli::ProgressReporter::new();

    let auth_spinner = reporter.add_spinner("Authenticating with Gmail API...");
    let hub =
        auth::initialize_gmail_hub(&config.auth.credentials, &config.auth.token_cache).await?;
    reporter.finish_spinner(&auth_spinner, "Gmail API authenticated");

    let client = ProductionGmailClient::new(hub, config.sweep.page_size);

    if cli.mark_read {
        let spinner = reporter.add_spinner("Marking unread messages as read...");
        let total = maintenance::mark_all_read(&client).await?;
        reporter.finish_spinner(&spinner, &format!("Marked {} messages as read", total));
        println!("Completed in {:.2} seconds", started.elapsed().as_secs_f64());
        return Ok(());
    }

    if cli.archive_all_mail {
        let spinner = reporter.add_spinner("Archiving inbox...");
        let outcome = maintenance::archive_all_mail(&client).await?;
        reporter.finish_spinner(
            &spinner,
            &format!(
                "Archived {} messages under '{}'",
                outcome.archived, outcome.label_name
            ),
        );
        println!("Completed in {:.2} seconds", started.elapsed().as_secs_f64());
        return Ok(());
    }

    let query = match cli.search.as_deref() {
        Some(q) => q,
        None => {
            return Err(SweepError::ConfigError("--search is required".to_string()).into());
        }
    };

    tracing::info!("Starting sweep {} for query '{}'", run_id, query);

    let options = SweepOptions {
        delete: cli.delete,
        describe: cli.show,
    };
    let pipeline = SweepPipeline::new(Box::new(client), options);

    let spinner = reporter.add_spinner(if cli.delete {
        "Sweeping matching messages..."
    } else {
        "Searching..."
    });

    match pipeline.run(query).await {
        Ok(summary) => {
            reporter.finish_spinner(
                &spinner,
                &format!("{} messages matched", summary.matched_count),
            );

            if cli.json {
                println!("{}", summary.to_json()?);
            } else {
                cli::print_run_summary(
                    query,
                    &run_id.to_string(),
                    &summary,
                    cli.delete,
                    started.elapsed().as_secs_f64(),
                );
            }
            Ok(())
        }
        Err(aborted) => {
            spinner.finish_and_clear();

            // A continuation-page failure still owes the user what was done
            if let Some(partial) = &aborted.partial {
                eprintln!("Run aborted mid-pagination; results up to the failure follow.");
                if cli.json {
                    println!("{}", partial.to_json()?);
                } else {
                    cli::print_run_summary(
                        query,
                        &run_id.to_string(),
                        partial,
                        cli.delete,
                        started.elapsed().as_secs_f64(),
                    );
                }
            }
            Err(aborted.into())
        }
    }
}

/// Display error with context and a hint where one helps
fn display_error(error: &anyhow::Error) {
    eprintln!("Error: {}", error);

    let mut cause = error.source();
    while let Some(e) = cause {
        eprintln!("  Caused by: {}", e);
        cause = e.source();
    }

    let sweep_err = error
        .downcast_ref::<SweepError>()
        .or_else(|| error.downcast_ref::<SweepAborted>().map(|a| &a.source));

    if let Some(err) = sweep_err {
        match err {
            SweepError::AuthError(_) => {
                eprintln!("\nHint: Make sure your OAuth2 client-secret file is valid.");
                eprintln!("      You can download it from Google Cloud Console.");
                eprintln!("      Deleting the token cache forces a fresh consent flow.");
            }
            SweepError::BadRequest(_) => {
                eprintln!("\nHint: The search query may be malformed.");
                eprintln!("      See Gmail's search-operator documentation for the syntax.");
            }
            SweepError::RateLimitExceeded { retry_after } => {
                eprintln!("\nHint: You've hit Gmail API rate limits.");
                eprintln!("      Wait {} seconds and try again.", retry_after);
            }
            SweepError::ConfigError(_) => {
                eprintln!("\nHint: Check your configuration file for errors.");
            }
            _ => {}
        }
    }

    eprintln!("\nFor help, run: gmail-sweep --help");
}
