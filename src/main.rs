//! mailsweep - entry point for running one batch unsubscription pass.
//!
//! Usage: `mailsweep <user-email> [search-query]`
//!
//! Gmail OAuth credentials for the user must already be present in the
//! system keychain (service `mailsweep`, entry `gmail-<user-email>`).

use anyhow::Context;

use mailsweep::config;
use mailsweep::domain::{StatsSnapshot, UserId};
use mailsweep::providers::GmailMailbox;
use mailsweep::services::HttpUnsubscriber;
use mailsweep::storage::{SqliteStore, StatsStore};
use mailsweep::{BatchConfig, BatchRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let user = match args.next() {
        Some(email) => UserId::from(email),
        None => {
            eprintln!("usage: mailsweep <user-email> [search-query]");
            std::process::exit(2);
        }
    };

    let settings = config::load();
    let query = args.next().unwrap_or_else(|| settings.search.query.clone());

    tracing::info!(user = %user, "starting mailsweep");

    let store = SqliteStore::open(settings.storage.resolved_database_path())
        .await
        .context("open database")?;
    store.ensure_user(&user).await.context("initialize user")?;

    let mailbox = GmailMailbox::new(user.clone());
    let unsubscriber = HttpUnsubscriber::new(settings.batch.request_timeout())
        .context("build HTTP client")?;

    let mut runner = BatchRunner::new(mailbox, unsubscriber, store.clone(), store.clone())
        .with_config(BatchConfig {
            message_delay: settings.batch.message_delay(),
            processed_label: settings.batch.processed_label.clone(),
        });

    let summary = runner
        .run(&user, &query, settings.search.max_results)
        .await
        .context("batch run failed")?;

    tracing::info!(
        scanned = summary.scanned,
        unsubscribed = summary.unsubscribed,
        failed = summary.failed,
        "run finished"
    );

    let stats = store.load(&user).await.context("load final stats")?;
    let snapshot = StatsSnapshot::from(&stats);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
