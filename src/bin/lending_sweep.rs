//! Sends due-tomorrow reminders and overdue alerts. Meant to be run from cron.

use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, ValueEnum};

use bookswap::{
    config::Config,
    db,
    notify::{LogMailer, NotificationDispatcher},
    services::reminders,
    telemetry,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Sweep {
    /// Remind borrowers whose book is due within a day.
    Due,
    /// Alert borrowers and owners about books past due.
    Overdue,
    /// Both of the above.
    All,
}

#[derive(Debug, Parser)]
#[command(name = "lending-sweep", about = "Send lending reminders and overdue alerts")]
struct Cli {
    #[arg(value_enum, default_value_t = Sweep::All)]
    sweep: Sweep,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let _guard = telemetry::init(&config.rust_log, "sweep.log");

    let pool = db::connect(&config.database_url).await?;

    let mailer = Arc::new(LogMailer::new(config.mail_sender.clone()));
    let (notifier, worker) = NotificationDispatcher::spawn(mailer);

    let (due, overdue) = match cli.sweep {
        Sweep::Due => (true, false),
        Sweep::Overdue => (false, true),
        Sweep::All => (true, true),
    };
    let report = reminders::sweep(&pool, &notifier, Utc::now(), due, overdue).await?;

    // Closing the last handle lets the worker drain and stop.
    drop(notifier);
    worker.await?;

    tracing::info!(
        due_soon = report.due_soon,
        overdue = report.overdue,
        "Sweep finished"
    );
    Ok(())
}
