//! TrackMill CLI
//!
//! Receives data from the issue tracker and turns it into release
//! changelogs and activity reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use trackmill_youtrack::{Credentials, YouTrackClient};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "trackmill")]
#[command(about = "Changelog and activity reports from an issue tracker", long_about = None)]
struct Cli {
    /// Base URL of the YouTrack instance
    #[arg(long, env = "TRACKMILL_URL")]
    url: String,

    /// Permanent token for API requests
    #[arg(long, env = "TRACKMILL_TOKEN", hide_env_values = true)]
    token: String,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the per-issue activity report
    Report(commands::report::ReportArgs),
    /// Collect the changelog entries for a release
    Changelog(commands::changelog::ChangelogArgs),
    /// List a project's known release versions
    Versions(commands::changelog::VersionsArgs),
    /// Write a changelog entry back to an issue
    UpdateEntry(commands::changelog::UpdateEntryArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_ansi(false)
        .init();

    let client = YouTrackClient::new(&cli.url, Credentials::new(&cli.token));
    tracing::debug!(url = %cli.url, "tracker client ready");

    match cli.command {
        Command::Report(args) => commands::report::run(&client, args).await,
        Command::Changelog(args) => commands::changelog::run(&client, args).await,
        Command::Versions(args) => commands::changelog::versions(&client, args).await,
        Command::UpdateEntry(args) => commands::changelog::update_entry(&client, args).await,
    }
}
