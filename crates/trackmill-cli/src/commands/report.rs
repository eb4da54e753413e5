//! The `report` subcommand

use anyhow::Result;
use clap::{ArgAction, Args};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use trackmill_core::activity::{ActivityConfig, ActivityReport};
use trackmill_core::repository::DEFAULT_QUERY_LIMIT;
use trackmill_youtrack::YouTrackClient;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Issue filter query sent to the tracker
    #[arg(long, env = "TRACKMILL_FILTER")]
    pub filter: String,

    /// Limit results to the given number
    #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
    pub limit: usize,

    /// Limit emitted rows per assignee
    #[arg(long, env = "TRACKMILL_ASSIGNEE_LIMIT")]
    pub limit_per_assignee: Option<u32>,

    /// Write the report to this file instead of printing JSON
    #[arg(long, env = "TRACKMILL_OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Overwrite the output file before writing
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub overwrite_file: bool,
}

pub async fn run(client: &YouTrackClient, args: ReportArgs) -> Result<()> {
    println!(
        "Getting data from the issue tracker using `{}` ...",
        args.filter
    );

    let mut config = ActivityConfig::new(args.filter, client.base_url());
    config.limit = args.limit;
    config.limit_per_assignee = args.limit_per_assignee;
    config.output_file = args.output_file;
    config.overwrite_file = args.overwrite_file;

    let mut report = ActivityReport::new(config);

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template(
            " {pos}/{len} [{bar:40}] {percent:>3}% {elapsed_precise} {msg}",
        )?
        .progress_chars("=> "),
    );

    let summary = report
        .run(client, |index, total, issue| {
            if progress.length() == Some(0) {
                progress.set_length(total as u64);
            }
            progress.set_position(index as u64);
            progress.set_message(format!("Reading {}", issue.id));
        })
        .await?;

    progress.finish_with_message(format!(
        "Processed {} ticket(s), emitted {} row(s)",
        summary.total, summary.emitted
    ));

    if let Some(json) = report.to_json()? {
        println!("{json}");
    }

    Ok(())
}
