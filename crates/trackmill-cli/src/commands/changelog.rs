//! The changelog-related subcommands

use anyhow::Result;
use clap::Args;
use trackmill_core::changelog::ChangelogCollector;
use trackmill_youtrack::YouTrackClient;

#[derive(Args, Debug)]
pub struct ChangelogArgs {
    /// Project short name
    #[arg(long, env = "TRACKMILL_PROJECT")]
    pub project: String,

    /// Collect for this release only; otherwise everything scheduled into
    /// a real release
    #[arg(long)]
    pub fix_version: Option<String>,
}

pub async fn run(client: &YouTrackClient, args: ChangelogArgs) -> Result<()> {
    let mut collector = ChangelogCollector::new(client);
    let entries = collector
        .collect(&args.project, args.fix_version.as_deref())
        .await?;

    if entries.is_empty() {
        println!("No changelog entries found.");
        return Ok(());
    }

    for (id, entry) in &entries {
        match &entry.entry_type {
            Some(entry_type) => println!("{id} [{entry_type}] {}", entry.message),
            None => println!("{id} {}", entry.message),
        }
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Project short name
    #[arg(long, env = "TRACKMILL_PROJECT")]
    pub project: String,
}

pub async fn versions(client: &YouTrackClient, args: VersionsArgs) -> Result<()> {
    let mut collector = ChangelogCollector::new(client);
    let versions = collector.project_fix_versions(&args.project).await?;

    if versions.is_empty() {
        println!("No release versions found for {}.", args.project);
        return Ok(());
    }

    for version in versions {
        println!("{version}");
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct UpdateEntryArgs {
    /// Issue id, e.g. WPML-123
    #[arg(long)]
    pub issue: String,

    /// Changelog message to store on the issue
    #[arg(long)]
    pub message: String,
}

pub async fn update_entry(client: &YouTrackClient, args: UpdateEntryArgs) -> Result<()> {
    let collector = ChangelogCollector::new(client);

    if collector.update_changelog(&args.issue, &args.message).await {
        println!("Updated the changelog entry on {}.", args.issue);
        Ok(())
    } else {
        anyhow::bail!("failed to update the changelog entry on {}", args.issue)
    }
}
