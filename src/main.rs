use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use release_check::config::CheckerConfig;
use release_check::{
    GitHubReleaseSource, ReleaseSummary, Repository, SemanticVersion, TagFilter, UpdateChecker,
    UpdateStatus, logging,
};

#[derive(Parser)]
#[command(name = "release-check")]
#[command(version, about = "Check a GitHub repository for newer releases")]
struct Cli {
    /// Repository in owner/name form
    repository: Repository,

    /// Version currently running
    #[arg(long, short)]
    current: SemanticVersion,

    /// Rank releases whose tag is not a semantic version instead of skipping them
    #[arg(long)]
    all_tags: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    }
    .with_env_token();

    let _guard = logging::init(&config.logging)?;

    let filter = if cli.all_tags {
        TagFilter::All
    } else {
        config.selection.tag_filter()
    };

    let source = Arc::new(GitHubReleaseSource::from_config(&config.github)?);
    let checker = UpdateChecker::for_repository(cli.current, cli.repository, source);
    checker.fetch_releases().await?;

    let status = checker.status_with(filter);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", render(&status));
    }

    Ok(())
}

fn render(status: &UpdateStatus) -> String {
    let mut out = format!(
        "{}: running {} ({} releases)\n",
        status.repository, status.current_version, status.release_count
    );

    out.push_str(&render_line("latest release", status.latest_release.as_ref()));
    out.push_str(&render_line(
        "latest prerelease",
        status.latest_prerelease.as_ref(),
    ));

    let verdict = match (status.has_newer_release, status.has_newer_prerelease) {
        (true, true) => "newer release and prerelease available",
        (true, false) => "newer release available",
        (false, true) => "newer prerelease available",
        (false, false) => "up to date",
    };
    out.push_str(verdict);
    out.push('\n');
    out
}

fn render_line(label: &str, release: Option<&ReleaseSummary>) -> String {
    match release {
        Some(release) => {
            let tag = release.tag.as_deref().unwrap_or("-");
            match &release.url {
                Some(url) => format!("  {}: {} ({})\n", label, tag, url),
                None => format!("  {}: {}\n", label, tag),
            }
        }
        None => format!("  {}: none\n", label),
    }
}
