mod environment;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use bump_operations::operations::{BumpInput, BumpOperation};
use bump_operations::providers::{Git2Provider, KeepAChangelogFormatter};
use bump_version::BumpSpec;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{CliError, Result};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "release-bump")]
#[command(version)]
#[command(about = "Bump package versions for a release", long_about = None)]
struct Cli {
    /// Workspace root (default: current directory)
    #[arg(long = "path", short = 'C')]
    path: Option<PathBuf>,

    /// Release type: major, minor, patch, premajor, preminor, prepatch or prerelease
    #[arg(long, env = "RELEASE_TYPE")]
    release_type: Option<String>,

    /// Exact version to release; conflicts with a release type
    #[arg(long, env = "RELEASE_VERSION")]
    release_version: Option<String>,

    /// Identifier for pre-release bumps, e.g. `rc`
    #[arg(long, env = "PRERELEASE_ID")]
    prerelease_id: Option<String>,

    /// Repository web URL used for changelog comparison links
    #[arg(long, env = "REPOSITORY_URL")]
    repository_url: Option<String>,

    /// Update changelogs alongside manifests
    #[arg(long, env = "UPDATE_CHANGELOG")]
    update_changelog: bool,

    /// Promote the unreleased changelog section to the new version
    #[arg(long, env = "RELEASE_CANDIDATE", default_value_t = true, action = ArgAction::Set)]
    release_candidate: bool,

    /// Packages directory relative to the workspace root
    #[arg(long)]
    packages_dir: Option<PathBuf>,

    /// Fail when the repository has no release tags
    #[arg(long)]
    require_tags: bool,

    /// Compute every change but write nothing
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = resolve_root(cli.path)?;
    let bump = BumpSpec::from_inputs(cli.release_type.as_deref(), cli.release_version.as_deref())?;
    let repository_url = cli
        .repository_url
        .filter(|url| !url.trim().is_empty())
        .or_else(environment::github_repository_url);

    tracing::debug!(root = %root.display(), ?bump, "starting release bump");

    let input = BumpInput {
        root,
        bump,
        prerelease_id: cli.prerelease_id.filter(|id| !id.trim().is_empty()),
        packages_dir: cli.packages_dir,
        update_changelog: cli.update_changelog,
        release_candidate: cli.release_candidate,
        repository_url,
        require_tags: cli.require_tags,
        dry_run: cli.dry_run,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let operation = BumpOperation::new(Git2Provider::new(), KeepAChangelogFormatter::new());
    let outcome = runtime.block_on(operation.execute(input))?;

    output::report(&outcome, cli.output)
}

fn resolve_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
