//! Command line options for the fork-mover tool
use crate::{
    config::{ConfigData, ForkMoverConfig},
    errors::ForkMoverError,
    git::GitBackend,
    github::platform::GithubPlatform,
    migrate::{migrate, MigrateOptions, MigrationReport},
    scanner::RepoScanner,
    utils::StdinConfirm,
};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// fork-mover - Re-create the GitHub forks you don't have locally under another account
#[derive(Parser, Default, Clone, Debug)]
#[command(after_help = "Environment Variables:
  GITHUB_SOURCE_TOKEN: GitHub token for source account
  GITHUB_TARGET_TOKEN: GitHub token for target account")]
pub struct ForkMoverCli {
    /// Path to scan for local GitHub repositories
    #[arg(long)]
    pub local_path: PathBuf,

    /// Source GitHub username
    #[arg(long)]
    pub source_user: String,

    /// Target GitHub username
    #[arg(long)]
    pub target_user: String,

    /// Show what would be migrated without actually doing it
    #[arg(long)]
    pub dry_run: bool,

    /// GitHub token for source account (or set GITHUB_SOURCE_TOKEN env var)
    #[arg(long)]
    pub source_token: Option<String>,

    /// GitHub token for target account (or set GITHUB_TARGET_TOKEN env var)
    #[arg(long)]
    pub target_token: Option<String>,

    /// Remote of the local repositories to read (default: origin)
    #[arg(long)]
    pub remote: Option<String>,

    /// How to read the remote URL of local repositories (default: command)
    #[arg(long, value_enum)]
    pub git_backend: Option<GitBackend>,

    /// Compare owner and repository names without case
    #[arg(long)]
    pub ignore_case: bool,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose mode (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ForkMoverCli {
    /// Log level matching the verbosity
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Scan, then migrate, with an already resolved configuration
/// # Errors
/// Error if the forks of the source account can't be listed
pub async fn run(config: &ForkMoverConfig) -> Result<MigrationReport, ForkMoverError> {
    let reader = config.git_backend.reader();
    let scanner = RepoScanner::new(reader.as_ref(), config.remote_name.as_str());
    let local_repos = scanner.scan(&config.local_path).await;

    let source = GithubPlatform::new(
        config.source.username.clone(),
        config.source.token.clone(),
    );
    let target = GithubPlatform::new(
        config.target.username.clone(),
        config.target.token.clone(),
    );
    let options = MigrateOptions {
        source_user: config.source.username.clone(),
        dry_run: config.dry_run,
        identity_match: config.identity_match,
    };
    migrate(&local_repos, &source, &target, &options, &mut StdinConfirm).await
}

/// Run the fork-mover tool with the command line options
/// # Errors
/// Error if the configuration is invalid or the forks can't be listed
pub async fn fork_mover_main() -> Result<(), ForkMoverError> {
    let args = ForkMoverCli::parse();
    let _ = env_logger::builder()
        .filter_level(args.log_level())
        .format_target(false)
        .format_timestamp(None)
        .try_init();
    dotenv::dotenv().ok();
    let config_data = ConfigData::load(args.config.as_deref())?;
    let config = ForkMoverConfig::try_new(args, config_data)?;
    if config.dry_run {
        log::warn!("Dry run: no fork will be created");
    }
    run(&config).await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        ForkMoverCli::command().debug_assert();
    }

    #[test]
    fn parse_required_and_optional_flags() {
        let args = ForkMoverCli::try_parse_from([
            "fork-mover",
            "--local-path",
            "/src",
            "--source-user",
            "alice",
            "--target-user",
            "bob",
            "--dry-run",
            "--git-backend",
            "libgit2",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.local_path, PathBuf::from("/src"));
        assert_eq!(args.source_user, "alice");
        assert_eq!(args.target_user, "bob");
        assert!(args.dry_run);
        assert!(args.source_token.is_none());
        assert_eq!(args.git_backend, Some(GitBackend::Libgit2));
        assert_eq!(args.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn missing_required_flag_is_rejected() {
        let result = ForkMoverCli::try_parse_from(["fork-mover", "--source-user", "alice"]);
        assert!(result.is_err());
    }
}
