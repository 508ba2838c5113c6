//! # fork-mover
//!
//! Re-create under another GitHub account the forks you don't have cloned locally
//!
//! ## Usage
//!
//! ```txt
//! Usage: fork-mover [OPTIONS] --local-path <LOCAL_PATH> --source-user <SOURCE_USER> --target-user <TARGET_USER>
//!
//! Options:
//!      --local-path <LOCAL_PATH>      Path to scan for local GitHub repositories
//!      --source-user <SOURCE_USER>    Source GitHub username
//!      --target-user <TARGET_USER>    Target GitHub username
//!      --dry-run                      Show what would be migrated without actually doing it
//!      --source-token <SOURCE_TOKEN>  GitHub token for source account (or set GITHUB_SOURCE_TOKEN env var)
//!      --target-token <TARGET_TOKEN>  GitHub token for target account (or set GITHUB_TARGET_TOKEN env var)
//!      --remote <REMOTE>              Remote of the local repositories to read (default: origin)
//!      --git-backend <GIT_BACKEND>    How to read the remote URL of local repositories (default: command) [possible values: command, libgit2]
//!      --ignore-case                  Compare owner and repository names without case
//!  -c, --config <CONFIG>              Custom configuration file path
//!  -v, --verbose...                   Verbose mode (-v, -vv)
//!  -h, --help                         Print help
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod git;
pub(crate) mod identity;
pub(crate) mod migrate;
pub(crate) mod platform;
pub(crate) mod scanner;
pub(crate) mod utils;

mod github;

pub use cli::{fork_mover_main, run, ForkMoverCli};
pub use config::{
    resolve_credential, AccountConfig, AccountFileConfig, ConfigData, ForkMoverConfig,
    SOURCE_TOKEN_ENV, TARGET_TOKEN_ENV,
};
pub use errors::{ForkMoverError, ForkMoverErrorKind};
pub use git::{GitBackend, GitCommand, Libgit2, RemoteUrlReader};
pub use github::platform::GithubPlatform;
pub use identity::{parse_repository_url, IdentityMatch, RepoIdentity};
pub use migrate::{
    compute_migration_set, fork_repository, migrate, MigrateOptions, MigrationOutcome,
    MigrationReport, MigrationSet, MigrationStatus,
};
pub use platform::{ForkHost, HostFuture, PlatformType, RemoteFork};
pub use scanner::{is_repository_root, LocalRepositories, LocalRepository, RepoScanner};
pub use utils::{Confirm, StdinConfirm};
