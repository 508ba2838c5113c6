//! Re-create the forks of the source account that are not cloned locally
use std::path::PathBuf;

use log::{error, info, warn};

use crate::{
    errors::ForkMoverError,
    identity::{IdentityMatch, RepoIdentity},
    platform::{ForkHost, RemoteFork},
    scanner::{LocalRepositories, LocalRepository},
    utils::Confirm,
};

/// Result of the migration of one fork
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The parent was forked into the target account (or would have been, in a dry run)
    Migrated {
        /// Repository forked
        parent: RepoIdentity,
    },

    /// A local clone exists, nothing done
    SkippedLocal {
        /// Where the clone lives
        path: PathBuf,
    },

    /// The fork has no known parent, nothing done
    SkippedNoParent,

    /// Forking the parent failed
    Failed {
        /// Repository that couldn't be forked
        parent: RepoIdentity,

        /// Error reported by the platform
        message: String,
    },
}

/// How the migration pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    /// The source account has no fork
    NoForks,

    /// Every fork is cloned locally
    NothingToMigrate,

    /// The user did not confirm
    Cancelled,

    /// Every candidate was processed
    Completed,
}

/// Summary of a migration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// How the pass ended
    pub status: MigrationStatus,

    /// Whether no fork was actually created
    pub dry_run: bool,

    /// Number of forks listed in the source account
    pub total_forks: usize,

    /// Outcome per fork of the source account: local forks first, then the candidates,
    /// each group in listing order
    pub outcomes: Vec<(RepoIdentity, MigrationOutcome)>,
}

impl MigrationReport {
    /// Create an empty report
    fn new(status: MigrationStatus, dry_run: bool, total_forks: usize) -> Self {
        Self {
            status,
            dry_run,
            total_forks,
            outcomes: Vec::new(),
        }
    }

    /// Count the outcomes matching `predicate`
    fn count(&self, predicate: impl Fn(&MigrationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }

    /// Number of forks migrated
    pub fn successful(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Migrated { .. }))
    }

    /// Number of forks that failed to migrate
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Failed { .. }))
    }

    /// Number of forks skipped because they are cloned locally
    pub fn skipped_local(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::SkippedLocal { .. }))
    }

    /// Number of forks skipped because their parent is unknown
    pub fn skipped_no_parent(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::SkippedNoParent))
    }

    /// Number of forks selected for migration
    pub fn to_migrate(&self) -> usize {
        self.total_forks - self.skipped_local()
    }
}

/// Forks of the source account split by local presence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSet<'a> {
    /// Forks without a local clone, in listing order
    pub to_migrate: Vec<&'a RemoteFork>,

    /// Forks with a local clone, with that clone
    pub skipped: Vec<(&'a RemoteFork, &'a LocalRepository)>,
}

/// Split `forks` between the ones to migrate and the ones cloned locally
pub fn compute_migration_set<'a>(
    forks: &'a [RemoteFork],
    local_repos: &'a LocalRepositories,
    strategy: IdentityMatch,
) -> MigrationSet<'a> {
    let mut set = MigrationSet {
        to_migrate: Vec::new(),
        skipped: Vec::new(),
    };
    for fork in forks {
        match local_repos.find(&fork.identity, strategy) {
            Some(local) => set.skipped.push((fork, local)),
            None => set.to_migrate.push(fork),
        }
    }
    set
}

/// Fork `parent` into the target account, keeping its name
///
/// Nothing is sent in a dry run.
/// # Errors
/// Error if the platform refuses to create the fork
pub async fn fork_repository(
    parent: &RepoIdentity,
    target: &dyn ForkHost,
    dry_run: bool,
) -> Result<(), ForkMoverError> {
    if dry_run {
        info!("[DRY RUN] Would fork: {parent}");
        return Ok(());
    }
    info!("Forking: {parent}...");
    match target.create_fork(parent, &parent.name).await {
        Ok(()) => {
            info!(
                "Successfully forked {} to {} on {}",
                parent,
                target.get_username(),
                target.get_type()
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to fork {parent}: {e}");
            Err(e)
        }
    }
}

/// Options of a migration pass
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Account whose forks are listed
    pub source_user: String,

    /// Don't create anything
    pub dry_run: bool,

    /// How fork identities are compared with local ones
    pub identity_match: IdentityMatch,
}

/// Re-create under `target` the forks of `options.source_user` that have no local clone
///
/// Candidates are processed one at a time, in listing order.
/// A failed fork is recorded and the pass goes on.
/// # Errors
/// Error if the forks can't be listed or the confirmation can't be read
pub async fn migrate(
    local_repos: &LocalRepositories,
    source: &dyn ForkHost,
    target: &dyn ForkHost,
    options: &MigrateOptions,
    confirm: &mut dyn Confirm,
) -> Result<MigrationReport, ForkMoverError> {
    info!(
        "Fetching forked repositories from {} on {}...",
        options.source_user,
        source.get_type()
    );
    let forks = source.list_forks(&options.source_user).await?;
    info!("Found {} forked repositories", forks.len());
    if forks.is_empty() {
        warn!("No forked repositories found");
        return Ok(MigrationReport::new(
            MigrationStatus::NoForks,
            options.dry_run,
            0,
        ));
    }

    let set = compute_migration_set(&forks, local_repos, options.identity_match);
    let mut report =
        MigrationReport::new(MigrationStatus::Completed, options.dry_run, forks.len());
    println!("Migration summary:");
    println!("  Total forked repositories: {}", forks.len());
    println!("  Repositories to migrate: {}", set.to_migrate.len());
    println!("  Repositories skipped (local): {}", set.skipped.len());
    if !set.skipped.is_empty() {
        println!("Skipping local repositories:");
        for (fork, local) in &set.skipped {
            println!("  - {} (at {})", fork.identity, local.path.display());
            report.outcomes.push((
                fork.identity.clone(),
                MigrationOutcome::SkippedLocal {
                    path: local.path.clone(),
                },
            ));
        }
    }

    if set.to_migrate.is_empty() {
        println!("No repositories to migrate!");
        report.status = MigrationStatus::NothingToMigrate;
        return Ok(report);
    }

    if !options.dry_run {
        let question = format!(
            "About to migrate {} repositories to {}. Continue?",
            set.to_migrate.len(),
            target.get_username()
        );
        if !confirm.confirm(&question)? {
            println!("Migration cancelled.");
            report.status = MigrationStatus::Cancelled;
            return Ok(report);
        }
    }

    info!("Starting migration...");
    for fork in set.to_migrate {
        let outcome = match &fork.parent {
            Some(parent) => match fork_repository(parent, target, options.dry_run).await {
                Ok(()) => MigrationOutcome::Migrated {
                    parent: parent.clone(),
                },
                Err(e) => MigrationOutcome::Failed {
                    parent: parent.clone(),
                    message: e.to_string(),
                },
            },
            None => {
                warn!("Skipping {}: No parent found", fork.identity);
                MigrationOutcome::SkippedNoParent
            }
        };
        report.outcomes.push((fork.identity.clone(), outcome));
    }

    println!("Migration complete!");
    println!("  Successful: {}", report.successful());
    if report.failed() > 0 {
        println!("  Failed: {}", report.failed());
    }
    if report.skipped_no_parent() > 0 {
        println!("  Skipped (no parent): {}", report.skipped_no_parent());
    }
    Ok(report)
}
