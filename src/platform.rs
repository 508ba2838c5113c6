//! Hosting platform abstraction
use std::{fmt, future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::{errors::ForkMoverError, identity::RepoIdentity};

/// Boxed future returned by the collaborator traits ([`ForkHost`], `RemoteUrlReader`)
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ForkMoverError>> + Send + 'a>>;

/// A fork owned by an account on the hosting platform
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteFork {
    /// Identity of the fork itself (`account/name`)
    pub identity: RepoIdentity,

    /// Whether the platform flags the repository as a fork
    pub is_fork: bool,

    /// Repository the fork was created from, when the platform exposes it
    pub parent: Option<RepoIdentity>,

    /// Web URL of the fork
    pub url: String,
}

/// An authenticated account on a hosting platform able to list and create forks
pub trait ForkHost: Sync + Send {
    /// List the forks owned by `owner`, in the platform's listing order.
    ///
    /// An empty list means the account has no fork; a failed call is an error.
    fn list_forks(&self, owner: &str) -> HostFuture<'_, Vec<RemoteFork>>;

    /// Fork `parent` into the authenticated account, naming the new fork `fork_name`
    fn create_fork(&self, parent: &RepoIdentity, fork_name: &str) -> HostFuture<'_, ()>;

    /// Username of the authenticated account
    fn get_username(&self) -> &str;

    /// Type of the platform
    fn get_type(&self) -> PlatformType;
}

/// Supported hosting platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PlatformType {
    /// github.com
    Github,
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformType::Github => write!(f, "github"),
        }
    }
}
