//! Repository identity and remote URL parsing
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{errors::ForkMoverError, github::GITHUB_URL};

/// Identity of a repository on the hosting platform: its owner and its name.
///
/// Equality, ordering and hashing compare both fields as exact strings,
/// `Acme/Widget` and `acme/widget` are two different identities.
/// Use [`RepoIdentity::matches`] with [`IdentityMatch::IgnoreCase`] to compare
/// them the way the hosting platform does.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoIdentity {
    /// Owner of the repository (user or organization)
    pub owner: String,

    /// Name of the repository
    pub name: String,
}

/// How two identities are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMatch {
    /// Exact, case-sensitive comparison
    #[default]
    Exact,

    /// ASCII case-insensitive comparison
    IgnoreCase,
}

impl RepoIdentity {
    /// Create a new identity
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Canonical key `owner/name`
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Compare two identities with the given strategy
    pub fn matches(&self, other: &RepoIdentity, strategy: IdentityMatch) -> bool {
        match strategy {
            IdentityMatch::Exact => self == other,
            IdentityMatch::IgnoreCase => {
                self.owner.eq_ignore_ascii_case(&other.owner)
                    && self.name.eq_ignore_ascii_case(&other.name)
            }
        }
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoIdentity {
    type Err = ForkMoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_owner_name(s)
            .ok_or_else(|| format!("Invalid repository '{s}', expected owner/name").into())
    }
}

/// Split `owner/name[.git]` into an identity
fn split_owner_name(path: &str) -> Option<RepoIdentity> {
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(RepoIdentity::new(owner, name))
}

/// Parse a GitHub remote URL into a repository identity
///
/// Supported forms:
/// - `git@github.com:owner/name.git`
/// - `https://github.com/owner/name.git`
/// - `ssh://git@github.com/owner/name.git`
///
/// The `.git` suffix is optional. Any other URL (other hosts, local paths, ...) gives `None`.
pub fn parse_repository_url(url: &str) -> Option<RepoIdentity> {
    parse_repository_url_for_host(url, GITHUB_URL)
}

/// Parse a remote URL pointing to `host` into a repository identity
pub(crate) fn parse_repository_url_for_host(url: &str, host: &str) -> Option<RepoIdentity> {
    let url = url.trim();
    if let Some(path) = url
        .strip_prefix("git@")
        .and_then(|rest| rest.strip_prefix(host))
        .and_then(|rest| rest.strip_prefix(':'))
    {
        return split_owner_name(path);
    }
    let parsed = Url::parse(url).ok()?;
    let scheme_ok = match parsed.scheme() {
        "https" => true,
        "ssh" => parsed.username() == "git",
        _ => false,
    };
    if !scheme_ok || parsed.host_str() != Some(host) || parsed.port().is_some() {
        return None;
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return None;
    }
    split_owner_name(parsed.path().strip_prefix('/')?)
}
