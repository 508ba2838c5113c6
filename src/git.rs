//! Reading remote URLs of local repositories
use std::{path::Path, process::Stdio};

use clap::ValueEnum;
use serde::Deserialize;
use tokio::process::Command;

use crate::{
    errors::{ForkMoverError, ForkMoverErrorKind},
    platform::HostFuture,
};

/// Name of the git metadata directory
pub(crate) const GIT_DIR: &str = ".git";

/// Default remote name
pub(crate) const DEFAULT_REMOTE: &str = "origin";

/// Something able to read the URL configured for a remote of a local repository
pub trait RemoteUrlReader: Sync + Send {
    /// URL of the remote `remote_name` of the repository at `path`
    fn remote_url<'a>(&'a self, path: &'a Path, remote_name: &'a str) -> HostFuture<'a, String>;
}

/// How remote URLs are read
#[derive(ValueEnum, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// Run `git remote get-url`
    #[default]
    Command,

    /// Use libgit2, without spawning a process
    Libgit2,
}

impl GitBackend {
    /// Get the reader for this backend
    pub fn reader(self) -> Box<dyn RemoteUrlReader> {
        match self {
            GitBackend::Command => Box::new(GitCommand),
            GitBackend::Libgit2 => Box::new(Libgit2),
        }
    }
}

/// Reads remote URLs with the `git` executable
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCommand;

impl RemoteUrlReader for GitCommand {
    fn remote_url<'a>(&'a self, path: &'a Path, remote_name: &'a str) -> HostFuture<'a, String> {
        Box::pin(async move {
            let output = Command::new("git")
                .arg("-C")
                .arg(path)
                .args(["remote", "get-url", remote_name])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(
                    ForkMoverError::new(ForkMoverErrorKind::RemoteUrl).with_text(stderr.trim())
                );
            }
            let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if url.is_empty() {
                return Err(ForkMoverError::new(ForkMoverErrorKind::RemoteUrl)
                    .with_text(&format!("Empty url for remote '{remote_name}'")));
            }
            Ok(url)
        })
    }
}

/// Reads remote URLs in-process with libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct Libgit2;

impl RemoteUrlReader for Libgit2 {
    fn remote_url<'a>(&'a self, path: &'a Path, remote_name: &'a str) -> HostFuture<'a, String> {
        let result = read_remote_url(path, remote_name);
        Box::pin(async move { result })
    }
}

/// Open the repository at `path` and read the url of `remote_name`
fn read_remote_url(path: &Path, remote_name: &str) -> Result<String, ForkMoverError> {
    let repo = git2::Repository::open(path)?;
    let remote = repo.find_remote(remote_name)?;
    match remote.url() {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(ForkMoverError::new(ForkMoverErrorKind::RemoteUrl)
            .with_text(&format!("No usable url for remote '{remote_name}'"))),
    }
}
