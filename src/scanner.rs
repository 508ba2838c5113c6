//! Scan a directory tree for local clones of GitHub repositories
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::{
    git::{RemoteUrlReader, GIT_DIR},
    identity::{parse_repository_url, IdentityMatch, RepoIdentity},
};

/// A local clone of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    /// Identity parsed from the remote URL
    pub identity: RepoIdentity,

    /// Root of the working tree
    pub path: PathBuf,

    /// URL of the remote
    pub remote_url: String,
}

/// Local repositories keyed by identity
#[derive(Debug, Clone, Default)]
pub struct LocalRepositories {
    /// Repositories found so far, with their insertion rank
    repos: BTreeMap<RepoIdentity, (usize, LocalRepository)>,

    /// Number of insertions
    inserted: usize,
}

impl LocalRepositories {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository, replacing any previous one with the same identity
    pub fn insert(&mut self, repo: LocalRepository) -> Option<LocalRepository> {
        self.inserted += 1;
        self.repos
            .insert(repo.identity.clone(), (self.inserted, repo))
            .map(|(_, previous)| previous)
    }

    /// Get the repository with exactly this identity
    pub fn get(&self, identity: &RepoIdentity) -> Option<&LocalRepository> {
        self.repos.get(identity).map(|(_, repo)| repo)
    }

    /// Find a repository matching `identity` with the given strategy
    ///
    /// Without case, several clones may match: the last inserted one wins.
    pub fn find(
        &self,
        identity: &RepoIdentity,
        strategy: IdentityMatch,
    ) -> Option<&LocalRepository> {
        match strategy {
            IdentityMatch::Exact => self.get(identity),
            IdentityMatch::IgnoreCase => self
                .repos
                .values()
                .filter(|(_, repo)| repo.identity.matches(identity, strategy))
                .max_by_key(|(rank, _)| *rank)
                .map(|(_, repo)| repo),
        }
    }

    /// Whether a repository with exactly this identity is present
    pub fn contains(&self, identity: &RepoIdentity) -> bool {
        self.repos.contains_key(identity)
    }

    /// Number of repositories
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// Whether no repository was found
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Iterate over the repositories, ordered by identity
    pub fn iter(&self) -> impl Iterator<Item = &LocalRepository> + '_ {
        self.repos.values().map(|(_, repo)| repo)
    }
}

impl FromIterator<LocalRepository> for LocalRepositories {
    fn from_iter<I: IntoIterator<Item = LocalRepository>>(iter: I) -> Self {
        let mut repos = Self::new();
        for repo in iter {
            repos.insert(repo);
        }
        repos
    }
}

/// Whether `path` is the root of a git working tree
pub fn is_repository_root(path: &Path) -> bool {
    path.join(GIT_DIR).exists()
}

/// Whether the entry is a hidden directory (the scan root never is)
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Scanner of local repositories
pub struct RepoScanner<'a> {
    /// Reader of remote URLs
    reader: &'a dyn RemoteUrlReader,

    /// Remote to read from each repository
    remote_name: String,
}

impl<'a> RepoScanner<'a> {
    /// Create a scanner reading `remote_name` with `reader`
    pub fn new(reader: &'a dyn RemoteUrlReader, remote_name: impl Into<String>) -> Self {
        Self {
            reader,
            remote_name: remote_name.into(),
        }
    }

    /// URL of the configured remote, `None` when it can't be read
    pub async fn get_remote_url(&self, path: &Path) -> Option<String> {
        match self.reader.remote_url(path, &self.remote_name).await {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("No remote '{}' for {}: {}", self.remote_name, path.display(), e);
                None
            }
        }
    }

    /// Walk `root` depth-first and collect the GitHub repositories found
    ///
    /// Hidden directories are skipped and the scan never descends into a repository,
    /// so nested repositories (submodules, vendored clones) are not reported.
    /// Unreadable directories are silently ignored.
    pub async fn scan(&self, root: &Path) -> LocalRepositories {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        info!("Scanning {} for GitHub repositories...", root.display());
        let mut local_repos = LocalRepositories::new();
        let mut walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() || !is_repository_root(entry.path()) {
                continue;
            }
            walker.skip_current_dir();
            let path = entry.into_path();
            let Some(remote_url) = self.get_remote_url(&path).await else {
                continue;
            };
            let Some(identity) = parse_repository_url(&remote_url) else {
                debug!("Not a GitHub remote: {} ({})", path.display(), remote_url);
                continue;
            };
            info!("Found: {} at {}", identity, path.display());
            local_repos.insert(LocalRepository {
                identity,
                path,
                remote_url,
            });
        }
        info!("Found {} GitHub repositories locally", local_repos.len());
        local_repos
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        errors::{ForkMoverError, ForkMoverErrorKind},
        platform::HostFuture,
    };
    use std::{collections::HashMap, fs, sync::Mutex};

    /// Reader answering from a map of directory name to URL
    #[derive(Default)]
    struct FakeReader {
        urls: HashMap<String, String>,
        asked: Mutex<Vec<PathBuf>>,
    }

    impl FakeReader {
        fn with(urls: &[(&str, &str)]) -> Self {
            Self {
                urls: urls
                    .iter()
                    .map(|(dir, url)| (dir.to_string(), url.to_string()))
                    .collect(),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    impl RemoteUrlReader for FakeReader {
        fn remote_url<'a>(&'a self, path: &'a Path, _remote: &'a str) -> HostFuture<'a, String> {
            self.asked.lock().unwrap().push(path.to_path_buf());
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let result = self.urls.get(&name).cloned().ok_or_else(|| {
                ForkMoverError::new(ForkMoverErrorKind::RemoteUrl).with_text("no such remote")
            });
            Box::pin(async move { result })
        }
    }

    fn make_repo(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.join(GIT_DIR)).unwrap();
        path
    }

    #[tokio::test]
    async fn finds_repositories_with_github_remotes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let widget = make_repo(&root, "work/widget");
        let gadget = make_repo(&root, "gadget");
        make_repo(&root, "elsewhere");
        make_repo(&root, "no-remote");
        fs::create_dir_all(root.join("plain/dir")).unwrap();
        let reader = FakeReader::with(&[
            ("widget", "git@github.com:acme/widget.git"),
            ("gadget", "https://github.com/acme/gadget"),
            ("elsewhere", "https://gitlab.com/acme/elsewhere.git"),
        ]);

        let repos = RepoScanner::new(&reader, "origin").scan(&root).await;

        assert_eq!(repos.len(), 2);
        let found = repos.get(&RepoIdentity::new("acme", "widget")).unwrap();
        assert_eq!(found.path, widget);
        assert_eq!(found.remote_url, "git@github.com:acme/widget.git");
        let found = repos.get(&RepoIdentity::new("acme", "gadget")).unwrap();
        assert_eq!(found.path, gadget);
    }

    #[tokio::test]
    async fn does_not_descend_into_repositories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let outer = make_repo(&root, "a/b");
        make_repo(&root, "a/b/vendor/c");
        let reader = FakeReader::with(&[
            ("b", "git@github.com:acme/b.git"),
            ("c", "git@github.com:acme/c.git"),
        ]);

        let repos = RepoScanner::new(&reader, "origin").scan(&root).await;

        assert_eq!(repos.len(), 1);
        assert_eq!(repos.get(&RepoIdentity::new("acme", "b")).unwrap().path, outer);
        assert!(!repos.contains(&RepoIdentity::new("acme", "c")));
        assert_eq!(reader.asked.lock().unwrap().as_slice(), &[outer]);
    }

    #[tokio::test]
    async fn skips_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        make_repo(&root, ".cache/hidden");
        make_repo(&root, "visible");
        let reader = FakeReader::with(&[
            ("hidden", "git@github.com:acme/hidden.git"),
            ("visible", "git@github.com:acme/visible.git"),
        ]);

        let repos = RepoScanner::new(&reader, "origin").scan(&root).await;

        assert_eq!(repos.len(), 1);
        assert!(repos.contains(&RepoIdentity::new("acme", "visible")));
    }

    #[tokio::test]
    async fn root_can_be_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let root = make_repo(&dir.path().canonicalize().unwrap(), "widget");
        make_repo(&root, "nested");
        let reader = FakeReader::with(&[
            ("widget", "git@github.com:acme/widget.git"),
            ("nested", "git@github.com:acme/nested.git"),
        ]);

        let repos = RepoScanner::new(&reader, "origin").scan(&root).await;

        assert_eq!(repos.len(), 1);
        assert!(repos.contains(&RepoIdentity::new("acme", "widget")));
    }

    #[tokio::test]
    async fn duplicate_identities_keep_the_last_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        make_repo(&root, "a/widget");
        let second = make_repo(&root, "b/widget");
        let reader = FakeReader::with(&[("widget", "git@github.com:acme/widget.git")]);

        let repos = RepoScanner::new(&reader, "origin").scan(&root).await;

        assert_eq!(repos.len(), 1);
        assert_eq!(
            repos.get(&RepoIdentity::new("acme", "widget")).unwrap().path,
            second
        );
    }

    #[test]
    fn find_respects_the_match_strategy() {
        let repos: LocalRepositories = [LocalRepository {
            identity: RepoIdentity::new("Acme", "Widget"),
            path: PathBuf::from("/src/widget"),
            remote_url: "git@github.com:Acme/Widget.git".into(),
        }]
        .into_iter()
        .collect();
        let lower = RepoIdentity::new("acme", "widget");
        assert!(repos.find(&lower, IdentityMatch::Exact).is_none());
        assert_eq!(
            repos.find(&lower, IdentityMatch::IgnoreCase).map(|r| r.path.clone()),
            Some(PathBuf::from("/src/widget"))
        );
    }

    #[test]
    fn find_without_case_prefers_the_last_inserted() {
        let clone = |owner: &str, path: &str| LocalRepository {
            identity: RepoIdentity::new(owner, "widget"),
            path: PathBuf::from(path),
            remote_url: format!("git@github.com:{owner}/widget.git"),
        };
        let repos: LocalRepositories = [
            clone("acme", "/src/first"),
            clone("Acme", "/src/second"),
        ]
        .into_iter()
        .collect();
        let wanted = RepoIdentity::new("ACME", "widget");
        assert_eq!(
            repos.find(&wanted, IdentityMatch::IgnoreCase).map(|r| r.path.clone()),
            Some(PathBuf::from("/src/second"))
        );
        let exact = RepoIdentity::new("acme", "widget");
        assert_eq!(
            repos.find(&exact, IdentityMatch::Exact).map(|r| r.path.clone()),
            Some(PathBuf::from("/src/first"))
        );
    }

    #[test]
    fn repository_root_detection() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_repository_root(dir.path()));
        fs::write(dir.path().join(GIT_DIR), "gitdir: ../.git/modules/x").unwrap();
        assert!(is_repository_root(dir.path()));
    }
}
