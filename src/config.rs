//! Configuration handling
use std::{
    fmt,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use home::home_dir;
use log::debug;
use serde::Deserialize;

use crate::{
    cli::ForkMoverCli,
    errors::{ForkMoverError, ForkMoverErrorKind},
    git::{GitBackend, DEFAULT_REMOTE},
    identity::IdentityMatch,
};

/// Environment variable holding the token of the source account
pub const SOURCE_TOKEN_ENV: &str = "GITHUB_SOURCE_TOKEN";

/// Environment variable holding the token of the target account
pub const TARGET_TOKEN_ENV: &str = "GITHUB_TARGET_TOKEN";

/// Content of the configuration file
#[derive(Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ConfigData {
    /// Remote read from local repositories
    pub remote: Option<String>,

    /// How remote URLs are read
    pub git_backend: Option<GitBackend>,

    /// Source account settings
    pub source: Option<AccountFileConfig>,

    /// Target account settings
    pub target: Option<AccountFileConfig>,
}

/// Account settings of the configuration file
#[derive(Deserialize, Default, Clone, PartialEq, Eq)]
pub struct AccountFileConfig {
    /// Github token
    pub token: Option<String>,
}

impl fmt::Debug for AccountFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountFileConfig")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ConfigData {
    /// Read the configuration file at `path`
    /// # Errors
    /// Error if the file can't be read or parsed
    pub fn from_path(path: &Path) -> Result<Self, ForkMoverError> {
        let contents = read_to_string(path).map_err(|e| {
            ForkMoverError::new(ForkMoverErrorKind::Config)
                .with_text(&format!("Unable to open {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Read the configuration file given on the command line, or the default one if it exists
    /// # Errors
    /// Error if an explicit file can't be read, or if a file can't be parsed
    pub fn load(explicit: Option<&Path>) -> Result<Self, ForkMoverError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match get_config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Get the path to the default config file
pub fn get_config_path() -> Option<PathBuf> {
    match home_dir() {
        Some(path) if !path.as_os_str().is_empty() => {
            Some(path.join(".config").join(".fork-mover").join("config.toml"))
        }
        _ => None,
    }
}

/// An account on the hosting platform
#[derive(Clone, PartialEq, Eq)]
pub struct AccountConfig {
    /// Username
    pub username: String,

    /// Token
    pub token: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Resolved configuration, built once at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkMoverConfig {
    /// Directory scanned for local repositories
    pub local_path: PathBuf,

    /// Account whose forks are migrated
    pub source: AccountConfig,

    /// Account receiving the new forks
    pub target: AccountConfig,

    /// Don't create anything
    pub dry_run: bool,

    /// Remote read from local repositories
    pub remote_name: String,

    /// How remote URLs are read
    pub git_backend: GitBackend,

    /// How fork identities are compared with local ones
    pub identity_match: IdentityMatch,
}

/// Pick the credential from the flag, or else from the environment variable `env_var`
/// # Errors
/// Error if neither is set
pub fn resolve_credential(flag: Option<&str>, env_var: &str) -> Result<String, ForkMoverError> {
    if let Some(value) = flag.filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ForkMoverError::new(ForkMoverErrorKind::Config)
            .with_text(&format!("{env_var} is not set"))),
    }
}

/// Resolve the token of one account: flag, then environment, then config file
fn resolve_account_token(
    flag: Option<&str>,
    env_var: &str,
    file: Option<&AccountFileConfig>,
    side: &str,
) -> Result<String, ForkMoverError> {
    resolve_credential(flag, env_var).or_else(|e| {
        debug!("{e}, looking into the config file");
        file.and_then(|account| account.token.clone())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                let flag_name = side.to_lowercase();
                ForkMoverError::new(ForkMoverErrorKind::Config).with_text(&format!(
                    "{side} GitHub token not provided. \
                     Set {env_var} environment variable or use --{flag_name}-token"
                ))
            })
    })
}

impl ForkMoverConfig {
    /// Build the configuration from the command line and the config file
    /// # Errors
    /// Error if a token is missing or the local path does not exist
    pub fn try_new(
        cli_args: ForkMoverCli,
        config_data: ConfigData,
    ) -> Result<Self, ForkMoverError> {
        let source_token = resolve_account_token(
            cli_args.source_token.as_deref(),
            SOURCE_TOKEN_ENV,
            config_data.source.as_ref(),
            "Source",
        )?;
        let target_token = resolve_account_token(
            cli_args.target_token.as_deref(),
            TARGET_TOKEN_ENV,
            config_data.target.as_ref(),
            "Target",
        )?;
        if !cli_args.local_path.exists() {
            return Err(ForkMoverError::new(ForkMoverErrorKind::Config).with_text(&format!(
                "Local path does not exist: {}",
                cli_args.local_path.display()
            )));
        }
        let remote_name = cli_args
            .remote
            .or(config_data.remote)
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
        Ok(Self {
            local_path: cli_args.local_path,
            source: AccountConfig {
                username: cli_args.source_user,
                token: source_token,
            },
            target: AccountConfig {
                username: cli_args.target_user,
                token: target_token,
            },
            dry_run: cli_args.dry_run,
            remote_name,
            git_backend: cli_args
                .git_backend
                .or(config_data.git_backend)
                .unwrap_or_default(),
            identity_match: if cli_args.ignore_case {
                IdentityMatch::IgnoreCase
            } else {
                IdentityMatch::Exact
            },
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cli(local_path: &Path) -> ForkMoverCli {
        ForkMoverCli {
            local_path: local_path.to_path_buf(),
            source_user: "alice".into(),
            target_user: "bob".into(),
            source_token: Some("src-token".into()),
            target_token: Some("dst-token".into()),
            ..Default::default()
        }
    }

    #[test]
    fn flag_wins_over_environment() {
        std::env::set_var("FORK_MOVER_TEST_FLAG_WINS", "from-env");
        assert_eq!(
            resolve_credential(Some("from-flag"), "FORK_MOVER_TEST_FLAG_WINS").unwrap(),
            "from-flag"
        );
    }

    #[test]
    fn environment_is_the_fallback() {
        std::env::set_var("FORK_MOVER_TEST_FALLBACK", "from-env");
        assert_eq!(
            resolve_credential(None, "FORK_MOVER_TEST_FALLBACK").unwrap(),
            "from-env"
        );
        assert_eq!(
            resolve_credential(Some(""), "FORK_MOVER_TEST_FALLBACK").unwrap(),
            "from-env"
        );
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let err = resolve_credential(None, "FORK_MOVER_TEST_NEVER_SET").unwrap_err();
        assert_eq!(err.kind(), &ForkMoverErrorKind::Config);
    }

    #[test]
    fn config_file_is_the_last_resort() {
        let file = AccountFileConfig {
            token: Some("file-token".into()),
        };
        let token = resolve_account_token(
            None,
            "FORK_MOVER_TEST_FILE_FALLBACK",
            Some(&file),
            "Target",
        )
        .unwrap();
        assert_eq!(token, "file-token");
        let err = resolve_account_token(None, "FORK_MOVER_TEST_FILE_FALLBACK", None, "Target")
            .unwrap_err();
        assert!(err.to_string().contains("--target-token"));
    }

    #[test]
    fn remote_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let data: ConfigData = toml::from_str(
            r#"
            remote = "upstream"
            git_backend = "libgit2"
            [source]
            token = "file-token"
            "#,
        )
        .unwrap();
        let config = ForkMoverConfig::try_new(cli(dir.path()), data).unwrap();
        assert_eq!(config.remote_name, "upstream");
        assert_eq!(config.git_backend, GitBackend::Libgit2);
        assert_eq!(config.source.token, "src-token");
    }

    #[test]
    fn builds_from_cli() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = cli(dir.path());
        args.dry_run = true;
        args.ignore_case = true;
        let config = ForkMoverConfig::try_new(args, ConfigData::default()).unwrap();
        assert_eq!(config.source.username, "alice");
        assert_eq!(config.target.username, "bob");
        assert_eq!(config.remote_name, DEFAULT_REMOTE);
        assert_eq!(config.git_backend, GitBackend::Command);
        assert_eq!(config.identity_match, IdentityMatch::IgnoreCase);
        assert!(config.dry_run);
        assert!(!format!("{config:?}").contains("src-token"));
    }

    #[test]
    fn missing_local_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(&dir.path().join("missing"));
        let err = ForkMoverConfig::try_new(args, ConfigData::default()).unwrap_err();
        assert_eq!(err.kind(), &ForkMoverErrorKind::Config);
        assert!(err.to_string().contains("Local path does not exist"));
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigData::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert_eq!(err.kind(), &ForkMoverErrorKind::Config);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "remote = [").unwrap();
        let err = ConfigData::from_path(&path).unwrap_err();
        assert_eq!(err.kind(), &ForkMoverErrorKind::Toml);
    }
}
