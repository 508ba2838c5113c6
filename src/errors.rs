//! Error handling for the fork-mover crate.
use std::{error::Error as StdError, fmt};

use crate::platform::PlatformType;

/// Error type for the fork-mover crate.
#[derive(Debug)]
pub struct ForkMoverError {
    /// Inner error.
    inner: Box<Inner>,
}

impl ForkMoverError {
    /// Create a new error.
    pub(crate) fn new(kind: ForkMoverErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                platform: None,
            }),
        }
    }

    /// Attach a text source to the error.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Attach the platform the error comes from.
    pub(crate) fn with_platform(mut self, platform: PlatformType) -> Self {
        self.inner.platform = Some(platform);
        self
    }

    /// Kind of the error.
    pub fn kind(&self) -> &ForkMoverErrorKind {
        &self.inner.kind
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the fork-mover crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: ForkMoverErrorKind,

    /// Platform error
    platform: Option<PlatformType>,

    /// Source error.
    source: Option<BoxError>,
}

/// Kinds of [`ForkMoverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkMoverErrorKind {
    /// Invalid or missing configuration (credentials, paths, config file).
    Config,

    /// Local i/o error.
    Io,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error while reading the TOML config file.
    Toml,

    /// Error related to Git2.
    Git2,

    /// Unable to read a remote URL from a local repository.
    RemoteUrl,

    /// Listing the forks of an account failed.
    ListForks,

    /// Creating a fork failed.
    CreateFork,

    /// Error while reading user input.
    Input,
}

impl fmt::Display for ForkMoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(platform) = &self.inner.platform {
            write!(f, " ({platform})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for ForkMoverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl ForkMoverError {
    /// Wrap a source error into a new error of the given kind.
    fn from_source(kind: ForkMoverErrorKind, source: BoxError) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: Some(source),
                platform: None,
            }),
        }
    }
}

impl From<&str> for ForkMoverError {
    fn from(text: &str) -> Self {
        Self::new(ForkMoverErrorKind::Config).with_text(text)
    }
}

impl From<String> for ForkMoverError {
    fn from(text: String) -> Self {
        Self::new(ForkMoverErrorKind::Config).with_text(&text)
    }
}

impl From<reqwest::Error> for ForkMoverError {
    fn from(e: reqwest::Error) -> Self {
        Self::from_source(ForkMoverErrorKind::Reqwest, Box::new(e))
    }
}

impl From<serde_json::Error> for ForkMoverError {
    fn from(e: serde_json::Error) -> Self {
        Self::from_source(ForkMoverErrorKind::Serde, Box::new(e))
    }
}

impl From<toml::de::Error> for ForkMoverError {
    fn from(e: toml::de::Error) -> Self {
        Self::from_source(ForkMoverErrorKind::Toml, Box::new(e))
    }
}

impl From<std::io::Error> for ForkMoverError {
    fn from(e: std::io::Error) -> Self {
        Self::from_source(ForkMoverErrorKind::Io, Box::new(e))
    }
}

impl From<git2::Error> for ForkMoverError {
    fn from(e: git2::Error) -> Self {
        Self::from_source(ForkMoverErrorKind::Git2, Box::new(e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_kind_platform_and_text() {
        let err = ForkMoverError::new(ForkMoverErrorKind::CreateFork)
            .with_platform(PlatformType::Github)
            .with_text("Not Found");
        assert_eq!(err.to_string(), "CreateFork (github): Not Found");
        assert_eq!(err.kind(), &ForkMoverErrorKind::CreateFork);
        assert!(err.source().is_some());
    }

    #[test]
    fn plain_messages_are_config_errors() {
        let err: ForkMoverError = "Local path does not exist: /nope".into();
        assert_eq!(err.kind(), &ForkMoverErrorKind::Config);
        assert_eq!(err.to_string(), "Config: Local path does not exist: /nope");
    }
}
