//! GitHub GraphQL payloads and conversion to RemoteFork
use serde::Deserialize;

use crate::{identity::RepoIdentity, platform::RemoteFork};

/// GraphQL response wrapper
#[derive(Deserialize, Debug)]
pub(crate) struct GraphQlResponse<T> {
    /// Query result
    pub data: Option<T>,

    /// Errors reported by the API
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// GraphQL error
#[derive(Deserialize, Debug)]
pub(crate) struct GraphQlError {
    /// Error message
    pub message: String,
}

/// `data` of the fork listing query
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForkListData {
    /// `null` when the login is unknown
    pub repository_owner: Option<RepositoryOwner>,
}

/// User or organization owning the forks
#[derive(Deserialize, Debug)]
pub(crate) struct RepositoryOwner {
    /// One page of repositories
    pub repositories: RepositoryConnection,
}

/// Page of repositories
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryConnection {
    /// Forks of this page
    pub nodes: Vec<ForkNode>,

    /// Cursor information
    pub page_info: PageInfo,
}

/// Pagination cursor
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    /// Whether another page follows
    pub has_next_page: bool,

    /// Cursor to request the next page
    pub end_cursor: Option<String>,
}

/// Owner of a repository
#[derive(Deserialize, Debug)]
pub(crate) struct Owner {
    /// Login of the owner
    pub login: String,
}

/// Repository the fork comes from
#[derive(Deserialize, Debug)]
pub(crate) struct ParentNode {
    /// Repository name
    pub name: String,

    /// Repository owner
    pub owner: Owner,
}

/// One fork in the listing
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForkNode {
    /// Repository name
    pub name: String,

    /// Repository owner
    pub owner: Owner,

    /// Repository fork status
    pub is_fork: bool,

    /// Repository URL
    pub url: String,

    /// `null` when the parent was deleted or is not visible
    pub parent: Option<ParentNode>,
}

impl From<ForkNode> for RemoteFork {
    fn from(node: ForkNode) -> Self {
        RemoteFork {
            identity: RepoIdentity::new(node.owner.login, node.name),
            is_fork: node.is_fork,
            parent: node
                .parent
                .map(|parent| RepoIdentity::new(parent.owner.login, parent.name)),
            url: node.url,
        }
    }
}
