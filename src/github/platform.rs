//! Github Platform
use super::{
    repo::{ForkListData, GraphQlResponse},
    FORK_LIST_LIMIT, FORK_PAGE_SIZE, GITHUB_API_HEADER, GITHUB_API_URL, GITHUB_API_VERSION,
    LIST_FORKS_QUERY,
};
use crate::{
    errors::{ForkMoverError, ForkMoverErrorKind},
    identity::RepoIdentity,
    platform::{ForkHost, HostFuture, PlatformType, RemoteFork},
};
use log::debug;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
    StatusCode,
};
use serde_json::json;
use urlencoding::encode;

/// Github Platform, authenticated as one account
#[derive(Default, Clone)]
pub struct GithubPlatform {
    /// Github username
    username: String,

    /// Github token
    token: String,

    /// Reqwest client
    client: reqwest::Client,
}

impl std::fmt::Debug for GithubPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubPlatform")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl GithubPlatform {
    /// Create a new GithubPlatform
    pub fn new(username: String, token: String) -> Self {
        Self {
            username,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Build an error of the given kind for this platform
    fn error(kind: ForkMoverErrorKind, text: &str) -> ForkMoverError {
        ForkMoverError::new(kind)
            .with_platform(PlatformType::Github)
            .with_text(text)
    }
}

/// Number of forks to request when `listed` are already known
fn next_page_size(listed: usize) -> usize {
    FORK_PAGE_SIZE.min(FORK_LIST_LIMIT.saturating_sub(listed))
}

/// Read one page of the fork listing of `owner`
///
/// Returns the forks of the page and the cursor of the next one, `None` on the last page.
/// A failed request, GraphQL errors or an unknown account are `ListForks` errors:
/// only a real empty page gives no fork.
fn parse_fork_page(
    status: StatusCode,
    text: &str,
    owner: &str,
) -> Result<(Vec<RemoteFork>, Option<String>), ForkMoverError> {
    if !status.is_success() {
        return Err(GithubPlatform::error(
            ForkMoverErrorKind::ListForks,
            &format!("{status} - {text}"),
        ));
    }
    let response: GraphQlResponse<ForkListData> = serde_json::from_str(text)?;
    if !response.errors.is_empty() {
        let messages = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GithubPlatform::error(ForkMoverErrorKind::ListForks, &messages));
    }
    let Some(repository_owner) = response.data.and_then(|d| d.repository_owner) else {
        return Err(GithubPlatform::error(
            ForkMoverErrorKind::ListForks,
            &format!("Account '{owner}' not found"),
        ));
    };
    let connection = repository_owner.repositories;
    let has_next_page = connection.page_info.has_next_page;
    let next_cursor = connection.page_info.end_cursor.filter(|_| has_next_page);
    let forks = connection.nodes.into_iter().map(RemoteFork::from).collect();
    Ok((forks, next_cursor))
}

impl ForkHost for GithubPlatform {
    fn get_username(&self) -> &str {
        &self.username
    }

    fn get_type(&self) -> PlatformType {
        PlatformType::Github
    }

    fn list_forks(&self, owner: &str) -> HostFuture<'_, Vec<RemoteFork>> {
        let token = self.token.clone();
        let client = self.client.clone();
        let owner = owner.to_string();
        Box::pin(async move {
            let url = format!("https://{GITHUB_API_URL}/graphql");
            let mut cursor: Option<String> = None;
            let mut all_forks = Vec::new();
            let mut page: usize = 1;
            while all_forks.len() < FORK_LIST_LIMIT {
                let first = next_page_size(all_forks.len());
                let body = json!({
                    "query": LIST_FORKS_QUERY,
                    "variables": { "login": owner, "first": first, "after": cursor },
                });
                let request = client
                    .post(&url)
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header(ACCEPT, "application/vnd.github+json")
                    .header(USER_AGENT, "reqwest")
                    .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
                    .json(&body)
                    .send();
                let response = request.await?;
                let status = response.status();
                let text = response.text().await?;
                let (forks, next_cursor) = parse_fork_page(status, &text, &owner)?;
                debug!(
                    "Requested github forks of {} (page {}): {}",
                    owner,
                    page,
                    forks.len()
                );
                all_forks.extend(forks);
                cursor = next_cursor;
                if cursor.is_none() {
                    break;
                }
                page += 1;
            }
            all_forks.truncate(FORK_LIST_LIMIT);
            Ok(all_forks)
        })
    }

    fn create_fork(&self, parent: &RepoIdentity, fork_name: &str) -> HostFuture<'_, ()> {
        let token = self.token.clone();
        let client = self.client.clone();
        let parent = parent.clone();
        let fork_name = fork_name.to_string();
        Box::pin(async move {
            let url = format!(
                "https://{}/repos/{}/{}/forks",
                GITHUB_API_URL,
                encode(&parent.owner),
                encode(&parent.name)
            );
            let request = client
                .post(&url)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .header(ACCEPT, "application/vnd.github+json")
                .header(USER_AGENT, "reqwest")
                .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
                .json(&json!({ "name": fork_name }))
                .send();
            let response = request.await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await?;
                return Err(Self::error(
                    ForkMoverErrorKind::CreateFork,
                    &format!("{status} - {text}"),
                ));
            }
            Ok(())
        })
    }
}
