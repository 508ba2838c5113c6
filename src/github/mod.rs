//! GitHub API module.
pub(crate) mod platform;
pub(crate) mod repo;

/// GitHub URL
pub(crate) const GITHUB_URL: &str = "github.com";

/// GitHub API URL
const GITHUB_API_URL: &str = "api.github.com";

/// GitHub API Header
const GITHUB_API_HEADER: &str = "X-GitHub-Api-Version";

/// GitHub API Version
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Upper bound on the number of forks listed for an account
pub(crate) const FORK_LIST_LIMIT: usize = 1000;

/// Page size of the fork listing (GraphQL maximum)
const FORK_PAGE_SIZE: usize = 100;

/// GraphQL query listing the forks owned by an account
const LIST_FORKS_QUERY: &str = r#"
query($login: String!, $first: Int!, $after: String) {
  repositoryOwner(login: $login) {
    repositories(first: $first, after: $after, isFork: true, ownerAffiliations: OWNER) {
      nodes {
        name
        owner { login }
        isFork
        url
        parent { name owner { login } }
      }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;
