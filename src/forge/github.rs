//! forge::github
//!
//! GitHub forge implementation using the REST git data API.
//!
//! # Design
//!
//! Each trait method is a single REST call:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | `get_ref` | `GET /repos/{o}/{r}/git/ref/heads/{branch}` |
//! | `get_commit` | `GET /repos/{o}/{r}/git/commits/{sha}` |
//! | `create_blob` | `POST /repos/{o}/{r}/git/blobs` |
//! | `create_tree` | `POST /repos/{o}/{r}/git/trees` |
//! | `create_commit` | `POST /repos/{o}/{r}/git/commits` |
//! | `update_ref` | `PATCH /repos/{o}/{r}/git/refs/heads/{branch}` |
//! | `create_repository` | `GET /user` + `POST /user/repos`, or `POST /orgs/{o}/repos` |
//!
//! # Blob Encoding
//!
//! Blob content is always sent base64-encoded (`"encoding": "base64"`), so
//! binary files arrive byte-exact and text files are never re-encoded.
//!
//! # Rate Limiting
//!
//! Rate limits surface as `ForgeError::RateLimited`. Nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use dirpush::auth::StaticTokenProvider;
//! use dirpush::forge::github::GitHubForge;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(StaticTokenProvider::new(token));
//! let forge = GitHubForge::new(provider, "octocat", "hello-world");
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::{CreateCommitRequest, CreateRepoRequest, Forge, ForgeError, UpdateRefRequest};
use crate::auth::TokenProvider;
use crate::core::types::{BranchName, Oid, TreeEntry};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("dirpush/", env!("CARGO_PKG_VERSION"));

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Source of bearer tokens
    token_provider: Arc<dyn TokenProvider>,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token provider
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a forge for `owner/repo` on github.com.
    pub fn new(
        provider: Arc<dyn TokenProvider>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::with_api_base(provider, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (e.g. `https://github.example.com/api/v3`)
    /// or a local test server.
    pub fn with_api_base(
        provider: Arc<dyn TokenProvider>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token_provider: provider,
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    async fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let token = self
            .token_provider
            .bearer_token()
            .await
            .map_err(|e| ForgeError::AuthFailed(e.to_string()))?;
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Send a request and decode a JSON response.
    async fn send<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T, ForgeError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .request(method.clone(), url)
            .headers(self.headers().await?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        tracing::debug!(%method, url, status = response.status().as_u16(), "github api");
        self.handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn error_from_response(response: Response, status: StatusCode) -> ForgeError {
        let headers = response.headers();
        let rate_exhausted = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");
        let required_permissions = headers
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        // Try to get error message from body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_exhausted => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn repo(&self) -> &str {
        &self.repo
    }

    async fn get_ref(&self, branch: &BranchName) -> Result<Oid, ForgeError> {
        let url = self.repo_url(&format!("git/ref/{}", ref_path(branch)));
        match self.send::<(), GitRef>(Method::GET, &url, None).await {
            Ok(git_ref) => Ok(git_ref.object.sha),
            // an empty repository has no refs at all
            Err(ForgeError::ApiError { status: 409, message }) => {
                Err(ForgeError::NotFound(message))
            }
            Err(e) => Err(e),
        }
    }

    async fn get_commit(&self, sha: &Oid) -> Result<Oid, ForgeError> {
        let url = self.repo_url(&format!("git/commits/{}", sha));
        let commit: GitCommit = self.send::<(), _>(Method::GET, &url, None).await?;
        Ok(commit.tree.sha)
    }

    async fn create_blob(&self, content: &[u8]) -> Result<Oid, ForgeError> {
        let url = self.repo_url("git/blobs");
        let body = CreateBlobBody {
            content: BASE64.encode(content),
            encoding: "base64",
        };
        let blob: GitObject = self.send(Method::POST, &url, Some(&body)).await?;
        Ok(blob.sha)
    }

    async fn create_tree(
        &self,
        entries: &[TreeEntry],
        base_tree: &Oid,
    ) -> Result<Oid, ForgeError> {
        let url = self.repo_url("git/trees");
        let body = CreateTreeBody {
            tree: entries,
            base_tree,
        };
        let tree: GitObject = self.send(Method::POST, &url, Some(&body)).await?;
        Ok(tree.sha)
    }

    async fn create_commit(&self, request: CreateCommitRequest) -> Result<Oid, ForgeError> {
        let url = self.repo_url("git/commits");
        let body = CreateCommitBody {
            message: &request.message,
            tree: &request.tree,
            parents: &request.parents,
        };
        let commit: GitObject = self.send(Method::POST, &url, Some(&body)).await?;
        Ok(commit.sha)
    }

    async fn update_ref(&self, request: UpdateRefRequest) -> Result<(), ForgeError> {
        let url = self.repo_url(&format!("git/refs/{}", ref_path(&request.branch)));
        let body = UpdateRefBody {
            sha: &request.sha,
            force: request.force,
        };
        match self
            .send::<_, GitRef>(Method::PATCH, &url, Some(&body))
            .await
        {
            Ok(_) => Ok(()),
            Err(ForgeError::ApiError { status: 422, message })
                if message.to_ascii_lowercase().contains("fast forward") =>
            {
                Err(ForgeError::Conflict(message))
            }
            Err(e) => Err(e),
        }
    }

    async fn create_repository(&self, request: CreateRepoRequest) -> Result<(), ForgeError> {
        let url = if request.org {
            format!("{}/orgs/{}/repos", self.api_base, self.owner)
        } else {
            // /user/repos creates under the token's account, which must be the owner
            let user: GitHubUser = self
                .send::<(), _>(Method::GET, &format!("{}/user", self.api_base), None)
                .await?;
            if !user.login.eq_ignore_ascii_case(&self.owner) {
                return Err(ForgeError::OwnerMismatch {
                    authenticated: user.login,
                    owner: self.owner.clone(),
                });
            }
            format!("{}/user/repos", self.api_base)
        };
        let body = CreateRepoBody {
            name: &self.repo,
            auto_init: true,
            private: request.private,
            description: request.description.as_deref(),
        };
        let _: GitHubRepository = self.send(Method::POST, &url, Some(&body)).await?;
        Ok(())
    }
}

/// The `heads/<branch>` ref path with each segment percent-encoded.
fn ref_path(branch: &BranchName) -> String {
    branch
        .api_ref()
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a blob.
#[derive(Serialize)]
struct CreateBlobBody {
    content: String,
    encoding: &'static str,
}

/// Request body for creating a tree.
#[derive(Serialize)]
struct CreateTreeBody<'a> {
    tree: &'a [TreeEntry],
    base_tree: &'a Oid,
}

/// Request body for creating a commit.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a Oid,
    parents: &'a [Oid],
}

/// Request body for updating a ref.
#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a Oid,
    force: bool,
}

/// Request body for creating a repository.
#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    auto_init: bool,
    private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Any object response carrying a sha (blob, tree, commit).
#[derive(Deserialize)]
struct GitObject {
    sha: Oid,
}

/// Ref response format.
#[derive(Deserialize)]
struct GitRef {
    object: GitObject,
}

/// Commit response format.
#[derive(Deserialize)]
struct GitCommit {
    tree: GitObject,
}

/// Authenticated user response format.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

/// Repository response format.
#[derive(Deserialize)]
struct GitHubRepository {
    #[allow(dead_code)]
    full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::core::types::RepoPath;

    fn forge() -> GitHubForge {
        GitHubForge::new(
            Arc::new(StaticTokenProvider::new("secret_token_xyz")),
            "owner",
            "repo",
        )
    }

    #[test]
    fn repo_url_format() {
        assert_eq!(
            forge().repo_url("git/blobs"),
            "https://api.github.com/repos/owner/repo/git/blobs"
        );
    }

    #[test]
    fn api_base_trailing_slash_trimmed() {
        let forge = GitHubForge::with_api_base(
            Arc::new(StaticTokenProvider::new("t")),
            "owner",
            "repo",
            "https://github.example.com/api/v3/",
        );
        assert_eq!(forge.api_base(), "https://github.example.com/api/v3");
    }

    #[test]
    fn debug_does_not_expose_token() {
        let debug_output = format!("{:?}", forge());
        assert!(!debug_output.contains("secret_token_xyz"));
        assert!(debug_output.contains("owner"));
    }

    #[test]
    fn ref_path_keeps_slashes() {
        let path = |b: &str| ref_path(&BranchName::new(b).unwrap());
        assert_eq!(path("feature/x"), "heads/feature/x");
        assert_eq!(path("a#b%c"), "heads/a%23b%25c");
        assert_eq!(path("é"), "heads/%C3%A9");
        assert_eq!(path("user@topic"), "heads/user%40topic");
    }

    #[test]
    fn blob_body_is_base64() {
        let body = CreateBlobBody {
            content: BASE64.encode([0u8, 255, 10]),
            encoding: "base64",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "content": "AP8K", "encoding": "base64" })
        );
    }

    #[test]
    fn tree_body_shape() {
        let sha = Oid::new("1111111111111111111111111111111111111111").unwrap();
        let base = Oid::new("2222222222222222222222222222222222222222").unwrap();
        let entries = vec![TreeEntry::blob(RepoPath::new("sub/bar.txt").unwrap(), sha)];
        let body = CreateTreeBody {
            tree: &entries,
            base_tree: &base,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "tree": [{
                    "path": "sub/bar.txt",
                    "mode": "100644",
                    "type": "blob",
                    "sha": "1111111111111111111111111111111111111111",
                }],
                "base_tree": "2222222222222222222222222222222222222222",
            })
        );
    }

    #[test]
    fn repo_body_omits_missing_description() {
        let body = CreateRepoBody {
            name: "repo",
            auto_init: true,
            private: false,
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "name": "repo", "auto_init": true, "private": false })
        );
    }

    #[test]
    fn ref_response_parses_nested_sha() {
        let json = r#"{
            "ref": "refs/heads/main",
            "node_id": "REF_x",
            "object": { "type": "commit", "sha": "AA218F56B14C9653891F9E74264A383FA43FEFBD" }
        }"#;
        let parsed: GitRef = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.object.sha.as_str(),
            "aa218f56b14c9653891f9e74264a383fa43fefbd"
        );
    }

    #[test]
    fn malformed_sha_in_response_is_rejected() {
        let parsed: Result<GitObject, _> = serde_json::from_str(r#"{ "sha": "zzz" }"#);
        assert!(parsed.is_err());
    }
}
