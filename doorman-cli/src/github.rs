//! Thin client for the GitHub REST API.
//!
//! One request per call, fixed auth and accept headers, no retries. Mutating
//! operations return the status code plus the response body as data; only
//! transport failures are errors. Callers inspect the status code and react,
//! typically by posting a failure comment rather than retrying.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use doorman_core::LABEL_JOIN_REQUEST;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "doorman/0.1.0";

/// One platform response: status code plus whatever came back.
///
/// `body` is parsed JSON, or the raw text wrapped as a JSON string when the
/// body is not valid JSON, or `Null` when empty.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub user: Account,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<Account>,
}

impl Issue {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    #[serde(default)]
    pub body: String,
    pub user: Account,
    pub created_at: String,
}

/// A timeline event on an issue (label additions, assignments, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEventRecord {
    pub event: String,
    #[serde(default)]
    pub actor: Option<Account>,
    #[serde(default)]
    pub label: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct TeamMembership {
    state: String,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    items: Vec<Issue>,
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: String,
    api_base: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token,
            api_base: API_BASE.to_string(),
        }
    }

    /// Send a single request. Returns `Err` only on transport failure; HTTP
    /// error statuses come back in the [`ApiResponse`] for the caller.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));

        let mut builder = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json");
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }

    fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
        serde_json::from_value(response.body).context("failed to decode response body")
    }

    pub async fn post_comment(&self, repo: &str, issue: u64, body: &str) -> Result<ApiResponse> {
        let response = self
            .request(
                Method::POST,
                &format!("repos/{}/issues/{}/comments", repo, issue),
                Some(json!({ "body": body })),
            )
            .await?;
        if !response.is_success() {
            warn!(
                "comment on issue #{} returned HTTP {}",
                issue, response.status
            );
        }
        Ok(response)
    }

    pub async fn add_labels(&self, repo: &str, issue: u64, labels: &[&str]) -> Result<ApiResponse> {
        let response = self
            .request(
                Method::POST,
                &format!("repos/{}/issues/{}/labels", repo, issue),
                Some(json!({ "labels": labels })),
            )
            .await?;
        if !response.is_success() {
            warn!(
                "labeling issue #{} returned HTTP {}",
                issue, response.status
            );
        }
        Ok(response)
    }

    pub async fn set_assignees(
        &self,
        repo: &str,
        issue: u64,
        assignees: &[String],
    ) -> Result<ApiResponse> {
        let response = self
            .request(
                Method::POST,
                &format!("repos/{}/issues/{}/assignees", repo, issue),
                Some(json!({ "assignees": assignees })),
            )
            .await?;
        if !response.is_success() {
            warn!(
                "assigning issue #{} returned HTTP {}",
                issue, response.status
            );
        }
        Ok(response)
    }

    /// Fetch the issue. A non-200 here means the invocation cannot do
    /// anything useful, so it is a hard error.
    pub async fn get_issue(&self, repo: &str, issue: u64) -> Result<Issue> {
        let response = self
            .request(Method::GET, &format!("repos/{}/issues/{}", repo, issue), None)
            .await?;
        if response.status != StatusCode::OK {
            bail!(
                "fetching issue #{} failed: HTTP {} {}",
                issue,
                response.status,
                response.body
            );
        }
        Self::decode(response)
    }

    /// All comments on the issue. A non-200 yields an empty list.
    pub async fn issue_comments(&self, repo: &str, issue: u64) -> Result<Vec<IssueComment>> {
        let response = self
            .request(
                Method::GET,
                &format!("repos/{}/issues/{}/comments", repo, issue),
                None,
            )
            .await?;
        if response.status != StatusCode::OK {
            warn!(
                "listing comments on issue #{} returned HTTP {}",
                issue, response.status
            );
            return Ok(Vec::new());
        }
        Self::decode(response)
    }

    /// Timeline events on the issue. A non-200 yields an empty list.
    pub async fn issue_events(&self, repo: &str, issue: u64) -> Result<Vec<IssueEventRecord>> {
        let response = self
            .request(
                Method::GET,
                &format!("repos/{}/issues/{}/events", repo, issue),
                None,
            )
            .await?;
        if response.status != StatusCode::OK {
            warn!(
                "listing events on issue #{} returned HTTP {}",
                issue, response.status
            );
            return Ok(Vec::new());
        }
        Self::decode(response)
    }

    /// 204 means the user is an org member; everything else means not.
    pub async fn is_org_member(&self, org: &str, username: &str) -> Result<bool> {
        let response = self
            .request(
                Method::GET,
                &format!("orgs/{}/members/{}", org, username),
                None,
            )
            .await?;
        Ok(response.status == StatusCode::NO_CONTENT)
    }

    /// Resolve a login to its numeric user id. Fails loudly: invitations
    /// cannot be sent without it.
    pub async fn user_id(&self, username: &str) -> Result<u64> {
        let response = self
            .request(Method::GET, &format!("users/{}", username), None)
            .await?;
        if response.status != StatusCode::OK {
            bail!(
                "resolving user id for {} failed: HTTP {} {}",
                username,
                response.status,
                response.body
            );
        }
        let account: Account = Self::decode(response)?;
        account
            .id
            .with_context(|| format!("user record for {} has no id", username))
    }

    pub async fn invite_to_org(&self, org: &str, invitee_id: u64) -> Result<ApiResponse> {
        info!("inviting user {} to org {}", invitee_id, org);
        self.request(
            Method::POST,
            &format!("orgs/{}/invitations", org),
            Some(json!({ "invitee_id": invitee_id })),
        )
        .await
    }

    pub async fn add_team_member(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<ApiResponse> {
        info!("adding {} to team {}/{}", username, org, team_slug);
        self.request(
            Method::PUT,
            &format!("orgs/{}/teams/{}/memberships/{}", org, team_slug, username),
            Some(json!({ "role": "member" })),
        )
        .await
    }

    /// Whether the user's team membership is `active` or `pending`.
    pub async fn team_membership_is_settled(
        &self,
        org: &str,
        team_slug: &str,
        username: &str,
    ) -> Result<bool> {
        let response = self
            .request(
                Method::GET,
                &format!("orgs/{}/teams/{}/memberships/{}", org, team_slug, username),
                None,
            )
            .await?;
        if response.status != StatusCode::OK {
            return Ok(false);
        }
        let membership: TeamMembership = Self::decode(response)?;
        Ok(matches!(membership.state.as_str(), "active" | "pending"))
    }

    /// Current member logins of a team. A non-200 yields an empty list.
    pub async fn team_members(&self, org: &str, team_slug: &str) -> Result<Vec<String>> {
        let response = self
            .request(
                Method::GET,
                &format!("orgs/{}/teams/{}/members", org, team_slug),
                None,
            )
            .await?;
        if response.status != StatusCode::OK {
            warn!(
                "listing members of {}/{} returned HTTP {}",
                org, team_slug, response.status
            );
            return Ok(Vec::new());
        }
        let members: Vec<Account> = Self::decode(response)?;
        Ok(members.into_iter().map(|m| m.login).collect())
    }

    /// All open issues carrying the join-request label. A non-200 here
    /// aborts the scan; there is nothing sensible to sweep.
    pub async fn search_open_join_requests(&self, repo: &str) -> Result<Vec<Issue>> {
        let url = format!("{}/search/issues", self.api_base);
        let query = format!(
            "repo:{} is:issue is:open label:{}",
            repo, LABEL_JOIN_REQUEST
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .query(&[("q", query.as_str()), ("per_page", "100")])
            .send()
            .await
            .context("issue search request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            bail!("issue search failed: HTTP {} {}", status, text);
        }

        let results: SearchResults = response
            .json()
            .await
            .context("failed to decode search results")?;
        Ok(results.items)
    }

    pub async fn close_issue(&self, repo: &str, issue: u64) -> Result<ApiResponse> {
        info!("closing issue #{}", issue);
        let response = self
            .request(
                Method::PATCH,
                &format!("repos/{}/issues/{}", repo, issue),
                Some(json!({ "state": "closed" })),
            )
            .await?;
        if !response.is_success() {
            warn!("closing issue #{} returned HTTP {}", issue, response.status);
        }
        Ok(response)
    }
}
