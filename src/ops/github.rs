#![allow(async_fn_in_trait)]

use anyhow::Context;
use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;
use tracing::error;
use tracing::info;
use tracing::instrument;

use super::github_curl::GithubCurlClient;
use super::github_curl::HttpResponse;

const API_BASE: &str = "https://api.github.com";

// -----------------------------------------------------------------------------
// GithubOps trait

/// Operations for interacting with GitHub
#[cfg_attr(test, automock)]
pub trait GithubOps {
    /// Open a pull request merging `head` into `base`.
    async fn pr_create(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Merge an open pull request with a merge commit.
    async fn pr_merge(&self, number: u64) -> Result<MergeResult>;

    /// Delete a branch on the remote. A missing branch is reported, not an error.
    async fn delete_branch(&self, branch: &str) -> Result<BranchDeletion>;
}

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MergeResult {
    #[serde(default)]
    pub sha: Option<String>,
    pub merged: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDeletion {
    Deleted,
    NotFound,
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Serialize)]
struct MergePullRequest {
    commit_title: String,
    merge_method: &'static str,
}

// -----------------------------------------------------------------------------
// RealGithub

/// Real implementation backed by the GitHub REST API.
pub struct RealGithub {
    owner: String,
    repo: String,
    http_client: GithubCurlClient,
}

impl RealGithub {
    pub fn new(owner: String, repo: String, token: String) -> Self {
        Self {
            owner,
            repo,
            http_client: GithubCurlClient::new(token),
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", API_BASE, self.owner, self.repo, path)
    }
}

impl GithubOps for RealGithub {
    #[instrument(skip_all)]
    async fn pr_create(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        let request_body = CreatePullRequest {
            title,
            body,
            head,
            base,
        };
        let json_data = serde_json::to_string(&request_body)?;
        let response = self
            .http_client
            .post(&self.repo_url("pulls"), &json_data)
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to create pull request {} -> {}", head, base))?;

        let pr: PullRequest = serde_json::from_str(&response.body)?;
        info!("Pull request created successfully: {}", pr.html_url);
        Ok(pr)
    }

    #[instrument(skip_all)]
    async fn pr_merge(&self, number: u64) -> Result<MergeResult> {
        let request_body = MergePullRequest {
            commit_title: format!("Merge PR #{}", number),
            merge_method: "merge",
        };
        let json_data = serde_json::to_string(&request_body)?;
        let response = self
            .http_client
            .put(&self.repo_url(&format!("pulls/{}/merge", number)), &json_data)
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to merge pull request #{}", number))?;

        let result: MergeResult = serde_json::from_str(&response.body)?;
        info!("Pull request #{} merged: {}", number, result.message);
        Ok(result)
    }

    #[instrument(skip_all)]
    async fn delete_branch(&self, branch: &str) -> Result<BranchDeletion> {
        let response = self
            .http_client
            .delete(&self.repo_url(&format!("git/refs/heads/{}", branch)))
            .await?;

        branch_deletion(response, branch)
    }
}

/// Map the response of a branch deletion; a 404 means it was already gone.
fn branch_deletion(response: HttpResponse, branch: &str) -> Result<BranchDeletion> {
    match response.status {
        404 => {
            error!("Branch '{}' not found in the repository.", branch);
            Ok(BranchDeletion::NotFound)
        }
        _ => {
            response
                .error_for_status()
                .with_context(|| format!("Failed to delete branch '{}'", branch))?;
            info!("Branch '{}' deleted from remote repository.", branch);
            Ok(BranchDeletion::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_url() {
        let gh = RealGithub::new("octo".to_string(), "hello".to_string(), "t".to_string());
        assert_eq!(
            gh.repo_url("pulls/3/merge"),
            "https://api.github.com/repos/octo/hello/pulls/3/merge"
        );
    }

    #[test]
    fn test_create_payload_shape() {
        let body = CreatePullRequest {
            title: "t",
            body: "b",
            head: "feature/x",
            base: "develop",
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "t", "body": "b", "head": "feature/x", "base": "develop"})
        );
    }

    #[test]
    fn test_merge_payload_shape() {
        let body = MergePullRequest {
            commit_title: "Merge PR #12".to_string(),
            merge_method: "merge",
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"commit_title": "Merge PR #12", "merge_method": "merge"})
        );
    }

    #[test]
    fn test_deserialize_pull_request_ignores_extra_fields() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number": 42, "html_url": "https://github.com/o/r/pull/42", "state": "open"}"#,
        )
        .unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.html_url, "https://github.com/o/r/pull/42");
    }

    #[test]
    fn test_deserialize_merge_result() {
        let result: MergeResult = serde_json::from_str(
            r#"{"sha": "6dcb09b", "merged": true, "message": "Pull Request successfully merged"}"#,
        )
        .unwrap();
        assert!(result.merged);
        assert_eq!(result.sha.as_deref(), Some("6dcb09b"));
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_branch_deletion_no_content_is_deleted() {
        let result = branch_deletion(response(204, ""), "feature/x").unwrap();
        assert_eq!(result, BranchDeletion::Deleted);
    }

    #[test]
    fn test_branch_deletion_not_found_is_tolerated() {
        let body = r#"{"message": "Reference does not exist"}"#;
        let result = branch_deletion(response(404, body), "feature/x").unwrap();
        assert_eq!(result, BranchDeletion::NotFound);
    }

    #[test]
    fn test_branch_deletion_other_failures_are_errors() {
        let body = r#"{"message": "Reference update failed"}"#;
        let err = branch_deletion(response(422, body), "feature/x").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "Failed to delete branch 'feature/x': GitHub API error (422): Reference update failed"
        );

        assert!(branch_deletion(response(500, "oops"), "feature/x").is_err());
    }
}
