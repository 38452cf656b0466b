use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use serde::Deserialize;
use tokio::process::Command;

const USER_AGENT: &str = "User-Agent: superdev-cli";

/// HTTP client using curl for making GitHub API requests
pub struct GithubCurlClient {
    token: String,
}

/// Body and status code of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct GitHubError {
    message: String,
}

impl GithubCurlClient {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub async fn post(&self, url: &str, json_data: &str) -> Result<HttpResponse> {
        self.request("POST", url, Some(json_data)).await
    }

    pub async fn put(&self, url: &str, json_data: &str) -> Result<HttpResponse> {
        self.request("PUT", url, Some(json_data)).await
    }

    pub async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.request("DELETE", url, None).await
    }

    /// Send a request and return the response regardless of its status code.
    async fn request(&self, method: &str, url: &str, json_data: Option<&str>) -> Result<HttpResponse> {
        let auth = format!("Authorization: Bearer {}", self.token);
        let mut args = vec![
            "-s",
            "-w",
            "\n%{http_code}",
            "-X",
            method,
            "-H",
            auth.as_str(),
            "-H",
            "Accept: application/vnd.github+json",
            "-H",
            USER_AGENT,
        ];
        if let Some(data) = json_data {
            args.extend(["-H", "Content-Type: application/json", "-d", data]);
        }
        args.push(url);

        let output = Command::new("curl")
            .args(&args)
            .output()
            .await
            .context("Failed to execute curl command")?;

        if !output.status.success() {
            bail!(
                "curl command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        parse_response(output.stdout)
    }
}

/// Parse curl output with the status code appended on its own line.
fn parse_response(stdout: Vec<u8>) -> Result<HttpResponse> {
    let output_str = String::from_utf8(stdout)?;
    let (body, code) = output_str.rsplit_once('\n').unwrap_or(("", output_str.as_str()));
    let status = code
        .trim()
        .parse::<u16>()
        .with_context(|| format!("Unexpected curl status line: {:?}", code))?;

    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

impl HttpResponse {
    /// Turn 4xx/5xx responses into errors, preferring GitHub's own message.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status < 400 {
            return Ok(self);
        }
        if let Ok(error) = serde_json::from_str::<GitHubError>(&self.body) {
            bail!("GitHub API error ({}): {}", self.status, error.message);
        }
        bail!(
            "GitHub API request failed with status {}: {}",
            self.status,
            self.body
        );
    }
}
