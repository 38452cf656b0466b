use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Args;

/// Run configuration.
///
/// Every field can be given as a flag or through the environment (a `.env`
/// file in the current directory is loaded first).
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Working copy directory; the repository is cloned here
    #[arg(long = "data-folder", global = true, env = "DATA_FOLDER_NAME", default_value = "data")]
    pub data_folder: path::PathBuf,

    /// Name of the tracked file, without the .txt extension
    #[arg(long, global = true, env = "DATA_FILE_NAME", default_value = "changes")]
    pub data_file_name: String,

    /// HTTPS URL of the repository to write to
    #[arg(long, global = true, env = "REPOSITORY_URL", default_value = "", hide_default_value = true)]
    pub repository_url: String,

    /// Repository owner (derived from the URL if omitted)
    #[arg(long, global = true, env = "REPOSITORY_OWNER")]
    pub repository_owner: Option<String>,

    /// Repository name (derived from the URL if omitted)
    #[arg(long, global = true, env = "REPOSITORY_NAME")]
    pub repository_name: Option<String>,

    #[arg(long, global = true, env = "USER_NAME", default_value = "Super-dev")]
    pub user_name: String,

    #[arg(
        long,
        global = true,
        env = "USER_EMAIL",
        default_value = "Super-dev@users.noreply.github.com"
    )]
    pub user_email: String,

    /// Personal access token with contents and pull request write access
    #[arg(
        long,
        global = true,
        env = "GITHUB_ACCESS_TOKEN",
        default_value = "",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub github_token: String,

    /// Transient branch the commits land on
    #[arg(long, global = true, env = "SOURCE_BRANCH", default_value = "feature/super-dev")]
    pub source_branch: String,

    /// Integration branch the source branch is merged into
    #[arg(long, global = true, env = "TARGET_BRANCH", default_value = "develop")]
    pub target_branch: String,

    /// Production branch the target branch is merged into
    #[arg(long, global = true, env = "PROD_BRANCH", default_value = "main")]
    pub prod_branch: String,

    /// Chance in [0, 1] that a `work` run does anything
    #[arg(long, global = true, env = "WORK_PROBABILITY", default_value_t = 0.8)]
    pub work_probability: f64,
}

impl Config {
    /// Path of the tracked file inside the working copy.
    pub fn file_path(&self) -> path::PathBuf {
        self.data_folder.join(format!("{}.txt", self.data_file_name))
    }

    /// Reject values that would fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if self.repository_url.trim().is_empty() {
            bail!("A repository URL is required (--repository-url or REPOSITORY_URL)");
        }
        if !self.repository_url.starts_with("https://") {
            bail!("Unsupported repository URL format. Only HTTPS is supported.");
        }
        if self.github_token.trim().is_empty() {
            bail!("A GitHub access token is required (--github-token or GITHUB_ACCESS_TOKEN)");
        }
        if !(0.0..=1.0).contains(&self.work_probability) {
            bail!(
                "Work probability must be between 0 and 1, got {}",
                self.work_probability
            );
        }
        for (name, branch) in [
            ("source", &self.source_branch),
            ("target", &self.target_branch),
            ("prod", &self.prod_branch),
        ] {
            if branch.trim().is_empty() {
                bail!("The {} branch name is empty", name);
            }
        }
        if self.source_branch == self.target_branch
            || self.target_branch == self.prod_branch
            || self.source_branch == self.prod_branch
        {
            bail!("Source, target and prod branches must differ");
        }
        self.repository()?;
        Ok(())
    }

    /// Owner and name of the repository, explicit values taking precedence.
    pub fn repository(&self) -> Result<(String, String)> {
        match (&self.repository_owner, &self.repository_name) {
            (Some(owner), Some(name)) => Ok((owner.clone(), name.clone())),
            (owner, name) => {
                let (url_owner, url_name) = parse_github_repo(&self.repository_url)?;
                Ok((
                    owner.clone().unwrap_or(url_owner),
                    name.clone().unwrap_or(url_name),
                ))
            }
        }
    }

    /// Clone URL with the access token injected.
    pub fn authenticated_url(&self) -> Result<String> {
        authenticated_url(&self.repository_url, &self.github_token)
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self {
            data_folder: path::PathBuf::from("data"),
            data_file_name: "changes".to_string(),
            repository_url: "https://github.com/octo/activity.git".to_string(),
            repository_owner: None,
            repository_name: None,
            user_name: "Super-dev".to_string(),
            user_email: "Super-dev@users.noreply.github.com".to_string(),
            github_token: "ghp_test".to_string(),
            source_branch: "feature/super-dev".to_string(),
            target_branch: "develop".to_string(),
            prod_branch: "main".to_string(),
            work_probability: 0.8,
        }
    }
}

/// Parse owner and repo from a GitHub remote URL.
///
/// Accepts `https://github.com/owner/repo(.git)` and `git@github.com:owner/repo.git`.
pub fn parse_github_repo(url: &str) -> Result<(String, String)> {
    let parts = if let Some(rest) = url.strip_prefix("git@github.com:") {
        rest
    } else if let Some(rest) = url.strip_prefix("https://github.com/") {
        rest
    } else {
        bail!("Remote URL is not a GitHub URL: {}", url);
    };

    let parts = parts.trim_end_matches('/');
    let parts = parts.strip_suffix(".git").unwrap_or(parts);
    let mut split = parts.split('/');
    let owner = split
        .next()
        .filter(|s| !s.is_empty())
        .context("Could not parse owner from GitHub URL")?
        .to_string();
    let repo = split
        .next()
        .filter(|s| !s.is_empty())
        .context("Could not parse repo from GitHub URL")?
        .to_string();

    Ok((owner, repo))
}

/// Inject `token` as the userinfo part of an HTTPS URL.
pub fn authenticated_url(url: &str, token: &str) -> Result<String> {
    let Some(rest) = url.strip_prefix("https://") else {
        bail!("Unsupported repository URL format. Only HTTPS is supported.");
    };
    Ok(format!("https://{}@{}", token, rest))
}
