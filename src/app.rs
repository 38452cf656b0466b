use anyhow::Context;
use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;

pub struct App<G: GitOps, H: GithubOps> {
    pub config: Config,
    pub git: G,
    pub gh: H,
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    pub fn new(config: Config, git: G, gh: H) -> Self {
        Self { config, git, gh }
    }
}

/// Shared helper methods for App
impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Clone the repository unless the working copy already exists, then set
    /// the commit identity.
    pub(crate) async fn clone_and_configure(&self) -> Result<()> {
        let path = &self.config.data_folder;
        let exists = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if exists {
            info!("Repository already exists at {}. Skipping clone.", path.display());
        } else {
            info!(
                "Cloning repository {} into {}...",
                self.config.repository_url,
                path.display()
            );
            let url = self.config.authenticated_url()?;
            self.git.clone_repository(&url).await?;
        }

        info!("Configuring Git user...");
        self.git
            .config_user(&self.config.user_name, &self.config.user_email)
            .await
    }

    /// Check out `branch`, creating it from the current HEAD if it does not exist.
    pub(crate) async fn check_or_create_branch(&self, branch: &str) -> Result<()> {
        info!("Checking if branch '{}' exists...", branch);
        if self.git.branch_exists(branch).await? {
            self.git.checkout(branch).await?;
            info!("Working in branch '{}'.", branch);
        } else {
            info!("Branch '{}' does not exist. Creating it...", branch);
            self.git.checkout_new(branch).await?;
            info!("Branch '{}' created and checked out.", branch);
        }
        Ok(())
    }

    /// Stage everything and, if anything changed, commit and push to `branch`.
    ///
    /// Returns whether a commit was made.
    pub(crate) async fn add_commit_push(&self, message: &str, branch: &str) -> Result<bool> {
        self.git.add_all().await?;

        if !self.git.has_changes().await? {
            info!("No changes to commit.");
            return Ok(false);
        }

        info!("Creating commit with message: {}", message);
        self.git.commit(message).await?;

        info!("Pushing to {}...", branch);
        self.git
            .push_upstream(branch)
            .await
            .with_context(|| format!("Failed to push {}", branch))?;
        Ok(true)
    }
}
