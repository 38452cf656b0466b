#![allow(async_fn_in_trait)]

use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::debug;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations on the local working copy.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Clone `url` into the working copy path.
    async fn clone_repository(&self, url: &str) -> Result<()>;

    /// Set the commit identity for the working copy only.
    async fn config_user(&self, name: &str, email: &str) -> Result<()>;

    /// Whether a local branch with this exact name exists.
    async fn branch_exists(&self, branch: &str) -> Result<bool>;
    async fn checkout(&self, branch: &str) -> Result<()>;
    async fn checkout_new(&self, branch: &str) -> Result<()>;
    async fn pull(&self, branch: &str) -> Result<()>;
    async fn add_all(&self) -> Result<()>;

    /// Whether `git status --porcelain` reports anything.
    async fn has_changes(&self) -> Result<bool>;
    async fn commit(&self, message: &str) -> Result<()>;

    /// Push the branch and record `origin/<branch>` as its upstream.
    async fn push_upstream(&self, branch: &str) -> Result<()>;
    async fn delete_local_branch(&self, branch: &str) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI inside the working copy.
pub struct RealGit {
    path: path::PathBuf,
}

impl RealGit {
    pub fn new(path: path::PathBuf) -> Self {
        Self { path }
    }

    /// Run git inside the working copy and return its stdout.
    async fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git {} failed ({}): {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8(output.stdout)?;
        debug!(args = ?args, "{}", stdout.trim_end());
        Ok(stdout)
    }
}

impl GitOps for RealGit {
    async fn clone_repository(&self, url: &str) -> Result<()> {
        // The URL may carry an access token, so it stays out of logs and errors.
        let output = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(&self.path)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git clone into {} failed ({}): {}",
                self.path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    async fn config_user(&self, name: &str, email: &str) -> Result<()> {
        self.git(&["config", "user.name", name]).await?;
        self.git(&["config", "user.email", email]).await?;
        Ok(())
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        let output = self
            .git(&["branch", "--list", "--format=%(refname:short)", branch])
            .await?;
        Ok(output.lines().any(|line| line.trim() == branch))
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", branch]).await?;
        Ok(())
    }

    async fn checkout_new(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn pull(&self, branch: &str) -> Result<()> {
        self.git(&["pull", "origin", branch]).await?;
        Ok(())
    }

    async fn add_all(&self) -> Result<()> {
        self.git(&["add", "."]).await?;
        Ok(())
    }

    async fn has_changes(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"]).await?;
        Ok(!output.trim().is_empty())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push_upstream(&self, branch: &str) -> Result<()> {
        self.git(&["push", "--set-upstream", "origin", branch])
            .await?;
        Ok(())
    }

    async fn delete_local_branch(&self, branch: &str) -> Result<()> {
        self.git(&["branch", "-D", branch]).await?;
        Ok(())
    }
}
