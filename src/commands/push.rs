use anyhow::Context;
use anyhow::Result;
use colored::Colorize;
use rand::Rng;
use tracing::info;

use crate::App;
use crate::commands::WorkOutcome;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::sentences;

/// Upper bound on the commits a `push` run makes; zero means a day off.
pub const MAX_PUSH_COMMITS: usize = 10;

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Commit straight to `branch` without any pull requests.
    ///
    /// Draws between 0 and [`MAX_PUSH_COMMITS`] sentences. Each one replaces
    /// the tracked file's contents and is committed and pushed on its own.
    pub async fn cmd_push<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        branch: &str,
        stdout: &mut impl std::io::Write,
    ) -> Result<WorkOutcome> {
        let count = rng.random_range(0..=MAX_PUSH_COMMITS);
        if count == 0 {
            info!("No commits drawn, taking the day off.");
            writeln!(stdout, "{}", "Rest day, nothing committed.".dimmed())?;
            return Ok(WorkOutcome::RestDay);
        }
        let messages = sentences::plain_messages(rng, count);
        info!("I'm a super developer, I may work hard today.");

        self.clone_and_configure().await?;
        self.check_or_create_branch(branch).await?;

        let path = self.config.file_path();
        let mut commits = 0;
        for message in &messages {
            tokio::fs::write(&path, message)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if self.add_commit_push(message, branch).await? {
                commits += 1;
            }
        }

        writeln!(
            stdout,
            "{} {} commits pushed to {}",
            "Worked hard:".green().bold(),
            commits,
            branch
        )?;
        Ok(WorkOutcome::Worked {
            commits,
            pull_requests: vec![],
        })
    }
}
