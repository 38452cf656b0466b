use std::ops::RangeInclusive;

use anyhow::Context;
use anyhow::Result;
use chrono::Datelike;
use chrono::NaiveDate;
use colored::Colorize;
use rand::Rng;
use tokio::io::AsyncWriteExt;
use tracing::error;
use tracing::info;

use crate::App;
use crate::commands::WorkOutcome;
use crate::ops::git::GitOps;
use crate::ops::github::GithubOps;
use crate::ops::github::PullRequest;
use crate::sentences;

pub const CLEANUP_MESSAGE: &str = ":rocket: feat: cleaned the file";

pub const FEATURE_PR_TITLE: &str = ":rocket: Super Dev is working hard today!";
pub const RELEASE_PR_TITLE: &str = ":rocket: Merging changes to main!";
pub const RELEASE_PR_BODY: &str =
    "Incredible content in production because i'm a super developer!";

#[derive(Debug, Clone)]
pub struct WorkOptions {
    /// Inclusive range the number of commits is drawn from.
    pub commits: RangeInclusive<usize>,
    /// Open and merge the source → target → prod pull requests.
    pub open_prs: bool,
    /// Delete the source branch once it has been merged.
    pub delete_branch: bool,
}

impl Default for WorkOptions {
    fn default() -> Self {
        Self {
            commits: 1..=20,
            open_prs: true,
            delete_branch: true,
        }
    }
}

impl<G: GitOps, H: GithubOps> App<G, H> {
    /// Produce a day of activity.
    ///
    /// 1. Roll against the work probability; a miss is a rest day.
    /// 2. Make sure the working copy exists and the target branch is current.
    /// 3. Branch the source branch off the target branch.
    /// 4. On the first of the month, empty the tracked file.
    /// 5. Append each generated message to the file and commit + push it.
    /// 6. Merge source into target, then target into prod, through pull requests.
    /// 7. Delete the source branch on the remote and locally.
    pub async fn cmd_work<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        today: NaiveDate,
        options: &WorkOptions,
        stdout: &mut impl std::io::Write,
    ) -> Result<WorkOutcome> {
        if rng.random::<f64>() >= self.config.work_probability {
            info!("I'm a lazy developer because I did not work on my rest day.");
            writeln!(stdout, "{}", "Rest day, nothing committed.".dimmed())?;
            return Ok(WorkOutcome::RestDay);
        }

        let count = rng.random_range(options.commits.clone());
        let messages = sentences::commit_messages(rng, count);
        info!("I'm a super developer, I may work hard today...");

        match self.work_hard(today, &messages, options).await {
            Ok(pull_requests) => {
                info!(
                    "Workflow completed successfully with {} commits.",
                    messages.len()
                );
                writeln!(
                    stdout,
                    "{} {} commits pushed to {}",
                    "Worked hard:".green().bold(),
                    messages.len(),
                    self.config.source_branch
                )?;
                for pr in &pull_requests {
                    writeln!(stdout, "  {}", pr.html_url.dimmed())?;
                }
                Ok(WorkOutcome::Worked {
                    commits: messages.len(),
                    pull_requests,
                })
            }
            Err(e) => {
                error!("An error occurred during the workflow: {:#}", e);
                Err(e)
            }
        }
    }

    async fn work_hard(
        &self,
        today: NaiveDate,
        messages: &[String],
        options: &WorkOptions,
    ) -> Result<Vec<PullRequest>> {
        let source = &self.config.source_branch;
        let target = &self.config.target_branch;
        let prod = &self.config.prod_branch;

        self.clone_and_configure().await?;
        self.setup_branches().await?;

        if today.day() == 1 {
            self.cleanup_file().await?;
        }

        for message in messages {
            info!("Write and commit '{}' to {}...", message, source);
            self.append_line(message).await?;
            self.add_commit_push(message, source).await?;
        }

        if !options.open_prs {
            return Ok(vec![]);
        }

        let feature_pr = self
            .create_and_merge_pr(
                source,
                target,
                FEATURE_PR_TITLE,
                &format!("I'm proud, I committed {} changes today.", messages.len()),
            )
            .await?;
        let release_pr = self
            .create_and_merge_pr(target, prod, RELEASE_PR_TITLE, RELEASE_PR_BODY)
            .await?;

        if options.delete_branch {
            self.gh.delete_branch(source).await?;
            self.git.checkout(target).await?;
            self.git.delete_local_branch(source).await?;
        }

        Ok(vec![feature_pr, release_pr])
    }

    /// Bring the target branch up to date and branch the source branch from it.
    async fn setup_branches(&self) -> Result<()> {
        let source = &self.config.source_branch;
        let target = &self.config.target_branch;

        self.check_or_create_branch(target).await?;
        info!("Pulling {} to have recent changes...", target);
        self.git.pull(target).await?;
        info!("Creating {} from {}...", source, target);
        self.check_or_create_branch(source).await
    }

    async fn cleanup_file(&self) -> Result<()> {
        info!("It's the first day of the month, cleaning the file...");
        let path = self.config.file_path();
        tokio::fs::write(&path, "")
            .await
            .with_context(|| format!("Failed to truncate {}", path.display()))?;
        self.add_commit_push(CLEANUP_MESSAGE, &self.config.source_branch)
            .await?;
        Ok(())
    }

    async fn append_line(&self, line: &str) -> Result<()> {
        let path = self.config.file_path();
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn create_and_merge_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        info!("Creating pull request from {} to {}...", head, base);
        let pr = self.gh.pr_create(head, base, title, body).await?;
        self.gh.pr_merge(pr.number).await?;
        Ok(pr)
    }
}
