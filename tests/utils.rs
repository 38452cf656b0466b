use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Runs git in `dir` and returns its trimmed stdout.
pub async fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Creates a bare "remote" under `root/remote.git` with `main` and `develop`
/// branches holding one README commit, and returns its path.
pub async fn create_remote(root: &Path) -> anyhow::Result<std::path::PathBuf> {
    let remote = root.join("remote.git");
    let seed = root.join("seed");
    tokio::fs::create_dir_all(&remote).await?;
    tokio::fs::create_dir_all(&seed).await?;

    git(&remote, &["init", "--bare", "-b", "main"]).await?;
    git(&seed, &["init", "-b", "main"]).await?;
    git(&seed, &["config", "user.name", "Test User"]).await?;
    git(&seed, &["config", "user.email", "test@example.com"]).await?;
    tokio::fs::write(seed.join("README.md"), "activity\n").await?;
    git(&seed, &["add", "."]).await?;
    git(&seed, &["commit", "-m", "Initial commit"]).await?;
    git(&seed, &["remote", "add", "origin", remote.to_str().unwrap()]).await?;
    git(&seed, &["push", "origin", "main"]).await?;
    git(&seed, &["push", "origin", "main:develop"]).await?;

    Ok(remote)
}

/// Commit subjects of `branch` in a bare repository, newest first.
pub async fn log_subjects(remote: &Path, branch: &str) -> anyhow::Result<Vec<String>> {
    let output = git(remote, &["log", "--format=%s", branch]).await?;
    Ok(output.lines().map(|l| l.to_string()).collect())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_test_writer()
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).try_init()?;
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(std::path::PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}
