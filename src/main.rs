use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use superdev::App;
use superdev::Config;
use superdev::commands::work::WorkOptions;
use superdev::ops::git::RealGit;
use superdev::ops::github::RealGithub;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Parser)]
#[command(name = "superdev")]
#[command(about = "Keep a GitHub repository busy with generated commits and pull requests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub config: Config,

    /// Seed the random draws for a reproducible run
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit on the source branch and merge it up to prod (default)
    Work {
        /// Only commit and push, without pull requests
        #[arg(long)]
        no_pr: bool,
        /// Keep the source branch after merging
        #[arg(long)]
        keep_branch: bool,
    },
    /// Commit straight to one branch, replacing the file each time
    Push {
        /// Branch to push to (defaults to the source branch)
        #[arg(short, long)]
        branch: Option<String>,
    },
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    cli.config.validate()?;
    let (owner, repo) = cli.config.repository()?;

    let app = App::new(
        cli.config.clone(),
        RealGit::new(cli.config.data_folder.clone()),
        RealGithub::new(owner, repo, cli.config.github_token.clone()),
    );

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command {
        Some(Commands::Work { no_pr, keep_branch }) => {
            let options = WorkOptions {
                open_prs: !no_pr,
                delete_branch: !keep_branch,
                ..WorkOptions::default()
            };
            let today = chrono::Local::now().date_naive();
            app.cmd_work(&mut rng, today, &options, &mut std::io::stdout())
                .await?;
        }
        Some(Commands::Push { branch }) => {
            let branch = branch.unwrap_or_else(|| app.config.source_branch.clone());
            app.cmd_push(&mut rng, &branch, &mut std::io::stdout())
                .await?;
        }
        None => {
            let today = chrono::Local::now().date_naive();
            app.cmd_work(
                &mut rng,
                today,
                &WorkOptions::default(),
                &mut std::io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment and flags still apply.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => {
            eprintln!("Failed to load .env: {}", e);
            std::process::exit(1);
        }
    }
    let cli = Cli::parse();

    if let Err(e) = setup_logging() {
        eprintln!("Failed to set up logging: {:#}", e);
    }

    if let Err(e) = run(cli).await {
        error!("An error occurred: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "superdev",
            "work",
            "--no-pr",
            "--repository-url",
            "https://github.com/octo/activity",
            "--github-token",
            "abc",
            "--seed",
            "4",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Work {
                no_pr: true,
                keep_branch: false
            })
        ));
        assert_eq!(cli.config.repository_url, "https://github.com/octo/activity");
        assert_eq!(cli.config.github_token, "abc");
        assert_eq!(cli.seed, Some(4));
        cli.config.validate().unwrap();
    }

    #[test]
    fn test_config_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "superdev",
            "--repository-url",
            "https://github.com/octo/activity",
            "--github-token",
            "abc",
            "push",
            "--branch",
            "main",
            "--source-branch",
            "feature/x",
        ])
        .unwrap();

        let Some(Commands::Push { branch }) = cli.command else {
            panic!("expected push");
        };
        assert_eq!(branch.as_deref(), Some("main"));
        assert_eq!(cli.config.source_branch, "feature/x");
        assert_eq!(cli.config.github_token, "abc");
    }
}
