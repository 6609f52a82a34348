use crate::config::StatsConfig;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitstats")]
#[command(about = "Contribution statistics for git repositories: commits and line changes per day and per contributor")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Branch used to discover contributors (defaults to origin/HEAD)")]
    pub branch: Option<String>,

    #[arg(long, short = 'j', help = "Contributors processed concurrently, 0 for no limit")]
    pub jobs: Option<usize>,

    #[arg(long, help = "git executable to invoke", default_value = "git")]
    pub git: PathBuf,
}

impl CommonArgs {
    pub fn repo_path(&self) -> Result<PathBuf> {
        match &self.repo {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    pub fn config(&self) -> StatsConfig {
        let mut config = StatsConfig::new().with_git_binary(self.git.clone());
        if let Some(branch) = &self.branch {
            config = config.with_branch(branch.clone());
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrency(jobs);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full statistics: commit series plus every contributor
    Stats {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output contributors as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Stream progress events as NDJSON while computing")]
        events: bool,
    },
    /// Contributors of the default branch, most commits first
    Contributors {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Repository-wide commits per day
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Statistics for a single contributor
    Contributor {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(help = "Author name as recorded in commits")]
        name: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Stats { json, ndjson, events } => {
                crate::stats::exec::stats(self.common, json, ndjson, events).await
            }
            Commands::Contributors { json } => crate::stats::exec::contributors(self.common, json).await,
            Commands::Commits { json, ndjson } => crate::stats::exec::commits(self.common, json, ndjson).await,
            Commands::Contributor { json, name } => {
                crate::stats::exec::contributor(self.common, &name, json).await
            }
        }
    }
}
