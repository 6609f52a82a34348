use crate::error::CommandError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Executes a git query against a repository and hands back its raw output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, repo: &Path, args: &[String]) -> Result<Vec<u8>, CommandError>;
}

/// Runs queries through the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: PathBuf,
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_binary("git")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitCli {
    async fn run(&self, repo: &Path, args: &[String]) -> Result<Vec<u8>, CommandError> {
        let joined = args.join(" ");
        tracing::debug!(repo = %repo.display(), "running git {joined}");

        let output = Command::new(&self.binary)
            .arg("--no-pager")
            .arg("-C")
            .arg(repo)
            .args(args)
            .env("GIT_PAGER", "cat")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                args: joined.clone(),
                source,
            })?;

        // stderr goes after stdout so diagnostics never split a record
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            let code = output.status.code();
            tracing::debug!(?code, "git {joined} failed");
            return Err(CommandError::Failed {
                args: joined,
                code,
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }

        if combined.is_empty() {
            return Err(CommandError::EmptyOutput { args: joined });
        }

        Ok(combined)
    }
}
