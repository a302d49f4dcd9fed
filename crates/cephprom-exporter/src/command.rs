//! Out-of-process command execution.
//!
//! A runner takes a full argv (program name first, as the ceph client expects
//! to see it) and returns the captured output together with the wall-clock
//! window the command ran in. There is no timeout: a hung command holds its
//! task until it exits.

use std::process::Stdio;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;

use cephprom_core::error::{Error, Result};

/// Captured output of a successful (exit status 0) command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl CommandOutput {
    pub fn runtime(&self) -> chrono::Duration {
        self.finished - self.started
    }

    /// Start time plus half the runtime; used to stamp every sample of the run.
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.started + self.runtime() / 2
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput>;
}

/// Spawns real processes. `argv[0]` is passed through as the process name while
/// `executable` is what actually gets executed.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: String,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let command = argv.join(" ");
        let mut cmd = Command::new(&self.executable);
        #[cfg(unix)]
        {
            if let Some(arg0) = argv.first() {
                cmd.arg0(arg0);
            }
        }
        cmd.args(argv.iter().skip(1))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = Utc::now();
        let output = cmd.output().await.map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;
        let finished = Utc::now();

        if !output.status.success() {
            return Err(match output.status.code() {
                Some(status) => Error::CommandFailed {
                    command,
                    status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                },
                None => Error::CommandTerminated { command },
            });
        }

        tracing::trace!(%command, bytes = output.stdout.len(), "command finished");
        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            started,
            finished,
        })
    }
}
