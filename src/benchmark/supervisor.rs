// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/supervisor.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file runs one mining program for a fixed time. Output goes to the log
// file (captured stdout/stderr, or the program's own log flag); after the wait
// the child is killed and reaped and the log is handed back for parsing. The
// exit status is never consulted since killed miners exit non-zero.
//
// Tree Location:
// - src/benchmark/supervisor.rs (child process lifecycle)
// - Depends on: tokio, benchmark::invocation

use crate::benchmark::invocation::Invocation;
use crate::error::StatsError;
use crate::Result;
use log::{debug, info, warn};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const LOG_TARGET: &str = "miner_stats::supervisor";

/// Lifecycle of a single benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopping,
    Reaped,
    Parsing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Stopping => "stopping",
            Phase::Reaped => "reaped",
            Phase::Parsing => "parsing",
        };
        f.write_str(name)
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
pub async fn operator_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: LOG_TARGET, "Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

pub struct Supervisor {
    phase: Phase,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn transition(&mut self, next: Phase) {
        debug!(target: LOG_TARGET, "{} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Run the program for `wait`, stopping early on Ctrl-C
    pub async fn run(&mut self, invocation: &Invocation, wait: Duration) -> Result<File> {
        self.run_until(invocation, wait, operator_interrupt()).await
    }

    /// Run the program for `wait` or until `interrupt` resolves, whichever is
    /// first. On interrupt the child is still killed and reaped, then
    /// `Interrupted` is returned. On success the log is returned positioned
    /// at its start, ready for parsing.
    pub async fn run_until<F>(
        &mut self,
        invocation: &Invocation,
        wait: Duration,
        interrupt: F,
    ) -> Result<File>
    where
        F: Future<Output = ()>,
    {
        let mut command = Command::new(&invocation.program);
        #[cfg(unix)]
        command.arg0(invocation.display_name());
        command
            .args(invocation.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let captured = if invocation.native_log {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            None
        } else {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&invocation.log_path)
                .map_err(|e| self.io_error(invocation, e))?;
            let stdout = file.try_clone().map_err(|e| self.io_error(invocation, e))?;
            let stderr = file.try_clone().map_err(|e| self.io_error(invocation, e))?;
            command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
            Some(file)
        };

        debug!(target: LOG_TARGET, "Launching {:?} {:?}", invocation.program, invocation.args());
        let mut child = command.spawn().map_err(|e| StatsError::MinerLaunchFailed {
            path: invocation.program.clone(),
            source: e,
        })?;
        self.transition(Phase::Running);

        info!(target: LOG_TARGET, "⏳ Waiting for statistics ({}s)...", wait.as_secs());
        let interrupted = tokio::select! {
            _ = tokio::time::sleep(wait) => false,
            _ = interrupt => true,
        };

        self.transition(Phase::Stopping);
        if let Err(e) = child.start_kill() {
            debug!(target: LOG_TARGET, "Kill signal not delivered: {}", e);
        }
        let name = invocation.display_name();
        match child.wait().await {
            Ok(status) => debug!(target: LOG_TARGET, "{} exited with {}", name, status),
            Err(e) => warn!(target: LOG_TARGET, "Failed to reap {}: {}", name, e),
        }
        self.transition(Phase::Reaped);

        if interrupted {
            warn!(target: LOG_TARGET, "🛑 Interrupted; {} stopped", invocation.display_name());
            self.transition(Phase::Idle);
            return Err(StatsError::Interrupted);
        }

        let log = match captured {
            Some(mut file) => {
                file.seek(SeekFrom::Start(0))
                    .map_err(|e| self.io_error(invocation, e))?;
                file
            }
            None => File::open(&invocation.log_path).map_err(|e| StatsError::LogUnavailable {
                path: invocation.log_path.clone(),
                source: e,
            })?,
        };
        self.transition(Phase::Parsing);
        Ok(log)
    }

    /// Parsing is done; ready for the next run
    pub fn finish(&mut self) {
        self.transition(Phase::Idle);
    }

    fn io_error(&self, invocation: &Invocation, source: std::io::Error) -> StatsError {
        StatsError::Io {
            path: invocation.log_path.clone(),
            source,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Read;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-miner.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn invocation(program: PathBuf, log_path: PathBuf, native_log: bool) -> Invocation {
        Invocation {
            program,
            argv: vec!["fake-miner".to_string(), "-a".to_string(), "scrypt".to_string()],
            log_path,
            native_log,
        }
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let dir = tempdir().unwrap();
        let program = script(dir.path(), "echo \"algo $2\"\necho oops 1>&2\nexec sleep 30");
        let inv = invocation(program, dir.path().join("out.txt"), false);

        let mut supervisor = Supervisor::new();
        let mut log = supervisor.run(&inv, Duration::from_secs(1)).await.unwrap();
        assert_eq!(supervisor.phase(), Phase::Parsing);

        let mut text = String::new();
        log.read_to_string(&mut text).unwrap();
        assert!(text.contains("algo scrypt"));
        assert!(text.contains("oops"));

        supervisor.finish();
        assert_eq!(supervisor.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_native_log_is_opened_after_reap() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("native.txt");
        let program = script(
            dir.path(),
            &format!("echo \"Total: 5 MH/s\" > {}\nexec sleep 30", log_path.display()),
        );
        let inv = invocation(program, log_path, true);

        let mut log = Supervisor::new().run(&inv, Duration::from_secs(1)).await.unwrap();
        let mut text = String::new();
        log.read_to_string(&mut text).unwrap();
        assert_eq!(text.trim(), "Total: 5 MH/s");
    }

    #[tokio::test]
    async fn test_missing_native_log() {
        let dir = tempdir().unwrap();
        let program = script(dir.path(), "exec sleep 30");
        let inv = invocation(program, dir.path().join("never.txt"), true);

        let result = Supervisor::new().run(&inv, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(StatsError::LogUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let dir = tempdir().unwrap();
        let inv = invocation(
            dir.path().join("does-not-exist"),
            dir.path().join("out.txt"),
            false,
        );
        let result = Supervisor::new().run(&inv, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(StatsError::MinerLaunchFailed { .. })));
    }

    #[tokio::test]
    async fn test_interrupt_kills_child() {
        let dir = tempdir().unwrap();
        let program = script(dir.path(), "echo started\nexec sleep 30");
        let inv = invocation(program, dir.path().join("out.txt"), false);

        let mut supervisor = Supervisor::new();
        let started = std::time::Instant::now();
        let result = supervisor
            .run_until(&inv, Duration::from_secs(30), async {
                tokio::time::sleep(Duration::from_millis(200)).await
            })
            .await;
        assert!(matches!(result, Err(StatsError::Interrupted)));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(supervisor.phase(), Phase::Idle);
    }
}

// Changelog:
// - v1.0.1 (2025-07-05): Ctrl-C now kills and reaps the running miner.
//   - Children are spawned with kill_on_drop so an early return cannot
//     orphan a miner that keeps the GPU busy.
// - v1.0.0 (2025-07-02): Initial process supervisor.
