// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Process invocation seam between the bridge and the Flow binary.
//!
//! Both uses of the checker go through [`CommandRunner`]: launching a
//! long-lived background server (fire-and-track, terminated later through
//! its [`ServerProcess`] handle) and running a one-shot check to
//! completion. Production code uses [`SystemRunner`] over
//! `tokio::process`; tests substitute a scripted runner.

use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, trace};

/// Captured output of a finished one-shot command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

/// Handle to a launched background process.
pub trait ServerProcess: Send {
    /// OS process id, if the process is still attached.
    fn id(&self) -> Option<u32>;

    /// Returns the exit code once the process has exited, `None` while it
    /// is still running. A signal-terminated process reports `-1`.
    fn try_wait(&mut self) -> io::Result<Option<i32>>;

    /// Begins best-effort termination without waiting for the exit.
    fn start_kill(&mut self) -> io::Result<()>;
}

/// Runs external commands on behalf of the bridge.
pub trait CommandRunner: Send + Sync {
    /// Spawns a long-lived background process in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns the spawn error when the program cannot be started
    /// (missing binary, permission failure).
    fn spawn_server(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> io::Result<Box<dyn ServerProcess>>;

    /// Runs `program` to completion in `cwd`, optionally piping `stdin`
    /// into it, and captures both output streams.
    ///
    /// # Errors
    ///
    /// Returns an error when the program cannot be spawned or its output
    /// cannot be collected. A non-zero exit is not an error here; callers
    /// inspect [`CommandOutput::exit_code`].
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        stdin: Option<&str>,
    ) -> impl Future<Output = io::Result<CommandOutput>> + Send;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn spawn_server(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> io::Result<Box<dyn ServerProcess>> {
        debug!("Spawning {} {:?} in {}", program, args, cwd.display());

        // kill_on_drop so a dropped record can never leak a server.
        let child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        Ok(Box::new(TokioServerProcess { child }))
    }

    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        stdin: Option<&str>,
    ) -> io::Result<CommandOutput> {
        trace!("Running {} {:?} in {}", program, args, cwd.display());

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if stdin.is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let mut child = command.spawn()?;
        let stdin_pipe = child.stdin.take();

        // Feed stdin while collecting output so a chatty child cannot
        // deadlock against a full pipe.
        let write_input = async {
            if let (Some(mut pipe), Some(text)) = (stdin_pipe, stdin) {
                pipe.write_all(text.as_bytes()).await?;
                // Close the pipe so the checker sees EOF.
                pipe.shutdown().await?;
            }
            Ok::<_, io::Error>(())
        };

        let (write_result, output) = tokio::join!(write_input, child.wait_with_output());
        write_result?;
        let output = output?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// [`ServerProcess`] over a `tokio::process::Child`.
struct TokioServerProcess {
    child: Child,
}

impl ServerProcess for TokioServerProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn try_wait(&mut self) -> io::Result<Option<i32>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| status.code().unwrap_or(-1)))
    }

    fn start_kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner for exercising the lifecycle manager and lint
    //! surface without touching real processes.

    use super::{CommandOutput, CommandRunner, ServerProcess};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    /// One recorded invocation of the runner.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Invocation {
        pub program: String,
        pub args: Vec<String>,
        pub cwd: PathBuf,
        pub stdin: Option<String>,
    }

    /// Observable state of a spawned fake process.
    #[derive(Debug, Default)]
    pub(crate) struct FakeProcessState {
        /// Flipped by `start_kill`, or by tests simulating a crash.
        pub exited: AtomicBool,
        /// Number of `start_kill` calls received.
        pub kill_count: AtomicUsize,
    }

    struct FakeProcess {
        state: Arc<FakeProcessState>,
    }

    impl ServerProcess for FakeProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        fn try_wait(&mut self) -> io::Result<Option<i32>> {
            if self.state.exited.load(Ordering::SeqCst) {
                Ok(Some(0))
            } else {
                Ok(None)
            }
        }

        fn start_kill(&mut self) -> io::Result<()> {
            self.state.kill_count.fetch_add(1, Ordering::SeqCst);
            self.state.exited.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Runner that records every call and answers from a script.
    #[derive(Default)]
    pub(crate) struct FakeRunner {
        /// Recorded background-server spawns.
        pub spawns: Mutex<Vec<Invocation>>,
        /// Recorded one-shot runs.
        pub runs: Mutex<Vec<Invocation>>,
        /// States of spawned fake processes, in spawn order.
        pub processes: Mutex<Vec<Arc<FakeProcessState>>>,
        /// When set, `spawn_server` fails with `NotFound`.
        pub fail_spawn: AtomicBool,
        /// When set, `run` fails with `NotFound`.
        pub fail_run: AtomicBool,
        /// Stdout handed back by every `run`.
        pub stdout: Mutex<String>,
    }

    impl FakeRunner {
        pub(crate) fn with_stdout(stdout: &str) -> Self {
            let runner = Self::default();
            *runner.stdout.lock().unwrap_or_else(PoisonError::into_inner) = stdout.to_string();
            runner
        }

        pub(crate) fn spawn_count(&self) -> usize {
            self.spawns
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub(crate) fn run_count(&self) -> usize {
            self.runs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub(crate) fn total_kills(&self) -> usize {
            self.processes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|p| p.kill_count.load(Ordering::SeqCst))
                .sum()
        }
    }

    impl CommandRunner for FakeRunner {
        fn spawn_server(
            &self,
            program: &str,
            args: &[String],
            cwd: &Path,
        ) -> io::Result<Box<dyn ServerProcess>> {
            if self.fail_spawn.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such binary"));
            }

            self.spawns
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Invocation {
                    program: program.to_string(),
                    args: args.to_vec(),
                    cwd: cwd.to_path_buf(),
                    stdin: None,
                });

            let state = Arc::new(FakeProcessState::default());
            self.processes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::clone(&state));

            Ok(Box::new(FakeProcess { state }))
        }

        async fn run(
            &self,
            program: &str,
            args: &[String],
            cwd: &Path,
            stdin: Option<&str>,
        ) -> io::Result<CommandOutput> {
            if self.fail_run.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such binary"));
            }

            self.runs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Invocation {
                    program: program.to_string(),
                    args: args.to_vec(),
                    cwd: cwd.to_path_buf(),
                    stdin: stdin.map(ToString::to_string),
                });

            Ok(CommandOutput {
                exit_code: Some(0),
                stdout: self
                    .stdout
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone(),
                stderr: String::new(),
            })
        }
    }
}
