// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded subprocess execution.
//
// Every external tool the pipeline touches (office converter, host spooler
// queries) goes through `BoundedCommand`: stdin closed, stdout/stderr
// captured, optional wall-clock limit, no console window on Windows. A child
// that outlives its limit is killed when the wait future is dropped.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use printall_core::error::{PrintAllError, Result};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// `CREATE_NO_WINDOW` process creation flag.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Wall-clock limit. `None` waits for as long as the program runs.
    pub timeout: Option<Duration>,
}

/// What a finished (or abandoned) invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` if the process timed out or was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl ProcessOutput {
    /// Exit code 0 within the time limit.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Trimmed stderr, or trimmed stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// One-line description of why the invocation did not succeed.
    pub fn failure_reason(&self) -> String {
        let cause = if self.timed_out {
            format!("timed out after {}s", self.elapsed.as_secs())
        } else {
            match self.exit_code {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            }
        };
        let detail = self.diagnostic();
        if detail.is_empty() {
            cause
        } else {
            format!("{cause}: {detail}")
        }
    }
}

impl BoundedCommand {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().as_os_str().to_os_string(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run the program to completion or until the time limit expires.
    ///
    /// Only a failure to start the program is an `Err`; a non-zero exit or a
    /// timeout is reported through [`ProcessOutput`].
    #[instrument(skip(self), fields(program = %self.program_name()))]
    pub async fn run(&self) -> Result<ProcessOutput> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let started = Instant::now();
        let child = command.spawn().map_err(|err| PrintAllError::ProcessLaunch {
            program: self.program_name(),
            reason: err.to_string(),
        })?;

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output()).await,
            None => Ok(child.wait_with_output().await),
        };

        let output = match waited {
            Ok(result) => result?,
            Err(_) => {
                // Dropping the wait future dropped the child, which kills it.
                let elapsed = started.elapsed();
                warn!(elapsed_ms = elapsed.as_millis() as u64, "Process timed out");
                return Ok(ProcessOutput {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: String::new(),
                    timed_out: true,
                    elapsed,
                });
            }
        };

        let result = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            timed_out: false,
            elapsed: started.elapsed(),
        };
        debug!(
            exit_code = ?result.exit_code,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Process finished"
        );
        Ok(result)
    }
}
