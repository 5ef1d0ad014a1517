//! Scoped solver process invocation.
//!
//! One invocation owns one temporary working directory holding the
//! netlist and output files; directory and child process are acquired
//! together and released on every exit path, including timeout and
//! crash. Concurrent invocations can never observe each other's files.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured outcome of one solver run.
pub(crate) struct SolverRun {
    pub stdout: String,
    pub stderr: String,
    /// Content of the solver's designated output file, if it wrote one.
    pub output_file: Option<String>,
}

impl SolverRun {
    /// All diagnostic text, for attaching to errors verbatim.
    pub fn diagnostics(&self) -> String {
        let mut text = String::new();
        if !self.stdout.trim().is_empty() {
            text.push_str(self.stdout.trim());
            text.push('\n');
        }
        if !self.stderr.trim().is_empty() {
            text.push_str(self.stderr.trim());
            text.push('\n');
        }
        if let Some(file) = &self.output_file {
            if !file.trim().is_empty() {
                text.push_str(file.trim());
            }
        }
        text
    }
}

/// Join device lines and analysis directives so the directives always
/// start on their own line, whatever the caller's trailing whitespace.
pub(crate) fn with_directives(netlist: &str, directives: &str) -> String {
    format!("{}\n{}", netlist.trim_end(), directives)
}

/// Probe an executable by running it with a version flag.
pub(crate) fn probe(executable: &Path, version_flag: &str) -> bool {
    Command::new(executable)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run one solver invocation: write `netlist` into a fresh temp dir,
/// launch the solver with arguments built from the netlist/output paths,
/// wait with timeout, and collect all output.
///
/// Exit-status failures are returned as [`Error::SolverFailed`] with
/// diagnostics attached; adapters reclassify them into syntax or
/// convergence errors from the diagnostic text.
pub(crate) fn invoke(
    backend: &str,
    config: &BackendConfig,
    netlist: &str,
    output_name: &str,
    build_args: impl FnOnce(&Path, &Path) -> Vec<PathBuf>,
) -> Result<SolverRun> {
    let dir = TempDir::new().map_err(|e| Error::Workspace(e.to_string()))?;

    let netlist_path = dir.path().join("circuit.cir");
    let output_path = dir.path().join(output_name);

    // Solvers require a terminating .end line. Note .ENDS (subcircuit
    // terminator) does not count.
    let has_end = netlist
        .lines()
        .any(|l| l.trim().eq_ignore_ascii_case(".end"));
    let netlist = if has_end {
        netlist.to_string()
    } else {
        format!("{}\n.end\n", netlist.trim_end())
    };
    std::fs::write(&netlist_path, netlist).map_err(|e| Error::Workspace(e.to_string()))?;

    let args = build_args(&netlist_path, &output_path);
    debug!(backend, executable = %config.executable.display(), "spawning solver");

    let child = Command::new(&config.executable)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::BackendUnavailable {
            backend: backend.to_string(),
            reason: e.to_string(),
        })?;

    let output = wait_with_timeout(backend, child, config.timeout)?;
    let status = output.status;

    let run = SolverRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        output_file: std::fs::read(&output_path)
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    };
    debug!(backend, code = status.code(), "solver exited");

    if !status.success() {
        return Err(classify_failure(backend, &run, status.code()));
    }
    Ok(run)
    // `dir` drops here: netlist and output files are removed on every
    // path, success or error alike.
}

/// Wait for a child process with a wall-clock budget. On timeout the
/// child is killed and reaped before the error is returned.
fn wait_with_timeout(backend: &str, mut child: Child, timeout: Duration) -> Result<Output> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();
                let stderr = child
                    .stderr
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        std::io::Read::read_to_end(&mut s, &mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();

                return Ok(Output {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::SimulationTimeout {
                        backend: backend.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(Error::SolverFailed {
                    backend: backend.to_string(),
                    diagnostics: e.to_string(),
                })
            }
        }
    }
}

/// Map a failed exit to the uniform error taxonomy from the diagnostic
/// text the solver printed.
fn classify_failure(backend: &str, run: &SolverRun, code: Option<i32>) -> Error {
    let diagnostics = run.diagnostics();
    let lower = diagnostics.to_lowercase();

    const SYNTAX_MARKERS: &[&str] = &[
        "syntax error",
        "parse error",
        "unknown device",
        "unknown model",
        "undefined model",
        "error on line",
        "unable to find definition",
    ];
    const DIVERGENCE_MARKERS: &[&str] = &[
        "no convergence",
        "convergence failed",
        "failed to converge",
        "singular matrix",
        "timestep too small",
        "gmin stepping failed",
    ];

    let diagnostics = format!(
        "exit code {}: {}",
        code.map(|c| c.to_string()).unwrap_or_else(|| "none".into()),
        diagnostics
    );

    if SYNTAX_MARKERS.iter().any(|m| lower.contains(m)) {
        Error::NetlistSyntax {
            backend: backend.to_string(),
            diagnostics,
        }
    } else if DIVERGENCE_MARKERS.iter().any(|m| lower.contains(m)) {
        Error::SimulationDivergence {
            backend: backend.to_string(),
            diagnostics,
        }
    } else {
        Error::SolverFailed {
            backend: backend.to_string(),
            diagnostics,
        }
    }
}
