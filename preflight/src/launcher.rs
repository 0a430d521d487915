use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Everything needed to start the external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// The complete environment of the child. Nothing else is inherited.
    pub env: BTreeMap<String, String>,
    pub working_dir: PathBuf,
}

impl LaunchRequest {
    /// Program and arguments joined by spaces, for the build log.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Starts a program and blocks until it exits.
pub trait Launcher {
    /// Returns the exit code. A child killed by a signal reports -1.
    fn launch(&self, request: &LaunchRequest) -> io::Result<i32>;
}

/// Runs the program as a child process. Its stdout and stderr go to ours.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, request: &LaunchRequest) -> io::Result<i32> {
        tracing::debug!(
            program = %request.program.display(),
            dir = %request.working_dir.display(),
            "spawning"
        );
        let status = Command::new(&request.program)
            .args(&request.args)
            .env_clear()
            .envs(&request.env)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }
}
