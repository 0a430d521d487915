use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::PreflightError;
use crate::installation::{InstallationRegistry, require_non_blank};
use crate::launcher::{LaunchRequest, Launcher};
use crate::validator::validate_file;

/// One MrBayes invocation as configured on a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    /// Name of the installation to run.
    pub installation: String,
    /// NEXUS input, relative to the working directory unless absolute.
    pub input_file: String,
    /// Check the mrbayes block before launching. On by default.
    pub check_block: bool,
}

/// How the external program finished. A non-zero exit is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed { exit_code: i32 },
}

impl StepOutcome {
    pub fn is_success(self) -> bool {
        self == StepOutcome::Succeeded
    }
}

impl BuildStep {
    pub fn new(installation: impl Into<String>, input_file: impl Into<String>) -> Self {
        BuildStep {
            installation: installation.into(),
            input_file: input_file.into(),
            check_block: true,
        }
    }

    pub fn with_block_check(mut self, enabled: bool) -> Self {
        self.check_block = enabled;
        self
    }

    /// Resolve the installation, check the input and run `<executable> <input>`
    /// in `working_dir` with exactly `env` as its environment.
    ///
    /// Progress lines go to `out`. Any configuration or validation problem
    /// aborts before the program is started.
    pub fn perform(
        &self,
        registry: &InstallationRegistry,
        working_dir: &Path,
        env: &BTreeMap<String, String>,
        launcher: &dyn Launcher,
        out: &mut dyn Write,
    ) -> Result<StepOutcome, PreflightError> {
        writeln!(out, "Invoking MrBayes")?;

        let installation = registry.resolve(&self.installation)?;
        let input_file = require_non_blank(&self.input_file, "input file")?;

        if self.check_block {
            validate_file(&working_dir.join(input_file), out)?;
        } else {
            tracing::info!(input = input_file, "mrbayes block check disabled");
        }

        let request = LaunchRequest {
            program: installation.executable.clone(),
            args: vec![input_file.to_string()],
            env: env.clone(),
            working_dir: working_dir.to_path_buf(),
        };
        writeln!(out, "MrBayes command: {}", request.command_line())?;

        let exit_code = launcher
            .launch(&request)
            .map_err(|source| PreflightError::Launch {
                program: request.program.clone(),
                source,
            })?;
        tracing::info!(installation = %installation.name, exit_code, "MrBayes exited");

        if exit_code != 0 {
            writeln!(out, "Error executing MrBayes. Exit code: {}", exit_code)?;
            Ok(StepOutcome::Failed { exit_code })
        } else {
            writeln!(out, "MrBayes finished successfully")?;
            Ok(StepOutcome::Succeeded)
        }
    }
}
