pub mod checker;
pub mod error;
pub mod installation;
pub mod launcher;
pub mod step;
pub mod validator;

pub use checker::{CheckReport, check_document};
pub use error::PreflightError;
pub use installation::{Installation, InstallationRegistry};
pub use launcher::{LaunchRequest, Launcher, ProcessLauncher};
pub use step::{BuildStep, StepOutcome};
pub use validator::{validate_file, validate_reader};
