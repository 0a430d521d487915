use std::io::Write;
use std::path::Path;

use nexus::NexusDocument;

use crate::error::PreflightError;

pub const AUTOCLOSE_YES: &str = "autoclose=yes";
pub const NOWARN_YES: &str = "nowarn=yes";
pub const NOWARN_NO: &str = "nowarn=no";

/// What a passing check found in the mrbayes block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub nowarn: bool,
    /// Trimmed `execute` target, if one is set and not blank.
    pub execute: Option<String>,
}

/// Check that `document` can run without anyone at the keyboard.
///
/// Fails if there is no `mrbayes` block, or if its `autoclose` is unset or
/// `no`. On success writes `autoclose=yes`, then `nowarn=yes` or `nowarn=no`,
/// then a line naming the `execute` target when there is one. The execute
/// target itself is not checked.
pub fn check_document(
    document: &NexusDocument,
    path: &Path,
    out: &mut dyn Write,
) -> Result<CheckReport, PreflightError> {
    let Some(block) = document.mrbayes_block() else {
        return Err(PreflightError::MissingBlock {
            path: path.to_path_buf(),
        });
    };

    if !block.autoclose.is_on() {
        return Err(PreflightError::AutocloseDisabled {
            path: path.to_path_buf(),
            setting: block.autoclose,
        });
    }

    writeln!(out, "{}", AUTOCLOSE_YES)?;

    let nowarn = block.nowarn.is_on();
    writeln!(out, "{}", if nowarn { NOWARN_YES } else { NOWARN_NO })?;

    let execute = block.execute_target().map(str::to_string);
    if let Some(target) = &execute {
        writeln!(out, "mrbayes block executes external file: {}", target)?;
    }

    Ok(CheckReport { nowarn, execute })
}
