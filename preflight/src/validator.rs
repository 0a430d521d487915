use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use nexus::parser::Parser;

use crate::checker::{CheckReport, check_document};
use crate::error::PreflightError;

/// Read a NEXUS document from `reader` and run the autoclose check on it.
///
/// `path` is only used in messages, so the reader may come from anywhere
/// the file lives. Parse warnings are written to `out` before the check runs.
pub fn validate_reader<R: Read>(
    mut reader: R,
    path: &Path,
    out: &mut dyn Write,
) -> Result<CheckReport, PreflightError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| PreflightError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let parser = Parser::new(text, 0);
    let document = match parser.parse() {
        Ok(document) => document,
        Err(diagnostics) => {
            let message = diagnostics
                .first()
                .map(|d| d.describe(parser.source()))
                .unwrap_or_else(|| "invalid NEXUS syntax".to_string());
            tracing::debug!(path = %path.display(), errors = diagnostics.len(), "NEXUS parse failed");
            return Err(PreflightError::Parse {
                path: path.to_path_buf(),
                message,
                diagnostics,
                text: parser.source().to_string(),
            });
        }
    };

    for warning in &document.warnings {
        writeln!(out, "warning: {}", warning.describe(parser.source()))?;
    }

    tracing::debug!(
        path = %path.display(),
        blocks = document.blocks.len(),
        "parsed NEXUS file"
    );
    check_document(&document, path, out)
}

/// Open `path` and validate it. The file is closed on every return path.
pub fn validate_file(path: &Path, out: &mut dyn Write) -> Result<CheckReport, PreflightError> {
    let _span = tracing::info_span!("validate", path = %path.display()).entered();

    let file = File::open(path).map_err(|source| PreflightError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = validate_reader(BufReader::new(file), path, out);

    match &result {
        Ok(report) => tracing::info!(nowarn = report.nowarn, "mrbayes block check passed"),
        Err(err) => tracing::info!(error = %err, "mrbayes block check failed"),
    }
    result
}
