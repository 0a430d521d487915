use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use preflight::{CheckReport, PreflightError};

const NEXUS_EXTENSIONS: &[&str] = &["nex", "nexus", "nxs"];

pub enum CheckOutcome {
    Pass(CheckReport),
    Fail(PreflightError),
}

pub struct CheckResult {
    pub path: PathBuf,
    pub outcome: CheckOutcome,
    /// Lines the checker wrote for this file.
    pub log: Vec<String>,
}

pub fn check_one(path: &Path) -> CheckResult {
    let mut log = Vec::new();
    let outcome = match preflight::validate_file(path, &mut log) {
        Ok(report) => CheckOutcome::Pass(report),
        Err(err) => CheckOutcome::Fail(err),
    };
    CheckResult {
        path: path.to_path_buf(),
        outcome,
        log: String::from_utf8_lossy(&log).lines().map(str::to_string).collect(),
    }
}

fn is_nexus_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| NEXUS_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Discover NEXUS files grouped by subfolder relative to root.
/// Files directly in `root` get group "".
fn discover_grouped(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_files(root, root, &mut groups);
    for files in groups.values_mut() {
        files.sort();
    }
    groups
}

fn collect_files(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "cannot list directory");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        // file_type does not follow symlinks, so a linked directory is never walked
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_files(&path, root, out);
        } else if is_nexus_file(&path) {
            let group = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(group).or_default().push(path);
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

/// Check every NEXUS file under the given directories.
/// Returns exit code: 0 = all pass, 1 = any failure or nothing found.
pub fn check_directories(roots: &[PathBuf], no_color: bool) -> i32 {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for root in roots {
        for (group, files) in discover_grouped(root) {
            let label = if roots.len() > 1 {
                let base = root.display().to_string();
                if group.is_empty() { base } else { format!("{}/{}", base, group) }
            } else {
                group
            };
            groups.entry(label).or_default().extend(files);
        }
    }

    if groups.is_empty() {
        let searched: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
        eprintln!("no NEXUS files found in {}", searched.join(", "));
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<CheckResult> = Vec::new();

    for (group, files) in &groups {
        let header = if group.is_empty() { "(root)" } else { group.as_str() };
        eprintln!();
        eprintln!("{}", bold(header, no_color));

        for file in files {
            let result = check_one(file);
            let label = file.file_name().and_then(|s| s.to_str()).unwrap_or("?");
            match &result.outcome {
                CheckOutcome::Pass(report) => {
                    passed += 1;
                    let extra = match &report.execute {
                        Some(target) => format!("  (executes {})", target),
                        None => String::new(),
                    };
                    eprintln!("  {}  {}{}", pass_label(no_color), label, extra);
                }
                CheckOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), label);
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let CheckOutcome::Fail(err) = &f.outcome {
                for line in err.to_string().lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    let failed = failures.len();
    eprintln!();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("check result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let bad = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "check result: {}. {} passed, {} failed (of {})",
            bad,
            passed,
            failed,
            passed + failed
        );
        1
    }
}
