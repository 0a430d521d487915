use std::path::PathBuf;

use crate::error::PreflightError;

/// A named MrBayes executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// The name build steps refer to.
    pub name: String,
    pub executable: PathBuf,
}

impl Installation {
    pub fn new(name: impl Into<String>, executable: impl Into<PathBuf>) -> Self {
        Installation {
            name: name.into(),
            executable: executable.into(),
        }
    }
}

/// Configured installations, looked up by exact name.
#[derive(Debug, Clone, Default)]
pub struct InstallationRegistry {
    installations: Vec<Installation>,
}

impl InstallationRegistry {
    pub fn new(installations: Vec<Installation>) -> Self {
        InstallationRegistry { installations }
    }

    /// First installation named exactly `name`. Entries without a name never match.
    pub fn find(&self, name: &str) -> Option<&Installation> {
        self.installations
            .iter()
            .filter(|i| !i.name.is_empty())
            .find(|i| i.name == name)
    }

    pub fn resolve(&self, name: &str) -> Result<&Installation, PreflightError> {
        self.find(name)
            .ok_or_else(|| PreflightError::unknown_installation(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Installation> {
        self.installations.iter()
    }

    pub fn len(&self) -> usize {
        self.installations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }
}

/// Reject empty or whitespace-only values for a required field.
pub fn require_non_blank<'a>(value: &'a str, field: &str) -> Result<&'a str, PreflightError> {
    if value.trim().is_empty() {
        Err(PreflightError::blank_field(field))
    } else {
        Ok(value)
    }
}
