use std::fmt;

use crate::block::command::Command;

/// A yes/no setting that may also be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Switch {
    #[default]
    Unset,
    On,
    Off,
}

impl Switch {
    /// Parse a setting value: `yes`/`true` or `no`/`false`, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Switch> {
        let value = value.to_ascii_lowercase();
        match value.as_str() {
            "yes" | "true" => Some(Switch::On),
            "no" | "false" => Some(Switch::Off),
            _ => None,
        }
    }

    /// Only an explicit `yes` counts. `Unset` behaves like `Off`.
    pub fn is_on(self) -> bool {
        self == Switch::On
    }

    pub fn is_set(self) -> bool {
        self != Switch::Unset
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Switch::Unset => write!(f, "unset"),
            Switch::On => write!(f, "yes"),
            Switch::Off => write!(f, "no"),
        }
    }
}

/// The settings of a `BEGIN mrbayes;` block that matter for unattended runs.
#[derive(Debug, Clone, Default)]
pub struct MrBayesBlock {
    /// Quit without prompting once the analysis is done.
    pub autoclose: Switch,
    /// Suppress warnings that would otherwise stop and ask.
    pub nowarn: Switch,
    /// Command file pulled in with `execute`, as written. May be blank.
    pub execute: Option<String>,
    /// All commands of the block in source order.
    pub commands: Vec<Command>,
}

impl MrBayesBlock {
    /// The `execute` target with surrounding whitespace removed, if it is not blank.
    pub fn execute_target(&self) -> Option<&str> {
        self.execute
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

/// Commands MrBayes accepts inside its block.
pub(crate) const COMMANDS: &[&str] = &[
    "about",
    "acknowledgments",
    "bandwidth",
    "calibrate",
    "charset",
    "charstat",
    "citations",
    "comparetree",
    "constraint",
    "ctype",
    "databreaks",
    "delete",
    "disclaimer",
    "exclude",
    "execute",
    "help",
    "include",
    "link",
    "log",
    "lset",
    "manual",
    "mcmc",
    "mcmcp",
    "outgroup",
    "pairs",
    "partition",
    "plot",
    "prset",
    "propset",
    "quit",
    "report",
    "restore",
    "set",
    "showbeagle",
    "showmatrix",
    "showmcmctrees",
    "showmodel",
    "showmoves",
    "showparams",
    "showusertrees",
    "speciespartition",
    "ss",
    "ssp",
    "startvals",
    "sump",
    "sumss",
    "sumt",
    "taxastat",
    "taxset",
    "unlink",
    "usertree",
    "version",
];

/// Options of the `set` command.
pub(crate) const SET_OPTIONS: &[&str] = &[
    "autoclose",
    "autoreplace",
    "beagledevice",
    "beaglefreq",
    "beagleopenmp",
    "beagleprecision",
    "beaglescaling",
    "beaglesse",
    "beaglethreads",
    "dir",
    "nowarn",
    "partition",
    "precision",
    "quitonerror",
    "scientific",
    "seed",
    "speciespartition",
    "swapseed",
    "usebeagle",
];

pub(crate) fn is_command(word: &str) -> bool {
    COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(word))
}

pub(crate) fn is_set_option(word: &str) -> bool {
    SET_OPTIONS.iter().any(|o| o.eq_ignore_ascii_case(word))
}
