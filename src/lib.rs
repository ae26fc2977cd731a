use clap::ValueEnum;

pub mod catalog;
pub mod compare;
pub mod error;
pub mod labels;
pub mod packs;
pub mod records;
pub mod report;
pub mod runmeta;
pub mod schema;
pub mod store;
pub mod units;

pub use catalog::Catalog;
pub use error::{ReportError, Result};

/// Measurement intensity of one benchmark run.
///
/// Quick runs use reduced iteration counts for fast feedback; full runs use
/// the harness default job settings and are the ones meant for publishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    Quick,
    Full,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Quick => "quick",
            RunMode::Full => "full",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating systems the dashboard tracks, one result slot per run mode each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OsName {
    Windows,
    Linux,
    Macos,
}

impl OsName {
    pub const ALL: [OsName; 3] = [OsName::Windows, OsName::Linux, OsName::Macos];

    pub fn as_str(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Linux => "linux",
            OsName::Macos => "macos",
        }
    }

    /// The OS this process is running on, when it is one the dashboard tracks.
    pub fn from_host() -> Option<OsName> {
        match std::env::consts::OS {
            "windows" => Some(OsName::Windows),
            "linux" => Some(OsName::Linux),
            "macos" => Some(OsName::Macos),
            _ => None,
        }
    }
}

impl std::fmt::Display for OsName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
