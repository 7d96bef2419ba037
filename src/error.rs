use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which configured directory a directory check was run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    BaseUnpack,
    Temporary,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryRole::BaseUnpack => f.write_str("Base unpack directory"),
            DirectoryRole::Temporary => f.write_str("Temporary directory"),
        }
    }
}

/// Why a configuration file could not be turned into a [`ConfigSource`](crate::ConfigSource).
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("No configuration file provided, exiting")]
    NoConfigFile,

    #[error("File {} does not exist, exiting.", .path.display())]
    ConfigFileMissing { path: PathBuf },

    #[error("{} is not a regular file, exiting.", .path.display())]
    ConfigFileNotRegular { path: PathBuf },

    #[error("Cannot open configuration file, exiting")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("Missing or invalid database information")]
    MissingDatabaseInfo,

    #[error("Missing base unpack directory")]
    MissingBaseUnpackDirectory,

    #[error("{role} {} does not exist, exiting", .path.display())]
    DirectoryMissing { role: DirectoryRole, path: PathBuf },

    #[error("{role} {} is not a directory, exiting", .path.display())]
    NotADirectory { role: DirectoryRole, path: PathBuf },

    #[error("{role} {} cannot be written to, exiting", .path.display())]
    DirectoryNotWritable {
        role: DirectoryRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No file(s) provided to scan, exiting")]
    NoScanTarget,

    #[error("Cannot scan a directory and a single file, exiting")]
    ConflictingScanTargets,

    #[error("{} is not a directory, exiting.", .path.display())]
    ScanDirectoryInvalid { path: PathBuf },

    #[error("File {} does not exist, exiting.", .path.display())]
    ScanFileMissing { path: PathBuf },

    #[error("{} is not a regular file, exiting.", .path.display())]
    ScanFileNotRegular { path: PathBuf },

    #[error("{} is an empty file, exiting", .path.display())]
    ScanFileEmpty { path: PathBuf },
}

impl OptionsError {
    /// Usage errors are raised before any configuration content is read.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            OptionsError::Usage(_)
                | OptionsError::NoConfigFile
                | OptionsError::ConfigFileMissing { .. }
                | OptionsError::ConfigFileNotRegular { .. }
        )
    }
}
