//! Command-line surface of the scanner.
//!
//! Three flags decide what to scan and where the configuration lives. Parsing
//! never exits the process: clap errors come back as [`OptionsError::Usage`]
//! so the caller reports them through the same path as every other failure.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::OptionsError;

/// Unpack and analyse a single file or a directory of files.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "bang-scanner", version)]
pub struct ScanArgs {
    /// Path to file to check.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to directory with files to check.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Path to configuration file [default: bang.config next to the executable].
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ScanArgs {
    /// Parse `args` (including the program name).
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }

    /// The configuration file to read: `--config`, else `fallback`.
    pub fn config_path(&self, fallback: Option<PathBuf>) -> Option<PathBuf> {
        self.config.clone().or(fallback)
    }
}

/// Reject a configuration path that is absent, missing, or not a regular file.
///
/// Symlinks are followed, so a link to a regular file is accepted while links
/// to directories or devices are not.
pub fn check_configuration_file(path: Option<&Path>) -> Result<(), OptionsError> {
    let path = path.ok_or(OptionsError::NoConfigFile)?;
    let Ok(meta) = fs::metadata(path) else {
        return Err(OptionsError::ConfigFileMissing {
            path: path.to_path_buf(),
        });
    };
    if !meta.is_file() {
        return Err(OptionsError::ConfigFileNotRegular {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
