//! Core resolution pipeline: layer the config file and the command line over
//! the defaults.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! layering testable with synthetic inputs. Steps:
//!
//! 1. Start from the default table
//! 2. For each declared binding, overwrite the option if the file provides a
//!    usable value
//! 3. Overwrite the scan targets with the command-line values, absent or not

use std::path::PathBuf;

use tracing::debug;

use crate::bindings::BINDINGS;
use crate::file::ConfigSource;
use crate::types::OptionsBag;

/// All pre-loaded data needed to resolve the options. No I/O happens here.
pub struct ResolveInput {
    /// The parsed configuration file.
    pub source: ConfigSource,
    /// `-f/--file` from the command line.
    pub check_file: Option<PathBuf>,
    /// `-d/--directory` from the command line.
    pub check_directory: Option<PathBuf>,
}

/// Apply the file layer and then the argument layer on top of `defaults`.
pub fn resolve(mut bag: OptionsBag, input: ResolveInput) -> OptionsBag {
    for binding in BINDINGS {
        if let Some(setting) = binding.lookup(&input.source) {
            debug!(
                section = binding.section,
                key = binding.key,
                ?setting,
                "config file overrides default"
            );
            bag.apply(setting);
        }
    }

    // What to scan is decided by the command line alone.
    bag.check_file = input.check_file;
    bag.check_directory = input.check_directory;
    bag
}
