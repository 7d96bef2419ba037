//! Layered option resolution for the BANG binary scanner.
//!
//! Before the scanner unpacks anything it needs one settled answer to three
//! questions: what to scan, where to unpack, and whether (and how) to talk to
//! the database. This crate produces that answer as a frozen [`ScanOptions`]
//! value, resolved once at startup and read-only afterward.
//!
//! ```ignore
//! let options = OptionsLoader::new().load_from(std::env::args_os())?;
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Built-in defaults     thread count = available parallelism, report = on, ...
//!        ↑ overridden by
//! Config file           [configuration] / [database] keys, see `bindings`
//!        ↑ overridden by
//! Command line          -f/--file, -d/--directory
//! ```
//!
//! Each option holds exactly one value at a time. A layer that provides a
//! value replaces the previous one outright; there is no merging inside an
//! option. The config file is sparse: keys it does not mention, or mentions
//! with a value that does not coerce, fall through to the default. The command
//! line is not sparse for scan targets: `-f` and `-d` always overwrite, even
//! when absent, because what to scan is decided on the command line alone.
//!
//! # The config file
//!
//! A sectioned key/value file (`bang.config` next to the executable unless
//! `-c/--config` says otherwise). The schema lives in one static table,
//! [`BINDINGS`], mapping `(section, key)` to a typed field setter. Flags are
//! true only for the literal value `yes`.
//!
//! Reading is strict per file and tolerant per field: a file that cannot be
//! opened or parsed stops the run with "Cannot open configuration file", while
//! a non-numeric `threads = many` simply leaves the default in place.
//!
//! # Validation
//!
//! After layering, a fixed sequence of gates runs and the first failure wins:
//!
//! 1. A thread count below 1 is reset to the computed default (the only
//!    correcting rule).
//! 2. `use_database` is derived from database name, user, and password.
//! 3. `dbconnectionerrorfatal = yes` without usable credentials fails.
//! 4. The base unpack directory must be set, exist, be a directory, and be
//!    writable; a configured temporary directory gets the same checks.
//! 5. Exactly one of file and directory must be given, and it must be the
//!    right kind of filesystem object (a scan file must also be non-empty).
//!
//! # Hand-off
//!
//! The `bang-scanner` binary prints the resolved options to stdout as JSON.
//! That output leaves out the database password. A stage that opens the
//! database connection must call [`OptionsLoader`] and read
//! [`DatabaseOptions::password`] from the returned [`ScanOptions`] rather than
//! parse stdout.
//!
//! # Error handling
//!
//! Every failure is an [`OptionsError`] whose message is the text the user
//! sees. Library code never exits the process; the binary hands errors to
//! [`fatal`], which writes them to a sink and returns exit status 1.

pub mod bindings;
pub mod error;
pub mod types;

mod builder;
mod cli;
mod defaults;
mod fatal;
mod file;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use bindings::{Binding, Coerce, BINDINGS};
pub use builder::OptionsLoader;
pub use cli::{check_configuration_file, ScanArgs};
pub use defaults::{default_config_path, default_thread_count, DEFAULT_CONFIG_FILE_NAME};
pub use error::{DirectoryRole, OptionsError, ReadError};
pub use fatal::{fatal, FAILURE_STATUS};
pub use file::ConfigSource;
pub use resolve::{resolve, ResolveInput};
pub use types::{DatabaseOptions, OptionsBag, ScanOptions, Setting};
pub use validate::{database_ready, probe_writable, validate};
