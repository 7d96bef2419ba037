//! The options bag and the frozen options handed to the rest of the scanner.
//!
//! [`OptionsBag`] holds raw layer values while defaults, the config file, and
//! the command line are applied on top of each other. Every field always holds
//! exactly one value; a later layer replaces it wholesale via [`Setting`].
//! Validation turns the bag into [`ScanOptions`], which cannot be constructed
//! outside this crate.

use std::path::PathBuf;

use serde::Serialize;

/// Mutable intermediate state of option resolution.
///
/// Field types are the raw layer types: integers stay signed so a bad
/// `threads` value from the config file survives until validation heals it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsBag {
    pub base_unpack_directory: String,
    pub temporary_directory: Option<String>,
    pub thread_count: i64,
    pub remove_scan_directory: bool,
    pub create_byte_counter: bool,
    pub tlsh_maximum: i64,
    pub write_report: bool,
    pub use_logging: bool,
    pub use_database: bool,
    pub db_error_fatal: bool,
    pub db_host: Option<String>,
    pub db_port: Option<i64>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    pub check_directory: Option<PathBuf>,
    pub check_file: Option<PathBuf>,
}

/// A single typed overwrite of one bag field.
///
/// The variants double as constructors in the binding table, so the compiler
/// checks that every binding's coercion kind matches its field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    BaseUnpackDirectory(String),
    TemporaryDirectory(String),
    ThreadCount(i64),
    RemoveScanDirectory(bool),
    CreateByteCounter(bool),
    TlshMaximum(i64),
    WriteReport(bool),
    UseLogging(bool),
    DbErrorFatal(bool),
    DbHost(String),
    DbPort(i64),
    DbUser(String),
    DbPassword(String),
    DbName(String),
}

impl OptionsBag {
    /// Replace the field named by `setting`.
    pub fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::BaseUnpackDirectory(v) => self.base_unpack_directory = v,
            Setting::TemporaryDirectory(v) => self.temporary_directory = Some(v),
            Setting::ThreadCount(v) => self.thread_count = v,
            Setting::RemoveScanDirectory(v) => self.remove_scan_directory = v,
            Setting::CreateByteCounter(v) => self.create_byte_counter = v,
            Setting::TlshMaximum(v) => self.tlsh_maximum = v,
            Setting::WriteReport(v) => self.write_report = v,
            Setting::UseLogging(v) => self.use_logging = v,
            Setting::DbErrorFatal(v) => self.db_error_fatal = v,
            Setting::DbHost(v) => self.db_host = Some(v),
            Setting::DbPort(v) => self.db_port = Some(v),
            Setting::DbUser(v) => self.db_user = Some(v),
            Setting::DbPassword(v) => self.db_password = Some(v),
            Setting::DbName(v) => self.db_name = Some(v),
        }
    }
}

/// Database connection settings. Only meaningful when
/// [`ScanOptions::use_database`] is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct DatabaseOptions {
    pub host: Option<String>,
    pub port: Option<i64>,
    pub user: Option<String>,
    /// Not serialized: the JSON printed by `bang-scanner` never carries it.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Fully resolved and validated scanner options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ScanOptions {
    pub base_unpack_directory: PathBuf,
    pub temporary_directory: Option<PathBuf>,
    pub remove_scan_directory: bool,
    pub create_byte_counter: bool,
    pub tlsh_maximum: i64,
    /// Always at least 1.
    pub thread_count: usize,
    pub write_report: bool,
    pub use_logging: bool,
    /// Derived: true only when database name, user, and password are all set.
    pub use_database: bool,
    pub db_error_fatal: bool,
    pub database: DatabaseOptions,
    pub check_directory: Option<PathBuf>,
    pub check_file: Option<PathBuf>,
}
