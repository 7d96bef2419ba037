//! Post-resolution validation gates.
//!
//! Gates run in a fixed order and the first failure is returned. Only one rule
//! corrects instead of failing: a thread count below 1 falls back to the
//! computed default. Filesystem checks touch the disk exactly once each, with no
//! retries; a transient error is reported like any other failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{DirectoryRole, OptionsError};
use crate::types::{DatabaseOptions, OptionsBag, ScanOptions};

/// Run every gate over `bag` and freeze it.
///
/// `default_threads` is the computed thread default used to heal a
/// non-positive thread count.
pub fn validate(bag: OptionsBag, default_threads: i64) -> Result<ScanOptions, OptionsError> {
    let mut thread_count = bag.thread_count;
    if thread_count < 1 {
        info!(
            configured = thread_count,
            default = default_threads,
            "thread count below 1, using default"
        );
        thread_count = default_threads.max(1);
    }

    let use_database = database_ready(
        bag.db_name.as_deref(),
        bag.db_user.as_deref(),
        bag.db_password.as_deref(),
    );
    if bag.db_error_fatal && !use_database {
        return Err(OptionsError::MissingDatabaseInfo);
    }
    debug!(use_database, "database gate passed");

    if bag.base_unpack_directory.is_empty() {
        return Err(OptionsError::MissingBaseUnpackDirectory);
    }
    let base_unpack_directory = PathBuf::from(bag.base_unpack_directory);
    check_directory(DirectoryRole::BaseUnpack, &base_unpack_directory)?;

    let temporary_directory = bag.temporary_directory.map(PathBuf::from);
    if let Some(dir) = &temporary_directory {
        check_directory(DirectoryRole::Temporary, dir)?;
    }

    check_scan_targets(bag.check_file.as_deref(), bag.check_directory.as_deref())?;

    Ok(ScanOptions {
        base_unpack_directory,
        temporary_directory,
        remove_scan_directory: bag.remove_scan_directory,
        create_byte_counter: bag.create_byte_counter,
        tlsh_maximum: bag.tlsh_maximum,
        thread_count: usize::try_from(thread_count).unwrap_or(usize::MAX),
        write_report: bag.write_report,
        use_logging: bag.use_logging,
        use_database,
        db_error_fatal: bag.db_error_fatal,
        database: DatabaseOptions {
            host: bag.db_host,
            port: bag.db_port,
            user: bag.db_user,
            password: bag.db_password,
            name: bag.db_name,
        },
        check_directory: bag.check_directory,
        check_file: bag.check_file,
    })
}

/// The database is usable only when name, user, and password are all
/// non-empty. Any `usedatabase` value from the file has no say in this.
pub fn database_ready(name: Option<&str>, user: Option<&str>, password: Option<&str>) -> bool {
    [name, user, password]
        .into_iter()
        .all(|v| v.is_some_and(|s| !s.is_empty()))
}

/// Check that `dir` accepts new files by creating one and removing it again.
///
/// The probe file is removed on every path out of this function: explicitly
/// through `close()` on success, and by drop if anything fails in between.
pub fn probe_writable(dir: &Path) -> io::Result<()> {
    let probe = NamedTempFile::new_in(dir)?;
    probe.close()
}

/// Exists, is a directory, is writable. Each failure has its own message.
fn check_directory(role: DirectoryRole, path: &Path) -> Result<(), OptionsError> {
    if !path.exists() {
        return Err(OptionsError::DirectoryMissing {
            role,
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(OptionsError::NotADirectory {
            role,
            path: path.to_path_buf(),
        });
    }
    probe_writable(path).map_err(|source| OptionsError::DirectoryNotWritable {
        role,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(%role, path = %path.display(), "directory gate passed");
    Ok(())
}

/// Exactly one scan target, and it must be the right kind of thing.
fn check_scan_targets(file: Option<&Path>, directory: Option<&Path>) -> Result<(), OptionsError> {
    match (file, directory) {
        (None, None) => Err(OptionsError::NoScanTarget),
        (Some(_), Some(_)) => Err(OptionsError::ConflictingScanTargets),
        (None, Some(dir)) => {
            let is_dir = fs::metadata(dir).map(|m| m.is_dir()).unwrap_or(false);
            if !is_dir {
                return Err(OptionsError::ScanDirectoryInvalid {
                    path: dir.to_path_buf(),
                });
            }
            Ok(())
        }
        (Some(file), None) => {
            let path = file.to_path_buf();
            let Ok(meta) = fs::metadata(file) else {
                return Err(OptionsError::ScanFileMissing { path });
            };
            if !meta.is_file() {
                return Err(OptionsError::ScanFileNotRegular { path });
            }
            if meta.len() == 0 {
                return Err(OptionsError::ScanFileEmpty { path });
            }
            Ok(())
        }
    }
}
