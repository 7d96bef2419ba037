//! Built-in defaults: the lowest layer of option resolution.

use std::path::PathBuf;
use std::thread;

use crate::types::OptionsBag;

/// File name of the configuration file looked up next to the executable.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "bang.config";

/// Number of processing threads available to this process, at least 1.
pub fn default_thread_count() -> i64 {
    thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1)
}

/// `bang.config` in the directory holding the running executable.
///
/// Returns `None` when the executable path cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?;
    Some(dir.join(DEFAULT_CONFIG_FILE_NAME))
}

impl OptionsBag {
    /// Default table with an explicit computed thread count.
    pub fn with_thread_default(thread_count: i64) -> Self {
        Self {
            base_unpack_directory: String::new(),
            temporary_directory: None,
            thread_count,
            remove_scan_directory: false,
            create_byte_counter: false,
            tlsh_maximum: i64::MAX,
            write_report: true,
            use_logging: true,
            use_database: false,
            db_error_fatal: false,
            db_host: None,
            db_port: None,
            db_user: None,
            db_password: None,
            db_name: None,
            check_directory: None,
            check_file: None,
        }
    }
}

impl Default for OptionsBag {
    fn default() -> Self {
        Self::with_thread_default(default_thread_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_values() {
        let bag = OptionsBag::with_thread_default(8);
        assert_eq!(bag.base_unpack_directory, "");
        assert_eq!(bag.temporary_directory, None);
        assert_eq!(bag.thread_count, 8);
        assert!(!bag.remove_scan_directory);
        assert!(!bag.create_byte_counter);
        assert_eq!(bag.tlsh_maximum, i64::MAX);
        assert!(bag.write_report);
        assert!(bag.use_logging);
        assert!(!bag.use_database);
        assert!(!bag.db_error_fatal);
        assert_eq!(bag.db_user, None);
        assert_eq!(bag.db_password, None);
        assert_eq!(bag.db_port, None);
        assert_eq!(bag.check_file, None);
        assert_eq!(bag.check_directory, None);
    }

    #[test]
    fn computed_thread_default_is_positive() {
        assert!(default_thread_count() >= 1);
        assert_eq!(OptionsBag::default().thread_count, default_thread_count());
    }

    #[test]
    fn config_path_sits_next_to_executable() {
        let path = default_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), DEFAULT_CONFIG_FILE_NAME);
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.parent(), exe.parent());
    }
}
