#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    /// Write `content` as `bang.config` inside `dir` and return its path.
    pub fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("bang.config");
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `bytes` to `dir/name` and return its path.
    pub fn sample_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    /// A scratch tree with a writable unpack directory and a non-empty
    /// sample file to scan. Removed when dropped.
    pub struct Workspace {
        dir: TempDir,
        pub unpack: PathBuf,
        pub sample: PathBuf,
    }

    impl Workspace {
        pub fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let unpack = dir.path().join("unpack");
            fs::create_dir(&unpack).unwrap();
            let sample = sample_file(dir.path(), "sample.bin", b"\x7fELF\x02\x01\x01");
            Self {
                dir,
                unpack,
                sample,
            }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        /// Config file pointing the unpack directory at this workspace,
        /// followed by `extra` lines in the `[configuration]` section.
        pub fn config(&self, extra: &str) -> PathBuf {
            let content = format!(
                "[configuration]\nbaseunpackdirectory = {}\n{extra}",
                self.unpack.display()
            );
            write_config(self.root(), &content)
        }
    }

    #[test]
    fn workspace_layout() {
        let ws = Workspace::new();
        assert!(ws.unpack.is_dir());
        assert!(fs::metadata(&ws.sample).unwrap().len() > 0);
        let cfg = fs::read_to_string(ws.config("threads = 2\n")).unwrap();
        assert!(cfg.contains("baseunpackdirectory"));
        assert!(cfg.ends_with("threads = 2\n"));
    }
}
