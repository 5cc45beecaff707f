#[cfg(test)]
pub mod fixtures {
    use crate::storage::Fingerprint;
    use crate::utils::hash::{FingerprintAlgorithm, FingerprintStrategy, Md5Digest};
    use anyhow::Result;
    use std::fs;
    use std::io::{self, Read};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// MD5 strategy that fails to open files with the given name, as if permission were denied.
    ///
    /// Permission bits do not stop root, so tests that need an unreadable file use this.
    pub struct DenyingStrategy {
        pub denied_name: &'static str,
    }

    impl FingerprintStrategy for DenyingStrategy {
        fn algorithm(&self) -> FingerprintAlgorithm {
            FingerprintAlgorithm::Md5
        }

        fn fingerprint_bytes(&self, data: &[u8]) -> Fingerprint {
            Md5Digest.fingerprint_bytes(data)
        }

        fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
            Md5Digest.fingerprint_reader(reader)
        }

        fn fingerprint_file(&self, path: &Path) -> io::Result<Fingerprint> {
            if path.file_name().is_some_and(|name| name == self.denied_name) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Md5Digest.fingerprint_file(path)
        }
    }

    /// A monitored directory tree plus a database location outside of it.
    pub struct TestTree {
        pub temp_dir: TempDir,
        pub root: PathBuf,
        pub database: PathBuf,
    }

    impl TestTree {
        pub fn new() -> Result<Self> {
            let temp_dir = tempfile::tempdir()?;
            let root = temp_dir.path().join("monitored");
            let database = temp_dir.path().join("state/fim_database.txt");
            fs::create_dir_all(&root)?;

            Ok(Self {
                temp_dir,
                root,
                database,
            })
        }

        /// Tree with four regular files across nested directories:
        ///
        /// ```text
        /// monitored/
        ///   README
        ///   etc/hosts
        ///   etc/nginx/nginx.conf
        ///   var/www/index.html
        /// ```
        pub fn standard() -> Result<Self> {
            let tree = Self::new()?;
            tree.create_file("README", "monitored tree")?;
            tree.create_file("etc/hosts", "127.0.0.1 localhost")?;
            tree.create_file("etc/nginx/nginx.conf", "worker_processes 4;")?;
            tree.create_file("var/www/index.html", "<h1>hello</h1>")?;
            Ok(tree)
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.root.join(relative)
        }

        /// Snapshot key the scanner produces for `relative`.
        pub fn key(&self, relative: &str) -> String {
            self.path(relative).to_string_lossy().into_owned()
        }

        pub fn create_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
            let path = self.path(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            Ok(path)
        }

        pub fn create_dir(&self, relative: &str) -> Result<PathBuf> {
            let path = self.path(relative);
            fs::create_dir_all(&path)?;
            Ok(path)
        }

        pub fn remove_file(&self, relative: &str) -> Result<()> {
            fs::remove_file(self.path(relative))?;
            Ok(())
        }
    }
}
