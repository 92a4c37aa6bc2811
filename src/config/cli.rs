use crate::domain::ports::Storage;
use crate::utils::error::{RedateError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local filesystem storage. Relative paths resolve against `base_path` when set.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: Option<PathBuf>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self { base_path: None }
    }

    pub fn with_base_path<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RedateError::FileNotFound {
                path: full_path.display().to_string(),
            },
            _ => RedateError::IoError(e),
        })
    }

    /// 先寫暫存檔再改名，失敗時不會留下半個輸出檔
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut partial = full_path.clone().into_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let written = fs::write(&partial, data).and_then(|_| fs::rename(&partial, &full_path));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_path(dir.path());

        storage
            .write_file(Path::new("nested/out_gmst.skd"), b"$EXPER R4999\n")
            .unwrap();

        assert_eq!(
            storage.read_file(Path::new("nested/out_gmst.skd")).unwrap(),
            b"$EXPER R4999\n"
        );
        assert!(!dir.path().join("nested/out_gmst.skd.part").exists());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_path(dir.path());
        // 目標位置是非空目錄，改名會失敗
        fs::create_dir_all(dir.path().join("taken.skd/inner")).unwrap();

        let err = storage
            .write_file(Path::new("taken.skd"), b"$EXPER R4999\n")
            .unwrap_err();

        assert!(matches!(err, RedateError::IoError(_)));
        assert!(!dir.path().join("taken.skd.part").exists());
        assert!(dir.path().join("taken.skd").is_dir());
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new();

        let err = storage
            .read_file(&dir.path().join("missing.skd"))
            .unwrap_err();
        assert!(matches!(err, RedateError::FileNotFound { .. }));
    }
}
