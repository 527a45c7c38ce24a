use std::fs;
use std::path::{Path, PathBuf};

use interfacer_core::RetrofitOptions;
use tempfile::TempDir;

/// An on-disk project with a scan root (`src/`) and an interface root (`api/`).
pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("api")).unwrap();
        Self { dir }
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    pub(crate) fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    /// Options scanning `src/` with interface sources from `api/`.
    pub(crate) fn options(&self) -> RetrofitOptions {
        RetrofitOptions {
            scan_dir: self.dir.path().join("src"),
            interfaces_dir: Some(self.dir.path().join("api")),
            ..RetrofitOptions::default()
        }
    }
}
