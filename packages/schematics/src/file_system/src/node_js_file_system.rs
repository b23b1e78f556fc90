use crate::file_system::src::types::{
    AbsoluteFsPath, FileStats, FileSystem, PathManipulation, ReadonlyFileSystem,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The real, on-disk file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeJSFileSystem;

impl NodeJSFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn normalize_path(&self, path: &str) -> String {
        path.replace('\\', "/")
    }
}

impl PathManipulation for NodeJSFileSystem {
    fn dirname(&self, file: &str) -> String {
        match Path::new(file).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.normalize_path(parent.to_string_lossy().as_ref())
            }
            Some(_) => ".".to_string(),
            // The root is its own parent.
            None => self.normalize_path(file),
        }
    }

    fn join(&self, base_path: &str, paths: &[&str]) -> String {
        let mut path = PathBuf::from(base_path);
        for p in paths {
            path.push(p);
        }
        self.normalize_path(path.to_string_lossy().as_ref())
    }

    fn pwd(&self) -> AbsoluteFsPath {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        AbsoluteFsPath::new(self.normalize_path(cwd.to_string_lossy().as_ref()))
    }
}

impl ReadonlyFileSystem for NodeJSFileSystem {
    fn exists(&self, path: &AbsoluteFsPath) -> bool {
        path.as_path().exists()
    }

    fn read_file(&self, path: &AbsoluteFsPath) -> io::Result<String> {
        fs::read_to_string(path.as_path())
    }

    fn stat(&self, path: &AbsoluteFsPath) -> io::Result<FileStats> {
        let meta = fs::metadata(path.as_path())?;
        Ok(FileStats {
            is_file: meta.is_file(),
            is_directory: meta.is_dir(),
        })
    }
}

impl FileSystem for NodeJSFileSystem {
    fn write_file(&self, path: &AbsoluteFsPath, data: &[u8]) -> io::Result<()> {
        fs::write(path.as_path(), data)
    }

    fn remove_file(&self, path: &AbsoluteFsPath) -> io::Result<()> {
        fs::remove_file(path.as_path())
    }

    fn ensure_dir(&self, path: &AbsoluteFsPath) -> io::Result<()> {
        fs::create_dir_all(path.as_path())
    }
}
