use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use crate::file_system::src::types::{
    AbsoluteFsPath, FileStats, FileSystem, PathManipulation, ReadonlyFileSystem,
};
use crate::file_system::src::util::clean_path;

#[derive(Clone, Debug)]
pub enum Entity {
    Folder(Folder),
    File(Vec<u8>),
}

pub type Folder = BTreeMap<String, Entity>;

/// An in-memory POSIX file system.
///
/// Clones share the same tree, so a test can hand one clone to the code under
/// test and inspect the result through another.
#[derive(Clone, Debug)]
pub struct MockFileSystem {
    cwd: Arc<Mutex<AbsoluteFsPath>>,
    file_tree: Arc<Mutex<Folder>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        MockFileSystem {
            cwd: Arc::new(Mutex::new(AbsoluteFsPath::new("/"))),
            file_tree: Arc::new(Mutex::new(Folder::new())),
        }
    }

    /// Populate the tree, creating parent folders as needed.
    pub fn init_with_files(&self, files: &[(&str, &str)]) {
        for (path, content) in files {
            let path = AbsoluteFsPath::new(clean_path(path));
            let dir = AbsoluteFsPath::new(self.dirname(path.as_str()));
            self.ensure_dir(&dir).unwrap();
            self.write_file(&path, content.as_bytes()).unwrap();
        }
    }

    /// Every file in the tree, sorted, as absolute paths.
    pub fn files(&self) -> Vec<String> {
        fn walk(prefix: &str, folder: &Folder, out: &mut Vec<String>) {
            for (name, entity) in folder {
                let path = format!("{}/{}", prefix, name);
                match entity {
                    Entity::File(_) => out.push(path),
                    Entity::Folder(children) => walk(&path, children, out),
                }
            }
        }

        let tree = self.file_tree.lock().unwrap();
        let mut out = Vec::new();
        walk("", &tree, &mut out);
        out
    }

    fn split_path(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    // Returns a clone of the entity to avoid holding the lock.
    fn get_entity(&self, path: &AbsoluteFsPath) -> Option<Entity> {
        let tree = self.file_tree.lock().unwrap();
        let segments = Self::split_path(path.as_str());
        let mut current = &*tree;

        for (i, segment) in segments.iter().enumerate() {
            let last = i == segments.len() - 1;
            match current.get(segment) {
                Some(Entity::Folder(map)) if last => return Some(Entity::Folder(map.clone())),
                Some(Entity::Folder(map)) => current = map,
                Some(Entity::File(content)) if last => return Some(Entity::File(content.clone())),
                Some(Entity::File(_)) | None => return None,
            }
        }
        Some(Entity::Folder(tree.clone()))
    }

    fn with_parent_folder<T>(
        &self,
        path: &AbsoluteFsPath,
        f: impl FnOnce(&mut Folder, String) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut tree = self.file_tree.lock().unwrap();
        let mut segments = Self::split_path(path.as_str());
        let file_name = segments
            .pop()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Cannot address the root"))?;

        let mut current = &mut *tree;
        for segment in &segments {
            match current.get_mut(segment) {
                Some(Entity::Folder(map)) => current = map,
                Some(Entity::File(_)) => {
                    return Err(io::Error::new(io::ErrorKind::Other, "Not a directory"))
                }
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Directory {} not found", segment),
                    ))
                }
            }
        }
        f(current, file_name)
    }
}

impl PathManipulation for MockFileSystem {
    fn dirname(&self, file: &str) -> String {
        match clean_path(file).rsplit_once('/') {
            Some(("", _)) | None => "/".to_string(),
            Some((parent, _)) => parent.to_string(),
        }
    }

    fn join(&self, base_path: &str, paths: &[&str]) -> String {
        let mut full_path = base_path.to_string();
        for p in paths {
            if !full_path.ends_with('/') && !p.starts_with('/') {
                full_path.push('/');
            }
            full_path.push_str(p);
        }
        clean_path(&full_path)
    }

    fn pwd(&self) -> AbsoluteFsPath {
        self.cwd.lock().unwrap().clone()
    }
}

impl ReadonlyFileSystem for MockFileSystem {
    fn exists(&self, path: &AbsoluteFsPath) -> bool {
        self.get_entity(path).is_some()
    }

    fn read_file(&self, path: &AbsoluteFsPath) -> io::Result<String> {
        match self.get_entity(path) {
            Some(Entity::File(content)) => String::from_utf8(content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Some(Entity::Folder(_)) => Err(io::Error::new(io::ErrorKind::Other, "Is a directory")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
        }
    }

    fn stat(&self, path: &AbsoluteFsPath) -> io::Result<FileStats> {
        match self.get_entity(path) {
            Some(Entity::File(_)) => Ok(FileStats { is_file: true, is_directory: false }),
            Some(Entity::Folder(_)) => Ok(FileStats { is_file: false, is_directory: true }),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "Path not found")),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn write_file(&self, path: &AbsoluteFsPath, data: &[u8]) -> io::Result<()> {
        self.with_parent_folder(path, |folder, file_name| {
            if let Some(Entity::Folder(_)) = folder.get(&file_name) {
                return Err(io::Error::new(io::ErrorKind::Other, "Is a directory"));
            }
            folder.insert(file_name, Entity::File(data.to_vec()));
            Ok(())
        })
    }

    fn remove_file(&self, path: &AbsoluteFsPath) -> io::Result<()> {
        self.with_parent_folder(path, |folder, file_name| match folder.get(&file_name) {
            Some(Entity::File(_)) => {
                folder.remove(&file_name);
                Ok(())
            }
            Some(Entity::Folder(_)) => Err(io::Error::new(io::ErrorKind::Other, "Is a directory")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
        })
    }

    fn ensure_dir(&self, path: &AbsoluteFsPath) -> io::Result<()> {
        let mut tree = self.file_tree.lock().unwrap();
        let mut current = &mut *tree;
        for segment in Self::split_path(path.as_str()) {
            let next = current
                .entry(segment)
                .or_insert_with(|| Entity::Folder(Folder::new()));
            match next {
                Entity::Folder(map) => current = map,
                Entity::File(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        "Path component is not a directory",
                    ))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_parent_directory_on_write() {
        let fs = MockFileSystem::new();
        let err = fs
            .write_file(&AbsoluteFsPath::new("/a/b.ts"), b"")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn should_list_files_created_with_init() {
        let fs = MockFileSystem::new();
        fs.init_with_files(&[("/b/c.ts", "c"), ("/a.json", "{}")]);
        assert_eq!(fs.files(), vec!["/a.json".to_string(), "/b/c.ts".to_string()]);
        assert!(fs.is_file(&AbsoluteFsPath::new("/b/c.ts")));
        assert!(!fs.is_file(&AbsoluteFsPath::new("/b")));
        assert!(fs.exists(&AbsoluteFsPath::new("/b")));
    }

    #[test]
    fn should_remove_only_files() {
        let fs = MockFileSystem::new();
        fs.init_with_files(&[("/dir/file.ts", "x")]);
        assert!(fs.remove_file(&AbsoluteFsPath::new("/dir")).is_err());
        fs.remove_file(&AbsoluteFsPath::new("/dir/file.ts")).unwrap();
        assert!(fs.files().is_empty());
    }

    #[test]
    fn should_compute_posix_dirname() {
        let fs = MockFileSystem::new();
        assert_eq!(fs.dirname("/a/b/c.ts"), "/a/b");
        assert_eq!(fs.dirname("/c.ts"), "/");
        assert_eq!(fs.join("/a", &["b", "../c.ts"]), "/a/c.ts");
    }
}
