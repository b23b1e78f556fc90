//! Staged File Tree
//!
//! Schematics never write to disk while they run. Every create, overwrite and
//! delete is recorded here on top of a read-only view of the underlying file
//! system, and only `commit` applies the recorded changes. A failed run
//! therefore leaves the workspace untouched, and `--dry-run` is just a run
//! without a commit.

use indexmap::IndexMap;
use thiserror::Error;

use crate::file_system::{normalize_tree_path, AbsoluteFsPath, FileSystem};

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("path \"{0}\" already exists")]
    FileAlreadyExists(String),
    #[error("path \"{0}\" does not exist")]
    FileDoesNotExist(String),
    #[error("cannot apply change to \"{path}\": {reason}")]
    Conflict { path: String, reason: &'static str },
    #[error("failed to write \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Staged {
    Content(String),
    Deleted,
}

/// A change recorded by the tree, in the order it was first made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create { path: String, content: String },
    Overwrite { path: String, content: String },
    Delete { path: String },
}

impl Action {
    pub fn path(&self) -> &str {
        match self {
            Action::Create { path, .. }
            | Action::Overwrite { path, .. }
            | Action::Delete { path } => path,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_path = self.path().trim_start_matches('/');
        match self {
            Action::Create { content, .. } => {
                write!(f, "CREATE {} ({} bytes)", display_path, content.len())
            }
            Action::Overwrite { content, .. } => {
                write!(f, "UPDATE {} ({} bytes)", display_path, content.len())
            }
            Action::Delete { .. } => write!(f, "DELETE {}", display_path),
        }
    }
}

pub struct Tree<'fs> {
    fs: &'fs dyn FileSystem,
    root: AbsoluteFsPath,
    staged: IndexMap<String, Staged>,
}

impl<'fs> Tree<'fs> {
    /// A tree whose `/` is the workspace directory `root`.
    pub fn new(fs: &'fs dyn FileSystem, root: AbsoluteFsPath) -> Self {
        Self {
            fs,
            root,
            staged: IndexMap::new(),
        }
    }

    pub fn root(&self) -> &AbsoluteFsPath {
        &self.root
    }

    fn host_path(&self, path: &str) -> AbsoluteFsPath {
        AbsoluteFsPath::new(self.fs.join(self.root.as_str(), &[path.trim_start_matches('/')]))
    }

    fn exists_on_host(&self, path: &str) -> bool {
        self.fs.is_file(&self.host_path(path))
    }

    pub fn exists(&self, path: &str) -> bool {
        let path = normalize_tree_path(path);
        match self.staged.get(&path) {
            Some(Staged::Content(_)) => true,
            Some(Staged::Deleted) => false,
            None => self.exists_on_host(&path),
        }
    }

    /// Current content of `path`, staged changes included.
    pub fn read(&self, path: &str) -> Option<String> {
        let path = normalize_tree_path(path);
        match self.staged.get(&path) {
            Some(Staged::Content(content)) => Some(content.clone()),
            Some(Staged::Deleted) => None,
            None => self.fs.read_file(&self.host_path(&path)).ok(),
        }
    }

    pub fn create(&mut self, path: &str, content: impl Into<String>) -> Result<(), TreeError> {
        let path = normalize_tree_path(path);
        if self.exists(&path) {
            return Err(TreeError::FileAlreadyExists(path));
        }
        log::debug!("staging creation of {}", path);
        self.staged.insert(path, Staged::Content(content.into()));
        Ok(())
    }

    pub fn overwrite(&mut self, path: &str, content: impl Into<String>) -> Result<(), TreeError> {
        let path = normalize_tree_path(path);
        if !self.exists(&path) {
            return Err(TreeError::FileDoesNotExist(path));
        }
        log::debug!("staging update of {}", path);
        self.staged.insert(path, Staged::Content(content.into()));
        Ok(())
    }

    pub fn delete(&mut self, path: &str) -> Result<(), TreeError> {
        let path = normalize_tree_path(path);
        if !self.exists(&path) {
            return Err(TreeError::FileDoesNotExist(path));
        }
        log::debug!("staging deletion of {}", path);
        if self.exists_on_host(&path) {
            self.staged.insert(path, Staged::Deleted);
        } else {
            // Created during this run: forgetting it is enough.
            self.staged.shift_remove(&path);
        }
        Ok(())
    }

    /// Staged changes, in the order their paths were first touched.
    pub fn actions(&self) -> Vec<Action> {
        self.staged
            .iter()
            .map(|(path, staged)| {
                let path = path.clone();
                match staged {
                    Staged::Deleted => Action::Delete { path },
                    Staged::Content(content) if self.exists_on_host(&path) => Action::Overwrite {
                        path,
                        content: content.clone(),
                    },
                    Staged::Content(content) => Action::Create {
                        path,
                        content: content.clone(),
                    },
                }
            })
            .collect()
    }

    /// Apply every staged change to the file system.
    ///
    /// Every target is checked before the first write, so a conflicting
    /// workspace leaves the file system untouched. An I/O error raised while
    /// writing can still leave the earlier changes applied.
    pub fn commit(self) -> Result<Vec<Action>, TreeError> {
        let actions = self.actions();
        self.check_applicable(&actions)?;
        for action in &actions {
            let host_path = self.host_path(action.path());
            let io_error = |source| TreeError::Io {
                path: action.path().to_string(),
                source,
            };
            match action {
                Action::Create { content, .. } | Action::Overwrite { content, .. } => {
                    let dir = AbsoluteFsPath::new(self.fs.dirname(host_path.as_str()));
                    self.fs.ensure_dir(&dir).map_err(io_error)?;
                    self.fs
                        .write_file(&host_path, content.as_bytes())
                        .map_err(io_error)?;
                }
                Action::Delete { .. } => self.fs.remove_file(&host_path).map_err(io_error)?,
            }
        }
        Ok(actions)
    }

    fn check_applicable(&self, actions: &[Action]) -> Result<(), TreeError> {
        for action in actions {
            let host_path = self.host_path(action.path());
            let conflict = |reason| TreeError::Conflict {
                path: action.path().to_string(),
                reason,
            };
            if let Action::Delete { .. } = action {
                if !self.fs.is_file(&host_path) {
                    return Err(conflict("file is gone"));
                }
                continue;
            }

            if let Ok(stats) = self.fs.stat(&host_path) {
                if stats.is_directory() {
                    return Err(conflict("a directory is in the way"));
                }
            }
            // The closest existing ancestor must be a directory.
            let mut dir = self.fs.dirname(host_path.as_str());
            loop {
                if let Ok(stats) = self.fs.stat(&AbsoluteFsPath::new(dir.as_str())) {
                    if stats.is_file() {
                        return Err(conflict("a parent path is a file"));
                    }
                    break;
                }
                let parent = self.fs.dirname(&dir);
                if parent == dir {
                    break;
                }
                dir = parent;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::testing::MockFileSystem;
    use crate::file_system::ReadonlyFileSystem;

    fn fixture() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.init_with_files(&[("/workspace/src/existing.ts", "old")]);
        fs
    }

    #[test]
    fn should_read_through_to_the_file_system() {
        let fs = fixture();
        let tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        assert!(tree.exists("/src/existing.ts"));
        assert!(tree.exists("src/./existing.ts"));
        assert_eq!(tree.read("/src/existing.ts").as_deref(), Some("old"));
        assert!(!tree.exists("/src"));
    }

    #[test]
    fn should_refuse_to_create_existing_files() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        let err = tree.create("/src/existing.ts", "new").unwrap_err();
        assert!(matches!(err, TreeError::FileAlreadyExists(path) if path == "/src/existing.ts"));
    }

    #[test]
    fn should_refuse_to_overwrite_or_delete_missing_files() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        assert!(matches!(
            tree.overwrite("/src/missing.ts", "x"),
            Err(TreeError::FileDoesNotExist(_))
        ));
        assert!(matches!(
            tree.delete("/src/missing.ts"),
            Err(TreeError::FileDoesNotExist(_))
        ));
    }

    #[test]
    fn should_stage_without_touching_the_file_system() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        tree.create("/src/a/new.ts", "new").unwrap();
        tree.overwrite("/src/existing.ts", "updated").unwrap();

        assert_eq!(tree.read("/src/a/new.ts").as_deref(), Some("new"));
        assert_eq!(tree.read("/src/existing.ts").as_deref(), Some("updated"));
        assert_eq!(fs.files(), vec!["/workspace/src/existing.ts".to_string()]);
    }

    #[test]
    fn should_forget_files_created_then_deleted() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        tree.create("/src/tmp.ts", "tmp").unwrap();
        tree.delete("/src/tmp.ts").unwrap();
        assert!(!tree.exists("/src/tmp.ts"));
        assert!(tree.actions().is_empty());
    }

    #[test]
    fn should_not_write_anything_when_a_target_conflicts() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        tree.create("/src/a/new.ts", "new").unwrap();
        tree.overwrite("/src/existing.ts", "updated").unwrap();
        tree.create("/src/existing.ts/child.ts", "child").unwrap();

        let err = tree.commit().unwrap_err();
        assert!(matches!(
            err,
            TreeError::Conflict { path, .. } if path == "/src/existing.ts/child.ts"
        ));
        assert_eq!(fs.files(), vec!["/workspace/src/existing.ts".to_string()]);
        assert_eq!(
            fs.read_file(&AbsoluteFsPath::new("/workspace/src/existing.ts")).unwrap(),
            "old"
        );
    }

    #[test]
    fn should_refuse_to_replace_a_directory() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        tree.create("/src/fresh.ts", "fresh").unwrap();
        tree.create("/src", "oops").unwrap();

        assert!(matches!(
            tree.commit(),
            Err(TreeError::Conflict { path, .. }) if path == "/src"
        ));
        assert_eq!(fs.files(), vec!["/workspace/src/existing.ts".to_string()]);
    }

    #[test]
    fn should_report_and_commit_actions_in_order() {
        let fs = fixture();
        let mut tree = Tree::new(&fs, AbsoluteFsPath::new("/workspace"));
        tree.create("/src/a/new.ts", "new").unwrap();
        tree.overwrite("/src/existing.ts", "updated").unwrap();
        tree.delete("/src/existing.ts").unwrap();

        let rendered: Vec<String> = tree.actions().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "CREATE src/a/new.ts (3 bytes)".to_string(),
                "DELETE src/existing.ts".to_string(),
            ]
        );

        tree.commit().unwrap();
        assert_eq!(fs.files(), vec!["/workspace/src/a/new.ts".to_string()]);
        assert_eq!(
            fs.read_file(&AbsoluteFsPath::new("/workspace/src/a/new.ts")).unwrap(),
            "new"
        );
    }
}
