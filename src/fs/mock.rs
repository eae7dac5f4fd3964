// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Upper bound on link hops while resolving one component.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    Symlink(PathBuf),
}

/// In-memory filesystem for deterministic watcher tests.
///
/// Clones share the same underlying tree, so a test can keep one handle to
/// mutate files while the watcher polls through another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    read_dir_calls: Arc<AtomicUsize>,
}

fn parent_or_root(path: &Path) -> Option<&Path> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    })
}

fn child_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

/// Map `path` to the key of the entry it refers to, following symlinks in
/// every component (and in the last one only if `follow_last`).
fn resolve(files: &HashMap<PathBuf, MockEntry>, path: &Path, follow_last: bool) -> PathBuf {
    let components: Vec<Component<'_>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let mut resolved = PathBuf::new();
    for (i, component) in components.iter().enumerate() {
        resolved.push(component.as_os_str());
        if i + 1 == components.len() && !follow_last {
            break;
        }

        let mut hops = 0;
        while let Some(MockEntry::Symlink(target)) = files.get(&resolved) {
            hops += 1;
            if hops > MAX_SYMLINK_HOPS {
                break;
            }
            resolved = if target == Path::new(".") {
                PathBuf::new()
            } else {
                target.clone()
            };
        }
    }

    if resolved.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        resolved
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            read_dir_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create or overwrite a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert_entry(path.as_ref(), MockEntry::File(content.into()));
    }

    /// Create a symlink at `path` pointing at `target` (a key of this
    /// filesystem, `"."` for the root).
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.insert_entry(path.as_ref(), MockEntry::Symlink(target.as_ref().to_path_buf()));
    }

    /// Shrink or grow an existing file to `len` bytes.
    pub fn set_len(&self, path: impl AsRef<Path>, len: usize) -> Result<()> {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        let key = resolve(&files, path, true);
        match files.get_mut(&key) {
            Some(MockEntry::File(content)) => {
                content.resize(len, 0);
                Ok(())
            }
            Some(_) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    /// Remove a file, directory or symlink entry (links are not followed).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        if files.remove(path).is_none() {
            return;
        }
        if let (Some(parent), Some(name)) = (parent_or_root(path), child_name(path)) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.retain(|c| c != &name);
            }
        }
    }

    /// How many times `read_dir` has been called, across all clones.
    pub fn read_dir_calls(&self) -> usize {
        self.read_dir_calls.load(Ordering::SeqCst)
    }

    fn insert_entry(&self, path: &Path, entry: MockEntry) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), entry);

        if let Some(parent) = parent_or_root(path) {
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, path);
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = parent_or_root(path) {
            if parent != path {
                // Avoid infinite loop at root
                Self::ensure_dir_entry(files, parent);
                Self::link_child(files, parent, path);
            }
        }
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, path: &Path) {
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (files.get_mut(parent), child_name(path))
        {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        let key = resolve(&files, path, true);
        matches!(files.get(&key), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        let key = resolve(&files, path, false);
        matches!(files.get(&key), Some(MockEntry::Symlink(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        let key = resolve(&files, path, true);
        match files.get(&key) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let files = self.files.lock().unwrap();
        let key = resolve(&files, path, true);
        match files.get(&key) {
            Some(MockEntry::File(content)) => Ok(content.len() as u64),
            Some(MockEntry::Dir(_)) => Ok(0),
            Some(MockEntry::Symlink(_)) => Err(anyhow!("Too many levels of symlinks: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}
