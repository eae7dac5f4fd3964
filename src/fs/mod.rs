// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The watcher only ever needs two things from the outside world: a directory
/// listing to expand glob patterns, and a byte size for each tracked path.
pub trait FileSystem: Send + Sync + Debug {
    /// True for directories, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symlink (the link is not followed).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Open the path and stat the open handle, returning its size in bytes.
    ///
    /// Fails if the path does not exist or cannot be opened. The handle is
    /// released before this returns, on every path.
    fn file_size(&self, path: &Path) -> Result<u64>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        let meta = file
            .metadata()
            .with_context(|| format!("stating file {:?}", path))?;
        Ok(meta.len())
    }
}
