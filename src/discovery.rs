//! Markdown file discovery and index-modulo sharding.
//!
//! Independent processes can each take one shard of the same sorted file list.
//! Shards never overlap, so no coordination between processes is needed.

use crate::error::ConfigError;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One slice of the sorted file list: the files whose position `i` satisfies
/// `i % total == index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    index: usize,
    total: usize,
}

impl Shard {
    pub fn new(index: usize, total: usize) -> Result<Self, ConfigError> {
        if total == 0 || index >= total {
            return Err(ConfigError::InvalidShard { index, total });
        }
        Ok(Self { index, total })
    }

    /// The whole list as one shard
    pub fn single() -> Self {
        Self { index: 0, total: 1 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn contains(&self, position: usize) -> bool {
        position % self.total == self.index
    }

    /// Keep only the files assigned to this shard, preserving order.
    pub fn select<T: Clone>(&self, files: &[T]) -> Vec<T> {
        files
            .iter()
            .enumerate()
            .filter(|(i, _)| self.contains(*i))
            .map(|(_, f)| f.clone())
            .collect()
    }
}

/// Recursively list every `*.md` file under `root`, sorted by path.
///
/// Blocking; async callers should run it on the blocking pool.
pub fn discover_markdown_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if is_markdown(entry.path()) && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}
