//! # Folders Module
//!
//! Resolves the ordered set of folders that may hold copies of the same
//! logical image.
//!
//! ## Topologies
//! - **Chained**: a base folder named with a positive integer `N` stands for
//!   the most recent copy generation; its siblings `N-1 .. 1` are older
//!   generations. The resolved set is the base followed by every sibling that
//!   exists on disk, newest first.
//! - **Paired**: exactly two arbitrary folders, no implied ordering beyond
//!   first/second.
//!
//! Existence is re-checked at resolution time, never cached: a folder removed
//! between sessions silently drops out of the next resolution.

use crate::error::FolderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Caller intent for how the folder set is derived
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Topology {
    /// Numbered generations: base folder `N`, siblings `N-1 .. 1`
    Chained { base: PathBuf },
    /// Exactly two folders
    Paired { first: PathBuf, second: PathBuf },
}

/// The resolved, ordered set of folders for one session
///
/// Element 0 is the base folder (the most authoritative generation for the
/// chained topology, the first folder for the paired one); its listing drives
/// the session's filename order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSet {
    folders: Vec<PathBuf>,
}

impl FolderSet {
    /// Resolve a topology against the filesystem
    pub fn resolve(topology: &Topology) -> Result<FolderSet, FolderError> {
        match topology {
            Topology::Chained { base } => Self::resolve_chained(base),
            Topology::Paired { first, second } => Self::resolve_paired(first, second),
        }
    }

    fn resolve_chained(base: &Path) -> Result<FolderSet, FolderError> {
        if !base.is_dir() {
            return Err(FolderError::InvalidBaseFolder {
                path: base.to_path_buf(),
                reason: "not an existing directory".to_string(),
            });
        }

        let generation = base
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| FolderError::InvalidBaseFolder {
                path: base.to_path_buf(),
                reason: "folder name is not a positive number".to_string(),
            })?;

        let parent = base.parent().unwrap_or_else(|| Path::new("."));

        let mut folders = vec![base.to_path_buf()];
        for older in (1..generation).rev() {
            let sibling = parent.join(older.to_string());
            if sibling.is_dir() {
                folders.push(sibling);
            } else {
                tracing::debug!(folder = %sibling.display(), "generation folder missing, dropped");
            }
        }

        if folders.len() < 2 {
            return Err(FolderError::NoFoldersFound {
                base: base.to_path_buf(),
            });
        }

        Ok(FolderSet { folders })
    }

    fn resolve_paired(first: &Path, second: &Path) -> Result<FolderSet, FolderError> {
        for folder in [first, second] {
            if !folder.is_dir() {
                return Err(FolderError::InvalidBaseFolder {
                    path: folder.to_path_buf(),
                    reason: "not an existing directory".to_string(),
                });
            }
        }

        Ok(FolderSet {
            folders: vec![first.to_path_buf(), second.to_path_buf()],
        })
    }

    /// The resolved folders, base first
    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// The base folder (element 0)
    pub fn base(&self) -> &Path {
        &self.folders[0]
    }

    /// Number of folders in the set
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}
