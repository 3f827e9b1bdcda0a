//! # Apply Module
//!
//! Applies a user decision to a candidate group.
//!
//! ## Safety Invariant
//! Every removal goes through a recoverable trash operation, never a
//! permanent unlink. A wrong folder ordering or a misread label must stay
//! fixable, so the trash stands in for transactional rollback.
//!
//! The applier owns the filesystem side effects and nothing else: it returns
//! an [`ApplyResult`] and leaves session advancement to the session iterator.

use crate::core::candidate::CandidateGroup;
use crate::core::metadata;
use crate::error::ApplyError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A user decision for one candidate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Keep the copy in this slot, trash every other present copy
    KeepOnly(usize),
    /// Leave everything in place and move on
    Skip,
    /// Consolidate one representative copy when all copies are identical
    AutoMergeIfIdentical,
}

/// What happens to the non-representative copies on a successful merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Leave them in place for a later pass
    #[default]
    Consolidate,
    /// Trash them outright
    TrashDuplicates,
}

/// Configuration for applying decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Folder the representative copy is moved into (created if absent)
    pub merge_folder: PathBuf,
    /// Treatment of the remaining copies after a merge
    pub merge_mode: MergeMode,
}

impl ApplyConfig {
    /// Default consolidation folder: `same/` next to the base folder
    pub fn for_base(base: &Path) -> Self {
        let parent = base.parent().unwrap_or_else(|| Path::new("."));
        Self {
            merge_folder: parent.join("same"),
            merge_mode: MergeMode::default(),
        }
    }
}

/// Outcome of applying a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// One copy kept, the others trashed
    Kept {
        kept: PathBuf,
        trashed: Vec<PathBuf>,
    },
    /// Nothing touched
    Skipped,
    /// Representative copy consolidated; duplicates left or trashed per mode
    Merged {
        destination: PathBuf,
        trashed: Vec<PathBuf>,
    },
    /// Re-verification found the copies are not identical; nothing touched
    MergeRefused { reason: String },
}

impl ApplyResult {
    /// Whether the session should advance to the next filename
    pub fn advances(&self) -> bool {
        !matches!(self, ApplyResult::MergeRefused { .. })
    }
}

/// Recoverable deletion seam
///
/// The production implementation moves files to the system trash; tests
/// substitute a directory-backed bin to observe what was disposed.
pub trait TrashBin: Send + Sync {
    fn dispose(&self, path: &Path) -> std::io::Result<()>;
}

/// Moves files to the operating system trash
pub struct SystemTrash;

impl TrashBin for SystemTrash {
    fn dispose(&self, path: &Path) -> std::io::Result<()> {
        trash::delete(path).map_err(std::io::Error::other)
    }
}

/// Applies decisions to candidate groups
pub struct DecisionApplier {
    config: ApplyConfig,
    trash: Box<dyn TrashBin>,
}

impl DecisionApplier {
    /// Create an applier backed by the system trash
    pub fn new(config: ApplyConfig) -> Self {
        Self::with_trash(config, Box::new(SystemTrash))
    }

    /// Create an applier with a custom trash bin
    pub fn with_trash(config: ApplyConfig, trash: Box<dyn TrashBin>) -> Self {
        Self { config, trash }
    }

    pub fn config(&self) -> &ApplyConfig {
        &self.config
    }

    /// Apply one decision to one group
    pub fn apply(
        &self,
        group: &CandidateGroup,
        decision: &Decision,
    ) -> Result<ApplyResult, ApplyError> {
        match decision {
            Decision::Skip => Ok(ApplyResult::Skipped),
            Decision::KeepOnly(index) => self.keep_only(group, *index),
            Decision::AutoMergeIfIdentical => self.auto_merge(group),
        }
    }

    fn keep_only(&self, group: &CandidateGroup, index: usize) -> Result<ApplyResult, ApplyError> {
        let kept = group
            .slots
            .get(index)
            .filter(|slot| slot.is_present())
            .and_then(|slot| slot.path.clone())
            .ok_or(ApplyError::SlotNotPresent { index })?;

        let mut trashed = Vec::new();
        for (i, slot) in group.present_slots() {
            if i == index {
                continue;
            }
            // Probed at build time, so present slots always carry a path
            let Some(path) = slot.path.as_ref() else {
                continue;
            };
            self.dispose(path)?;
            trashed.push(path.clone());
        }

        Ok(ApplyResult::Kept { kept, trashed })
    }

    /// Consolidate one representative copy when every present copy is
    /// identical on filename, size, pixel dimensions, and modification time
    ///
    /// The four fields are re-read from disk at call time; an earlier
    /// classification is not trusted, so a file that changed since the group
    /// was built makes the merge refuse without touching anything.
    fn auto_merge(&self, group: &CandidateGroup) -> Result<ApplyResult, ApplyError> {
        let present: Vec<_> = group.present_slots().collect();
        if present.len() < 2 {
            return Ok(ApplyResult::MergeRefused {
                reason: "fewer than two copies present".to_string(),
            });
        }

        let mut snapshots = Vec::new();
        for (_, slot) in &present {
            let Some(path) = slot.path.as_ref() else {
                continue;
            };
            if path.file_name().and_then(|n| n.to_str()) != Some(group.filename.as_str()) {
                return Ok(ApplyResult::MergeRefused {
                    reason: format!("{} no longer matches the group filename", path.display()),
                });
            }
            match metadata::extract(path) {
                Ok(meta) => snapshots.push((path.clone(), meta)),
                Err(e) => {
                    return Ok(ApplyResult::MergeRefused {
                        reason: format!("copy became unreadable: {}", e),
                    });
                }
            }
        }

        let (_, reference) = &snapshots[0];
        for (path, meta) in &snapshots[1..] {
            if meta.size_bytes != reference.size_bytes
                || meta.pixel_width != reference.pixel_width
                || meta.pixel_height != reference.pixel_height
                || meta.modified != reference.modified
            {
                tracing::debug!(file = %path.display(), "merge refused, copies diverge");
                return Ok(ApplyResult::MergeRefused {
                    reason: format!("{} differs from the other copies", path.display()),
                });
            }
        }

        fs::create_dir_all(&self.config.merge_folder).map_err(|e| {
            ApplyError::ConsolidateFailed {
                path: self.config.merge_folder.clone(),
                source: e,
            }
        })?;

        let representative = snapshots[0].0.clone();
        let destination = self.config.merge_folder.join(&group.filename);
        if destination.exists() {
            return Err(ApplyError::ConsolidateFailed {
                path: destination,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "a consolidated copy already exists",
                ),
            });
        }

        move_file(&representative, &destination).map_err(|e| ApplyError::ConsolidateFailed {
            path: representative.clone(),
            source: e,
        })?;

        let mut trashed = Vec::new();
        if self.config.merge_mode == MergeMode::TrashDuplicates {
            for (path, _) in &snapshots[1..] {
                self.dispose(path)?;
                trashed.push(path.clone());
            }
        }

        Ok(ApplyResult::Merged {
            destination,
            trashed,
        })
    }

    fn dispose(&self, path: &Path) -> Result<(), ApplyError> {
        tracing::debug!(file = %path.display(), "moving to trash");
        self.trash
            .dispose(path)
            .map_err(|e| ApplyError::TrashFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

/// Move a file, falling back to copy + size verification + delete when a
/// plain rename fails across filesystems
fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::rename(source, destination).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, destination)?;

        let dest_size = fs::metadata(destination)?.len();
        if dest_size != source_size {
            // Copy was incomplete, don't delete source
            let _ = fs::remove_file(destination);
            return Err(std::io::Error::other(format!(
                "copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            )));
        }

        fs::remove_file(source)
    })
}
