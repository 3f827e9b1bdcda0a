//! # Candidate Module
//!
//! Assembles one candidate group: the same-named file probed in every folder
//! of the resolved set, with extracted metadata where the file exists and is
//! readable.
//!
//! Filenames are matched by exact, case-sensitive equality. A copy saved
//! under a different extension or a different name is not detected; this is a
//! documented limitation of the matching model, not an oversight.

use crate::core::folders::FolderSet;
use crate::core::metadata::{self, FileMetadata};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a folder holds a readable copy of the group's file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Present,
    Absent,
}

/// One folder position within a candidate group
///
/// Owned exclusively by its group and never mutated after construction; a new
/// slot is built for every filename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSlot {
    /// The folder this slot represents
    pub folder: PathBuf,
    /// Full path of the file, when present
    pub path: Option<PathBuf>,
    /// Extracted metadata, when present and readable
    pub metadata: Option<FileMetadata>,
    /// Presence marker, kept explicit for presentation ("not found in ...")
    pub presence: Presence,
}

impl CandidateSlot {
    pub fn is_present(&self) -> bool {
        self.presence == Presence::Present
    }

    fn absent(folder: PathBuf) -> Self {
        Self {
            folder,
            path: None,
            metadata: None,
            presence: Presence::Absent,
        }
    }
}

/// All candidates for one logical image, one slot per resolved folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateGroup {
    /// The shared filename
    pub filename: String,
    /// One slot per folder, in folder-set order (most recent first)
    pub slots: Vec<CandidateSlot>,
}

impl CandidateGroup {
    /// Probe every folder of the set for `filename`
    ///
    /// Never fails for individual files: a missing or unreadable file becomes
    /// an `Absent` slot. The returned group always has exactly one slot per
    /// folder in the set.
    pub fn build(filename: &str, folder_set: &FolderSet) -> CandidateGroup {
        let slots = folder_set
            .folders()
            .iter()
            .map(|folder| {
                let path = folder.join(filename);
                if !path.is_file() {
                    return CandidateSlot::absent(folder.clone());
                }

                match metadata::extract(&path) {
                    Ok(meta) => CandidateSlot {
                        folder: folder.clone(),
                        path: Some(path),
                        metadata: Some(meta),
                        presence: Presence::Present,
                    },
                    Err(e) => {
                        tracing::debug!(file = %path.display(), error = %e, "unreadable, treated as absent");
                        CandidateSlot::absent(folder.clone())
                    }
                }
            })
            .collect();

        CandidateGroup {
            filename: filename.to_string(),
            slots,
        }
    }

    /// Number of slots with a readable file
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_present()).count()
    }

    /// Iterate present slots with their index
    pub fn present_slots(&self) -> impl Iterator<Item = (usize, &CandidateSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_present())
    }
}
