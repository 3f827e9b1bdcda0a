//! # Error Module
//!
//! User-friendly error types for the photo sifter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Absorb what is recoverable** - an unreadable file becomes an absent
//!   candidate, never a crash
//! - **Surface what is not** - a bad base folder or a decision that points at
//!   a missing copy is reported immediately, with no retry

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SifterError {
    #[error("Folder resolution error: {0}")]
    Folder(#[from] FolderError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Decision error: {0}")]
    Apply(#[from] ApplyError),
}

/// Errors that occur while resolving the set of folders to compare
///
/// These are setup-time errors: a session cannot start without a valid
/// folder set, so they are surfaced to the user rather than recovered.
#[derive(Error, Debug)]
pub enum FolderError {
    #[error("Base folder {path} is not usable: {reason}")]
    InvalidBaseFolder { path: PathBuf, reason: String },

    #[error("No numbered sibling folders found next to {base}")]
    NoFoldersFound { base: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while extracting metadata from a single file
///
/// Recovered locally: the candidate builder maps these to an `Absent` slot.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Cannot read {path} as an image: {reason}")]
    UnreadableFile { path: PathBuf, reason: String },
}

/// Errors that occur while applying a user decision to a candidate group
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("No file present in folder slot {index} for this group")]
    SlotNotPresent { index: usize },

    #[error("Failed to move {path} to the trash: {reason}")]
    TrashFailed { path: PathBuf, reason: String },

    #[error("Failed to consolidate {path}: {source}")]
    ConsolidateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SifterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_error_includes_path() {
        let error = FolderError::InvalidBaseFolder {
            path: PathBuf::from("/photos/vacation"),
            reason: "folder name is not a positive number".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
        assert!(message.contains("not a positive number"));
    }

    #[test]
    fn metadata_error_includes_reason() {
        let error = MetadataError::UnreadableFile {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn apply_error_names_slot() {
        let error = ApplyError::SlotNotPresent { index: 1 };
        assert!(error.to_string().contains("slot 1"));
    }
}
