//! # Scanner Module
//!
//! Enumerates the candidate filenames of a session from the base folder.
//!
//! Only the base folder's own files are listed (no recursion): the candidate
//! builder probes the other folders of the set for each name. The listing is
//! sorted so a session walks the filenames in a stable order.

mod filter;

pub use filter::ImageFilter;

use crate::error::FolderError;
use std::path::Path;
use walkdir::WalkDir;

/// List the image filenames in `folder`, filtered and sorted
pub fn list_candidates(folder: &Path, filter: &ImageFilter) -> Result<Vec<String>, FolderError> {
    if !folder.is_dir() {
        return Err(FolderError::InvalidBaseFolder {
            path: folder.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }

    let mut filenames = Vec::new();

    for entry_result in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry_result.map_err(|e| FolderError::ReadDirectory {
            path: folder.to_path_buf(),
            source: std::io::Error::other(e.to_string()),
        })?;

        let path = entry.path();
        if path.is_dir() || !filter.should_include(path) {
            continue;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            filenames.push(name.to_string());
        }
    }

    filenames.sort();
    Ok(filenames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn listing_is_filtered_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, "b.jpg");
        touch(&temp_dir, "a.jpg");
        touch(&temp_dir, "notes.txt");
        touch(&temp_dir, "c.png");

        let names = list_candidates(temp_dir.path(), &ImageFilter::new()).unwrap();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn extended_filter_admits_more_formats() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, "a.jpg");
        touch(&temp_dir, "c.png");

        let names = list_candidates(temp_dir.path(), &ImageFilter::extended()).unwrap();
        assert_eq!(names, vec!["a.jpg", "c.png"]);
    }

    #[test]
    fn listing_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, "a.jpg");
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        File::create(temp_dir.path().join("nested").join("deep.jpg")).unwrap();

        let names = list_candidates(temp_dir.path(), &ImageFilter::new()).unwrap();
        assert_eq!(names, vec!["a.jpg"]);
    }

    #[test]
    fn listing_missing_folder_is_invalid() {
        let result = list_candidates(Path::new("/nonexistent/5"), &ImageFilter::new());
        assert!(matches!(
            result,
            Err(FolderError::InvalidBaseFolder { .. })
        ));
    }
}
