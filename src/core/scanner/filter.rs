//! File filtering logic for candidate enumeration.

use std::path::Path;

/// Filters files to determine if they are supported images
///
/// The default filter matches the classic workflow and accepts only JPEGs;
/// [`ImageFilter::extended`] also accepts the other common formats.
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// File extensions to include
    extensions: std::collections::HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a filter that accepts only JPEG files
    pub fn new() -> Self {
        Self {
            extensions: vec!["jpg".to_string(), "jpeg".to_string()]
                .into_iter()
                .collect(),
            include_hidden: false,
        }
    }

    /// Create a filter that also accepts PNG, GIF and BMP files
    pub fn extended() -> Self {
        Self {
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
            ]
            .into_iter()
            .collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().collect();
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        // Check if hidden
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        // Check extension
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext_lower = ext.to_lowercase();
            self.extensions.contains(&ext_lower)
        } else {
            false
        }
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_includes_jpeg_only() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(!filter.should_include(Path::new("/photos/image.png")));
    }

    #[test]
    fn extended_filter_includes_common_formats() {
        let filter = ImageFilter::extended();
        assert!(filter.should_include(Path::new("/photos/image.png")));
        assert!(filter.should_include(Path::new("/photos/image.gif")));
        assert!(filter.should_include(Path::new("/photos/image.bmp")));
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
    }

    #[test]
    fn filter_excludes_non_images() {
        let filter = ImageFilter::extended();
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/video.mp4")));
    }

    #[test]
    fn filter_excludes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_can_include_hidden() {
        let filter = ImageFilter::new().with_hidden(true);
        assert!(filter.should_include(Path::new("/photos/.hidden.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
    }
}
