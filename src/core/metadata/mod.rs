//! # Metadata Module
//!
//! Extracts the comparable metadata snapshot for one candidate file.
//!
//! ## Extracted Fields
//! - File size in bytes and last modification time (from the filesystem)
//! - Pixel dimensions and color mode (from the image header)
//! - Density (DPI), camera maker, and geo location (from EXIF, when present)
//!
//! Extraction is read-only and releases the file before returning. Size is
//! kept in bytes; the megabyte conversion happens at display time so repeated
//! comparisons never compound rounding error.

use crate::error::MetadataError;
use chrono::{DateTime, Utc};
use exif::{In, Rational, Reader, Tag, Value};
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sentinel shown for optional fields that could not be extracted
pub const UNKNOWN: &str = "Unknown";

/// Immutable metadata snapshot for one file
///
/// Optional fields stay `None` when the source format carries no such
/// information; `None` never compares equal to another `None` during
/// classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File size in bytes
    pub size_bytes: u64,
    /// Image width in pixels
    pub pixel_width: u32,
    /// Image height in pixels
    pub pixel_height: u32,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Horizontal and vertical resolution in dots per inch
    pub density: Option<(f64, f64)>,
    /// Color mode of the decoded image (e.g. "Rgb8", "L8")
    pub color_mode: Option<String>,
    /// Camera maker from EXIF (e.g. "Canon")
    pub camera_maker: Option<String>,
    /// Geo location from EXIF GPS fields, as "lat REF, long REF"
    pub geo_location: Option<String>,
}

impl FileMetadata {
    /// File size converted to megabytes (display only)
    pub fn megabytes(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Total pixel count, the comparable form of the resolution
    pub fn pixel_count(&self) -> u64 {
        self.pixel_width as u64 * self.pixel_height as u64
    }

    /// Dimensions as "WxH"
    pub fn dimensions_display(&self) -> String {
        format!("{}x{}", self.pixel_width, self.pixel_height)
    }

    /// Modification time in the fixed display format
    pub fn modified_display(&self) -> String {
        self.modified.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Density as "XxY" or the unknown sentinel
    pub fn density_display(&self) -> String {
        match self.density {
            Some((x, y)) => format!("{}x{}", x, y),
            None => UNKNOWN.to_string(),
        }
    }

    /// Color mode or the unknown sentinel
    pub fn color_mode_display(&self) -> &str {
        self.color_mode.as_deref().unwrap_or(UNKNOWN)
    }

    /// Camera maker or the unknown sentinel
    pub fn camera_display(&self) -> &str {
        self.camera_maker.as_deref().unwrap_or(UNKNOWN)
    }

    /// Geo location or the unknown sentinel
    pub fn geo_display(&self) -> &str {
        self.geo_location.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Extract the metadata snapshot for one file
///
/// Fails with [`MetadataError::UnreadableFile`] when the path cannot be
/// stat'd or decoded as an image; the caller treats that as an absent
/// candidate, not a hard error. EXIF absence is normal and leaves the
/// optional fields `None`.
pub fn extract(path: &Path) -> Result<FileMetadata, MetadataError> {
    let stat = std::fs::metadata(path).map_err(|e| unreadable(path, &e.to_string()))?;
    let modified = stat
        .modified()
        .map_err(|e| unreadable(path, &e.to_string()))?;

    let image = ImageReader::open(path)
        .map_err(|e| unreadable(path, &e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(path, &e.to_string()))?
        .decode()
        .map_err(|e| unreadable(path, &e.to_string()))?;

    let (density, camera_maker, geo_location) = read_exif(path);

    Ok(FileMetadata {
        size_bytes: stat.len(),
        pixel_width: image.width(),
        pixel_height: image.height(),
        modified: DateTime::<Utc>::from(modified),
        density,
        color_mode: Some(format!("{:?}", image.color())),
        camera_maker,
        geo_location,
    })
}

fn unreadable(path: &Path, reason: &str) -> MetadataError {
    MetadataError::UnreadableFile {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read the EXIF-derived fields; all of them are optional
fn read_exif(path: &Path) -> (Option<(f64, f64)>, Option<String>, Option<String>) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return (None, None, None),
    };

    let mut bufreader = BufReader::new(&file);
    let exif_reader = match Reader::new().read_from_container(&mut bufreader) {
        Ok(r) => r,
        Err(_) => return (None, None, None),
    };

    let x_res = rational_field(&exif_reader, Tag::XResolution);
    let y_res = rational_field(&exif_reader, Tag::YResolution);
    let density = match (x_res, y_res) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };

    let camera_maker = exif_reader
        .get_field(Tag::Make, In::PRIMARY)
        .and_then(|field| string_value(&field.value));

    let geo_location = read_gps(&exif_reader);

    (density, camera_maker, geo_location)
}

/// Format GPS latitude/longitude as "dd.ddddd REF, dd.ddddd REF"
fn read_gps(exif_reader: &exif::Exif) -> Option<String> {
    let latitude = dms_field(exif_reader, Tag::GPSLatitude)?;
    let lat_ref = exif_reader
        .get_field(Tag::GPSLatitudeRef, In::PRIMARY)
        .and_then(|field| string_value(&field.value))?;
    let longitude = dms_field(exif_reader, Tag::GPSLongitude)?;
    let long_ref = exif_reader
        .get_field(Tag::GPSLongitudeRef, In::PRIMARY)
        .and_then(|field| string_value(&field.value))?;

    Some(format!(
        "{:.5} {}, {:.5} {}",
        latitude, lat_ref, longitude, long_ref
    ))
}

/// Degrees/minutes/seconds rational triplet to decimal degrees
fn dms_field(exif_reader: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = exif_reader.get_field(tag, In::PRIMARY)?;
    if let Value::Rational(ref parts) = field.value {
        if parts.len() >= 3 {
            let degrees = rational_to_f64(&parts[0])?;
            let minutes = rational_to_f64(&parts[1])?;
            let seconds = rational_to_f64(&parts[2])?;
            return Some(degrees + minutes / 60.0 + seconds / 3600.0);
        }
    }
    None
}

fn rational_field(exif_reader: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = exif_reader.get_field(tag, In::PRIMARY)?;
    if let Value::Rational(ref vec) = field.value {
        return vec.first().and_then(rational_to_f64);
    }
    None
}

fn rational_to_f64(rational: &Rational) -> Option<f64> {
    if rational.denom == 0 {
        return None;
    }
    Some(rational.num as f64 / rational.denom as f64)
}

/// Helper to extract a trimmed string from an EXIF ASCII value
fn string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
