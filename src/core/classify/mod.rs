//! # Classify Module
//!
//! Computes, per metadata field, how each candidate's value relates to its
//! peers: shared with at least one other copy (`Common`), achieving the
//! configured extreme (`Best`), unique (`Divergent`), or not comparable
//! (`Neutral`/`Absent`).
//!
//! The per-field policy is an explicit configuration table, not scattered
//! conditionals: each field declares whether exact equality matters and
//! whether an extreme (oldest, largest) is preferred. Two presets cover the
//! classic workflows - [`RankingPolicy::preferential`] highlights the oldest
//! timestamp and the largest size/resolution/density, while
//! [`RankingPolicy::commonality`] only marks values shared across copies.
//!
//! Classification is a pure function over the group; it never touches the
//! filesystem and can be re-invoked safely.

use crate::core::candidate::CandidateGroup;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The comparable metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Filename,
    Modified,
    SizeBytes,
    Dimensions,
    PixelCount,
    Density,
    ColorMode,
    CameraMaker,
    GeoLocation,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Filename,
        Field::Modified,
        Field::SizeBytes,
        Field::Dimensions,
        Field::PixelCount,
        Field::Density,
        Field::ColorMode,
        Field::CameraMaker,
        Field::GeoLocation,
    ];

    /// Display label for presentation
    pub fn label(&self) -> &'static str {
        match self {
            Field::Filename => "Filename",
            Field::Modified => "Modified",
            Field::SizeBytes => "Size",
            Field::Dimensions => "Dimensions",
            Field::PixelCount => "Resolution",
            Field::Density => "DPI",
            Field::ColorMode => "Color mode",
            Field::CameraMaker => "Camera",
            Field::GeoLocation => "Geo location",
        }
    }
}

/// Which end of the ordering wins for a preferred field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extreme {
    /// Smallest value wins (oldest timestamp)
    Min,
    /// Largest value wins (biggest file, most pixels)
    Max,
}

/// Per-field classification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Mark values shared by two or more copies as common, the rest divergent
    pub identity: bool,
    /// Mark the copies achieving this extreme as best
    pub prefer: Option<Extreme>,
}

impl FieldRule {
    pub const fn identity() -> Self {
        Self {
            identity: true,
            prefer: None,
        }
    }

    pub const fn prefer(extreme: Extreme) -> Self {
        Self {
            identity: false,
            prefer: Some(extreme),
        }
    }

    pub const fn identity_and_prefer(extreme: Extreme) -> Self {
        Self {
            identity: true,
            prefer: Some(extreme),
        }
    }

    pub const fn neutral() -> Self {
        Self {
            identity: false,
            prefer: None,
        }
    }
}

/// The full per-field configuration table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPolicy {
    rules: BTreeMap<Field, FieldRule>,
}

impl RankingPolicy {
    /// Oldest timestamp and largest size/resolution/density win; text fields
    /// are compared for exact equality
    pub fn preferential() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(Field::Filename, FieldRule::identity());
        rules.insert(
            Field::Modified,
            FieldRule::identity_and_prefer(Extreme::Min),
        );
        rules.insert(
            Field::SizeBytes,
            FieldRule::identity_and_prefer(Extreme::Max),
        );
        rules.insert(Field::Dimensions, FieldRule::identity());
        rules.insert(Field::PixelCount, FieldRule::prefer(Extreme::Max));
        rules.insert(Field::Density, FieldRule::prefer(Extreme::Max));
        rules.insert(Field::ColorMode, FieldRule::identity());
        rules.insert(Field::CameraMaker, FieldRule::identity());
        rules.insert(Field::GeoLocation, FieldRule::identity());
        Self { rules }
    }

    /// Every field compared for exact equality, no extremes
    pub fn commonality() -> Self {
        let mut rules = BTreeMap::new();
        for field in Field::ALL {
            rules.insert(field, FieldRule::identity());
        }
        Self { rules }
    }

    /// Replace the rule for one field
    pub fn with_rule(mut self, field: Field, rule: FieldRule) -> Self {
        self.rules.insert(field, rule);
        self
    }

    /// The rule for a field (neutral when unconfigured)
    pub fn rule(&self, field: Field) -> FieldRule {
        self.rules.get(&field).copied().unwrap_or(FieldRule::neutral())
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self::preferential()
    }
}

/// Per-slot, per-field verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Shares its exact value with at least one other present copy
    Common,
    /// Achieves the configured extreme (ties are all best)
    Best,
    /// Present with a value no other copy shares
    Divergent,
    /// Present but not comparable (unknown value, or no rule applies)
    Neutral,
    /// No file in this folder
    Absent,
}

impl Verdict {
    /// Whether presentation should render this affirmatively (green)
    pub fn is_affirmative(&self) -> bool {
        matches!(self, Verdict::Common | Verdict::Best)
    }
}

/// Classification map: one verdict per slot for every field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    verdicts: BTreeMap<Field, Vec<Verdict>>,
}

impl Classification {
    /// The verdict for one slot of one field
    pub fn verdict(&self, field: Field, slot: usize) -> Verdict {
        self.verdicts
            .get(&field)
            .and_then(|row| row.get(slot))
            .copied()
            .unwrap_or(Verdict::Neutral)
    }

    /// Iterate the full map, field by field
    pub fn rows(&self) -> impl Iterator<Item = (Field, &[Verdict])> {
        self.verdicts.iter().map(|(f, row)| (*f, row.as_slice()))
    }
}

/// A slot's comparable value for one field
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Int(u64),
    Time(DateTime<Utc>),
    Real(f64),
}

fn cmp_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Int(x), FieldValue::Int(y)) => x.cmp(y),
        (FieldValue::Time(x), FieldValue::Time(y)) => x.cmp(y),
        (FieldValue::Real(x), FieldValue::Real(y)) => x.total_cmp(y),
        // Mixed kinds do not occur within a field
        _ => Ordering::Equal,
    }
}

fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    cmp_values(a, b) == Ordering::Equal
}

/// The comparable value of one slot for one field, `None` when unknown
fn slot_value(group: &CandidateGroup, slot: usize, field: Field) -> Option<FieldValue> {
    let candidate = &group.slots[slot];
    let meta = candidate.metadata.as_ref()?;

    match field {
        Field::Filename => Some(FieldValue::Text(group.filename.clone())),
        Field::Modified => Some(FieldValue::Time(meta.modified)),
        Field::SizeBytes => Some(FieldValue::Int(meta.size_bytes)),
        Field::Dimensions => Some(FieldValue::Text(meta.dimensions_display())),
        Field::PixelCount => Some(FieldValue::Int(meta.pixel_count())),
        // Ranked on the horizontal component, like the DPI pair's first entry
        Field::Density => meta.density.map(|(x, _)| FieldValue::Real(x)),
        Field::ColorMode => meta.color_mode.clone().map(FieldValue::Text),
        Field::CameraMaker => meta.camera_maker.clone().map(FieldValue::Text),
        Field::GeoLocation => meta.geo_location.clone().map(FieldValue::Text),
    }
}

/// Classify every field of a candidate group under the given policy
pub fn classify(group: &CandidateGroup, policy: &RankingPolicy) -> Classification {
    let mut verdicts = BTreeMap::new();

    for field in Field::ALL {
        let rule = policy.rule(field);

        let values: Vec<Option<FieldValue>> = (0..group.slots.len())
            .map(|i| {
                if group.slots[i].is_present() {
                    slot_value(group, i, field)
                } else {
                    None
                }
            })
            .collect();

        let mut row: Vec<Verdict> = group
            .slots
            .iter()
            .map(|s| {
                if s.is_present() {
                    Verdict::Neutral
                } else {
                    Verdict::Absent
                }
            })
            .collect();

        if let Some(extreme) = rule.prefer {
            let target = match extreme {
                Extreme::Min => values.iter().flatten().min_by(|a, b| cmp_values(a, b)),
                Extreme::Max => values.iter().flatten().max_by(|a, b| cmp_values(a, b)),
            };
            if let Some(target) = target {
                for (i, value) in values.iter().enumerate() {
                    if matches!(value, Some(v) if values_equal(v, target)) {
                        row[i] = Verdict::Best;
                    }
                }
            }
        }

        if rule.identity {
            for i in 0..values.len() {
                if row[i] != Verdict::Neutral {
                    continue;
                }
                let Some(value) = &values[i] else { continue };
                let shared = values
                    .iter()
                    .enumerate()
                    .any(|(j, other)| {
                        j != i && matches!(other, Some(o) if values_equal(o, value))
                    });
                row[i] = if shared {
                    Verdict::Common
                } else {
                    Verdict::Divergent
                };
            }
        }

        verdicts.insert(field, row);
    }

    Classification { verdicts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidate::{CandidateSlot, Presence};
    use crate::core::metadata::FileMetadata;
    use std::path::PathBuf;

    fn meta(size_bytes: u64, width: u32, height: u32, modified_secs: i64) -> FileMetadata {
        FileMetadata {
            size_bytes,
            pixel_width: width,
            pixel_height: height,
            modified: DateTime::from_timestamp(modified_secs, 0).unwrap(),
            density: None,
            color_mode: Some("Rgb8".to_string()),
            camera_maker: None,
            geo_location: None,
        }
    }

    fn present(folder: &str, meta: FileMetadata) -> CandidateSlot {
        CandidateSlot {
            folder: PathBuf::from(folder),
            path: Some(PathBuf::from(folder).join("photo.jpg")),
            metadata: Some(meta),
            presence: Presence::Present,
        }
    }

    fn absent(folder: &str) -> CandidateSlot {
        CandidateSlot {
            folder: PathBuf::from(folder),
            path: None,
            metadata: None,
            presence: Presence::Absent,
        }
    }

    fn group(slots: Vec<CandidateSlot>) -> CandidateGroup {
        CandidateGroup {
            filename: "photo.jpg".to_string(),
            slots,
        }
    }

    #[test]
    fn shared_identity_values_are_common_unique_divergent() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            present("b", meta(100, 10, 10, 1000)),
            present("c", meta(100, 20, 20, 1000)),
        ]);

        let c = classify(&g, &RankingPolicy::commonality());
        assert_eq!(c.verdict(Field::Dimensions, 0), Verdict::Common);
        assert_eq!(c.verdict(Field::Dimensions, 1), Verdict::Common);
        assert_eq!(c.verdict(Field::Dimensions, 2), Verdict::Divergent);
    }

    #[test]
    fn extreme_slot_is_best_others_common() {
        // Four equal sizes and one larger: the classic generations scenario
        let g = group(vec![
            present("5", meta(100, 10, 10, 1000)),
            present("4", meta(100, 10, 10, 1000)),
            present("3", meta(250, 10, 10, 1000)),
            present("2", meta(100, 10, 10, 1000)),
            present("1", meta(100, 10, 10, 1000)),
        ]);

        let c = classify(&g, &RankingPolicy::preferential());
        assert_eq!(c.verdict(Field::SizeBytes, 2), Verdict::Best);
        for slot in [0, 1, 3, 4] {
            assert_eq!(c.verdict(Field::SizeBytes, slot), Verdict::Common);
        }
    }

    #[test]
    fn tied_extremes_are_all_best() {
        let g = group(vec![
            present("a", meta(500, 10, 10, 1000)),
            present("b", meta(500, 10, 10, 1000)),
            present("c", meta(100, 10, 10, 1000)),
        ]);

        let c = classify(&g, &RankingPolicy::preferential());
        assert_eq!(c.verdict(Field::SizeBytes, 0), Verdict::Best);
        assert_eq!(c.verdict(Field::SizeBytes, 1), Verdict::Best);
        assert_ne!(c.verdict(Field::SizeBytes, 2), Verdict::Best);
    }

    #[test]
    fn oldest_modification_time_is_best() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 5000)),
            present("b", meta(100, 10, 10, 1000)),
            present("c", meta(100, 10, 10, 3000)),
        ]);

        let c = classify(&g, &RankingPolicy::preferential());
        assert_eq!(c.verdict(Field::Modified, 1), Verdict::Best);
        assert_eq!(c.verdict(Field::Modified, 0), Verdict::Divergent);
        assert_eq!(c.verdict(Field::Modified, 2), Verdict::Divergent);
    }

    #[test]
    fn absent_slots_are_excluded_but_marked() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            absent("b"),
            present("c", meta(200, 10, 10, 1000)),
        ]);

        let c = classify(&g, &RankingPolicy::preferential());
        for field in Field::ALL {
            assert_eq!(c.verdict(field, 1), Verdict::Absent);
        }
        // Ranking ignores the absent slot entirely
        assert_eq!(c.verdict(Field::SizeBytes, 2), Verdict::Best);
    }

    #[test]
    fn unknown_optional_values_stay_neutral_not_common() {
        // Neither copy has a camera maker; two unknowns must not read as a match
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            present("b", meta(100, 10, 10, 1000)),
        ]);

        let c = classify(&g, &RankingPolicy::commonality());
        assert_eq!(c.verdict(Field::CameraMaker, 0), Verdict::Neutral);
        assert_eq!(c.verdict(Field::CameraMaker, 1), Verdict::Neutral);
    }

    #[test]
    fn density_ranked_on_horizontal_component() {
        let mut low = meta(100, 10, 10, 1000);
        low.density = Some((72.0, 72.0));
        let mut high = meta(100, 10, 10, 1000);
        high.density = Some((300.0, 300.0));

        let g = group(vec![present("a", low), present("b", high)]);
        let c = classify(&g, &RankingPolicy::preferential());
        assert_eq!(c.verdict(Field::Density, 1), Verdict::Best);
        assert_eq!(c.verdict(Field::Density, 0), Verdict::Neutral);
    }

    #[test]
    fn commonality_policy_never_produces_best() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            present("b", meta(250, 10, 10, 2000)),
        ]);

        let c = classify(&g, &RankingPolicy::commonality());
        for (_, row) in c.rows() {
            assert!(!row.contains(&Verdict::Best));
        }
    }

    #[test]
    fn classify_is_idempotent() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            present("b", meta(250, 20, 20, 2000)),
            absent("c"),
        ]);

        let policy = RankingPolicy::preferential();
        assert_eq!(classify(&g, &policy), classify(&g, &policy));
    }

    #[test]
    fn filename_is_always_common_across_present_slots() {
        let g = group(vec![
            present("a", meta(100, 10, 10, 1000)),
            present("b", meta(250, 20, 20, 2000)),
        ]);

        let c = classify(&g, &RankingPolicy::preferential());
        assert_eq!(c.verdict(Field::Filename, 0), Verdict::Common);
        assert_eq!(c.verdict(Field::Filename, 1), Verdict::Common);
    }

    #[test]
    fn affirmative_verdicts_are_common_and_best() {
        assert!(Verdict::Common.is_affirmative());
        assert!(Verdict::Best.is_affirmative());
        assert!(!Verdict::Divergent.is_affirmative());
        assert!(!Verdict::Neutral.is_affirmative());
        assert!(!Verdict::Absent.is_affirmative());
    }
}
