//! # Core Module
//!
//! The GUI-agnostic duplicate-resolution engine.
//!
//! ## Modules
//! - `metadata` - Extracts the comparable snapshot for one file
//! - `folders` - Resolves the ordered folder set (chained or paired)
//! - `scanner` - Enumerates candidate filenames from the base folder
//! - `candidate` - Assembles one candidate group per filename
//! - `classify` - Marks per-field commonality and preference
//! - `apply` - Applies keep/skip/merge decisions, trash-recoverably
//! - `session` - Walks the filenames and advances after each decision

pub mod apply;
pub mod candidate;
pub mod classify;
pub mod folders;
pub mod metadata;
pub mod scanner;
pub mod session;

// Re-export commonly used types
pub use apply::{ApplyConfig, ApplyResult, Decision, MergeMode};
pub use candidate::{CandidateGroup, CandidateSlot, Presence};
pub use classify::{classify, Classification, Field, RankingPolicy, Verdict};
pub use folders::{FolderSet, Topology};
pub use metadata::FileMetadata;
pub use scanner::ImageFilter;
pub use session::{Session, Step};
