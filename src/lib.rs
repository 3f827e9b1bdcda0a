//! # Photo Sifter
//!
//! A side-by-side duplicate photo resolver for numbered folder generations.
//!
//! ## Core Philosophy
//! - **Never destroy** - every removal is a recoverable trash move
//! - **Compare, don't guess** - matched by name, judged by metadata
//! - **The user decides** - the engine classifies, the user keeps or deletes
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation
//! layers:
//! - `core` - Folder resolution, candidate groups, classification, decisions
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface
//!
//! ## Known Limitation
//! Copies are matched by exact, case-sensitive filename across folders. A
//! duplicate saved under a different name or extension, or identical content
//! under two names, is not detected.

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{Result, SifterError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
