//! # photo-sift CLI
//!
//! Command-line interface for the photo sifter.
//!
//! ## Usage
//! ```bash
//! photo-sift chain ~/photos/5
//! photo-sift pair ~/import ~/backup --auto-merge --output json
//! ```

mod cli;

use photo_sifter::Result;

fn main() -> Result<()> {
    photo_sifter::init_tracing();
    cli::run()
}
