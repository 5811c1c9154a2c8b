//! # photo-geo CLI
//!
//! Command-line interface for the geo photo analyzer.
//!
//! ## Usage
//! ```bash
//! photo-geo analyze ~/Pictures/Italy
//! photo-geo analyze ~/Pictures/Italy --verbose --output json
//! ```

mod cli;

use geo_photo_analyzer::Result;

fn main() -> Result<()> {
    cli::run()
}
