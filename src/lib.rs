//! # Geo Photo Analyzer
//!
//! Works out where and when a photo collection was taken.
//!
//! Given photos with capture times and GPS positions, the engine finds likely
//! duplicates, reconstructs the travel path, clusters photos into places and
//! moments, orders markers for a map and summarizes the collection.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Geo primitives, metadata extraction and the analysis engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{GeoPhotoError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG` wins when
/// set; otherwise `verbose` selects `debug` over `warn`. A second call keeps
/// the subscriber that is already installed.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
