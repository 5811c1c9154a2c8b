//! # Pipeline Module
//!
//! Orchestrates the full workflow from folders on disk to an analysis report.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Enumerate candidate photo files
//! 2. **Resolve** - Read timestamps, GPS and file metadata
//! 3. **Analyze** - Run the analysis engine over the resolved set
//!
//! ## Parallelism
//! Uses rayon to resolve metadata across multiple CPU cores. Analysis only
//! starts once every file has resolved.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
