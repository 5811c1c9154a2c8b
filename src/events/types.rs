//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// File enumeration events
    Scan(ScanEvent),
    /// Metadata resolution events
    Metadata(MetadataEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during file enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// A candidate file was found
    FileFound { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_files: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of candidate files found so far
    pub files_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events while resolving files into photo records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetadataEvent {
    /// Resolution has started
    Started { total_files: usize },
    /// Progress update; may arrive out of order since files resolve in parallel
    Progress(MetadataProgress),
    /// A file could not be resolved and was left out
    Error { path: PathBuf, message: String },
    /// Resolution completed
    Completed { resolved: usize, failed: usize },
}

/// Progress information during metadata resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataProgress {
    /// Number of files resolved so far
    pub completed: usize,
    /// Total number of files to resolve
    pub total: usize,
    /// File that just finished
    pub current_path: PathBuf,
    /// Number of resolved photos carrying a GPS position
    pub geotagged: usize,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    ResolvingMetadata,
    Analyzing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Photos that resolved successfully
    pub total_photos: usize,
    /// Photos with a GPS position
    pub geotagged_photos: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Number of time/location clusters found
    pub clusters: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::ResolvingMetadata => write!(f, "Reading metadata"),
            PipelinePhase::Analyzing => write!(f, "Analyzing"),
        }
    }
}
