//! Pipeline execution implementation.

use crate::core::analysis::{AnalysisConfig, AnalysisEngine, AnalysisReport};
use crate::core::metadata::{ExifMetadataProvider, MetadataProvider};
use crate::core::photo::{PhotoRecord, PhotoSet};
use crate::core::scanner::{FileEnumerator, ScanConfig, WalkDirEnumerator};
use crate::error::GeoPhotoError;
use crate::events::{
    null_sender, Event, EventSender, MetadataEvent, MetadataProgress, PipelineEvent,
    PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Every photo that resolved, in enumeration order
    pub photos: PhotoSet,
    /// Output of the analysis engine over `photos`
    pub report: AnalysisReport,
    /// Non-fatal errors from scanning and metadata resolution
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directories to scan
    pub paths: Vec<PathBuf>,
    /// Enumerator configuration (used when no custom enumerator is set)
    pub scan_config: ScanConfig,
    /// Analysis thresholds
    pub analysis: AnalysisConfig,
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    enumerator: Option<Box<dyn FileEnumerator>>,
    provider: Option<Box<dyn MetadataProvider>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Set analysis thresholds
    pub fn analysis(mut self, config: AnalysisConfig) -> Self {
        self.config.analysis = config;
        self
    }

    /// Replace the walkdir enumerator
    pub fn enumerator(mut self, enumerator: Box<dyn FileEnumerator>) -> Self {
        self.enumerator = Some(enumerator);
        self
    }

    /// Replace the EXIF metadata provider
    pub fn provider(mut self, provider: Box<dyn MetadataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the pipeline, rejecting invalid analysis thresholds
    pub fn build(self) -> Result<Pipeline, GeoPhotoError> {
        self.config.analysis.validate()?;

        let enumerator = self.enumerator.unwrap_or_else(|| {
            Box::new(WalkDirEnumerator::new(self.config.scan_config.clone()))
        });

        Ok(Pipeline {
            engine: AnalysisEngine::new(self.config.analysis),
            config: self.config,
            enumerator,
            provider: self
                .provider
                .unwrap_or_else(|| Box::new(ExifMetadataProvider::new())),
        })
    }
}

/// Scan -> resolve metadata -> analyze
pub struct Pipeline {
    config: PipelineConfig,
    engine: AnalysisEngine,
    enumerator: Box<dyn FileEnumerator>,
    provider: Box<dyn MetadataProvider>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, GeoPhotoError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, GeoPhotoError> {
        let start_time = Instant::now();
        let mut errors = Vec::new();

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scan_result = match self.enumerator.enumerate_with_events(&self.config.paths, events) {
            Ok(result) => result,
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };
        errors.extend(scan_result.errors.iter().map(|e| e.to_string()));

        // Overlapping roots enumerate the same file more than once
        let enumerated = scan_result.files.len();
        let mut seen = HashSet::with_capacity(enumerated);
        let files: Vec<PathBuf> = scan_result
            .files
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .collect();
        if files.len() < enumerated {
            debug!(repeats = enumerated - files.len(), "Dropped repeated paths");
        }

        info!(files = files.len(), "Enumerated candidate files");

        // Phase 2: Resolving metadata. Every file must resolve before analysis.
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::ResolvingMetadata,
        }));

        let photos = self.resolve_all(&files, events, &mut errors);

        // Phase 3: Analyzing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Analyzing,
        }));

        let report = self.engine.analyze(&photos);
        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_photos: photos.len(),
                geotagged_photos: report.statistics.with_location_count,
                duplicate_groups: report.duplicates.len(),
                clusters: report.clusters.clusters.len(),
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            photos,
            report,
            errors,
            duration_ms,
        })
    }

    /// Resolve files in parallel; order of the result follows `files`
    fn resolve_all(
        &self,
        files: &[PathBuf],
        events: &EventSender,
        errors: &mut Vec<String>,
    ) -> PhotoSet {
        let total = files.len();
        events.send(Event::Metadata(MetadataEvent::Started { total_files: total }));

        let completed = AtomicUsize::new(0);
        let geotagged = AtomicUsize::new(0);

        let resolved: Vec<Result<PhotoRecord, String>> = files
            .par_iter()
            .map(|path| {
                let outcome = self.provider.resolve(path);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;

                match outcome {
                    Ok(record) => {
                        if record.is_geotagged() {
                            geotagged.fetch_add(1, Ordering::SeqCst);
                        }
                        events.send(Event::Metadata(MetadataEvent::Progress(MetadataProgress {
                            completed: done,
                            total,
                            current_path: path.clone(),
                            geotagged: geotagged.load(Ordering::SeqCst),
                        })));
                        Ok(record)
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Skipping file");
                        events.send(Event::Metadata(MetadataEvent::Error {
                            path: path.clone(),
                            message: e.to_string(),
                        }));
                        Err(e.to_string())
                    }
                }
            })
            .collect();

        let mut photos = PhotoSet::new();
        let mut failed = 0;
        for outcome in resolved {
            match outcome {
                Ok(record) => {
                    photos.add(record);
                }
                Err(message) => {
                    failed += 1;
                    errors.push(message);
                }
            }
        }

        events.send(Event::Metadata(MetadataEvent::Completed {
            resolved: photos.len(),
            failed,
        }));

        photos
    }
}
