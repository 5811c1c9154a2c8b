//! # CLI Module
//!
//! Command-line interface for the geo photo analyzer.
//!
//! ## Usage
//! ```bash
//! # Analyze a folder
//! photo-geo analyze ~/Pictures/Italy
//!
//! # Tighter clusters, GeoJSON on stdout
//! photo-geo analyze ~/Pictures/Italy --distance-threshold 2 --output geojson
//!
//! # Write cluster membership to a spreadsheet
//! photo-geo analyze ~/Pictures/Italy --export clusters.csv
//! ```

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use geo_photo_analyzer::core::analysis::{
    AnalysisConfig, DEFAULT_DISTANCE_THRESHOLD_KM, DEFAULT_MAX_SPEED_KMH,
    DEFAULT_TIME_THRESHOLD_HOURS,
};
use geo_photo_analyzer::core::pipeline::{Pipeline, PipelineResult};
use geo_photo_analyzer::core::reporter::{export_geojson, export_to_file, ExportFormat};
use geo_photo_analyzer::error::{ExportError, GeoPhotoError, Result};
use geo_photo_analyzer::events::{Event, EventChannel, MetadataEvent, PipelineEvent, ScanEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Geo Photo Analyzer - Where and when were these photos taken?
#[derive(Parser, Debug)]
#[command(name = "photo-geo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze photo locations and timestamps
    Analyze {
        /// Directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Maximum hours between a cluster's first photo and a member
        #[arg(long, default_value_t = DEFAULT_TIME_THRESHOLD_HOURS)]
        time_threshold: f64,

        /// Maximum kilometers between a cluster's first photo and a member
        #[arg(long, default_value_t = DEFAULT_DISTANCE_THRESHOLD_KM)]
        distance_threshold: f64,

        /// Journey stops implying this speed (km/h) or more are dropped
        #[arg(long, default_value_t = DEFAULT_MAX_SPEED_KMH)]
        max_speed: f64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Also write GeoJSON (.geojson) or cluster CSV (.csv) to this file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// Full report as JSON
    Json,
    /// GeoJSON FeatureCollection for map tools
    Geojson,
}

/// Options for one `analyze` invocation
struct AnalyzeOptions {
    paths: Vec<PathBuf>,
    analysis: AnalysisConfig,
    output: OutputFormat,
    export: Option<PathBuf>,
    include_hidden: bool,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            paths,
            time_threshold,
            distance_threshold,
            max_speed,
            output,
            export,
            include_hidden,
            verbose,
        } => {
            geo_photo_analyzer::init_tracing(verbose);
            run_analyze(AnalyzeOptions {
                paths,
                analysis: AnalysisConfig::default()
                    .time_threshold_hours(time_threshold)
                    .distance_threshold_km(distance_threshold)
                    .max_speed_kmh(max_speed),
                output,
                export,
                include_hidden,
                verbose,
            })
        }
    }
}

fn run_analyze(options: AnalyzeOptions) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(options.output, OutputFormat::Pretty);

    // Resolve the export format up front so a typo doesn't cost a full scan
    let export = match options.export {
        Some(path) => {
            let format = ExportFormat::from_path(&path).ok_or_else(|| {
                GeoPhotoError::Config(format!(
                    "Cannot tell export format from {} (use .geojson or .csv)",
                    path.display()
                ))
            })?;
            Some((path, format))
        }
        None => None,
    };

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Geo Photo Analyzer").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .paths(options.paths)
        .include_hidden(options.include_hidden)
        .analysis(options.analysis)
        .build()?;

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Metadata(MetadataEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{} (geotagged: {})",
                            p.current_path.file_name().unwrap_or_default().to_string_lossy(),
                            p.geotagged
                        ));
                    }
                }
                Event::Metadata(MetadataEvent::Error { path, message }) if verbose => {
                    pb.println(format!("  {} {}: {}", style("!").yellow(), path.display(), message));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let result = result?;

    match options.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => print_json_results(&result)?,
        OutputFormat::Geojson => {
            export_geojson(&result.photos, &result.report, std::io::stdout().lock())?
        }
    }

    if let Some((path, format)) = export {
        export_to_file(&result.photos, &result.report, &path, format)?;
        if pretty {
            term.write_line(&format!(
                "{} Exported to {}",
                style("✓").green(),
                display_path(&path)
            ))
            .ok();
        }
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    let report = &result.report;
    let stats = &report.statistics;

    term.write_line("").ok();
    term.write_line(&format!("{} Analysis Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos analyzed in {:.1}s",
        style(stats.total_count).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} geotagged ({:.0}% coverage)",
        style(stats.with_location_count).cyan(),
        stats.location_coverage_ratio * 100.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} total size",
        style(format_bytes(stats.total_size_bytes)).yellow()
    ))
    .ok();

    if let Some((first, last)) = stats.date_range {
        term.write_line(&format!(
            "  {} to {}",
            style(format_time(first)).cyan(),
            style(format_time(last)).cyan()
        ))
        .ok();
    }

    if let Some(bounds) = stats.bounding_box {
        term.write_line(&format!(
            "  Area centered on {} ({:.1} km across)",
            bounds.center(),
            bounds.diagonal_km()
        ))
        .ok();
    }

    if verbose && !stats.per_extension_counts.is_empty() {
        let formats: Vec<String> = stats
            .per_extension_counts
            .iter()
            .map(|(ext, count)| format!("{ext}: {count}"))
            .collect();
        term.write_line(&format!("  {}", style(formats.join(", ")).dim()))
            .ok();
    }

    term.write_line("").ok();

    // Journey
    term.write_line(&format!("{}", style("Journey:").bold().underlined()))
        .ok();
    if report.journey.is_empty() {
        term.write_line(&format!("  {}", style("No timestamped, geotagged photos").dim()))
            .ok();
    } else {
        term.write_line(&format!(
            "  {} stops, {:.1} km",
            style(report.journey.stops.len()).cyan(),
            report.journey.total_distance_km
        ))
        .ok();
        for anomaly in &report.journey.anomalies {
            term.write_line(&format!(
                "    {} {} skipped (would need {:.0} km/h)",
                style("!").yellow(),
                display_path(&anomaly.path),
                anomaly.implied_speed_kmh
            ))
            .ok();
        }
    }
    term.write_line("").ok();

    // Clusters
    term.write_line(&format!("{}", style("Clusters:").bold().underlined()))
        .ok();
    if report.clusters.clusters.is_empty() {
        term.write_line(&format!("  {}", style("No clusters found").dim()))
            .ok();
    }
    for cluster in report
        .clusters
        .clusters
        .iter()
        .chain(report.clusters.no_location.iter())
    {
        term.write_line(&format!(
            "  {} ({} photos)",
            style(&cluster.label).bold(),
            cluster.len()
        ))
        .ok();
        if verbose {
            for member in &cluster.members {
                term.write_line(&format!("    {} {}", style("○").dim(), display_path(member)))
                    .ok();
            }
        }
    }
    term.write_line("").ok();

    // Duplicates
    if !report.duplicates.is_empty() {
        term.write_line(&format!(
            "{}",
            style("Possible Duplicates:").bold().underlined()
        ))
        .ok();

        for group in &report.duplicates {
            term.write_line(&format!(
                "  {} ({} copies, {})",
                style(&group.file_name).bold(),
                group.photos.len(),
                format_bytes(group.duplicate_size_bytes)
            ))
            .ok();

            for photo in &group.photos {
                let marker = if photo == &group.representative {
                    style("★").green().to_string()
                } else {
                    style("○").dim().to_string()
                };
                term.write_line(&format!("    {} {}", marker, display_path(photo)))
                    .ok();
            }
        }
        term.write_line("").ok();
    }

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} {} files could not be read{}",
            style("!").yellow(),
            result.errors.len(),
            if verbose { "" } else { " (use --verbose for details)" }
        ))
        .ok();
        if verbose {
            for error in &result.errors {
                term.write_line(&format!("    {}", style(error).dim())).ok();
            }
        }
    }
}

fn print_json_results(result: &PipelineResult) -> Result<()> {
    let output = serde_json::json!({
        "total_photos": result.photos.len(),
        "duration_ms": result.duration_ms,
        "errors": result.errors,
        "statistics": result.report.statistics,
        "duplicates": result.report.duplicates,
        "journey": result.report.journey,
        "clusters": result.report.clusters,
        "route": result.report.route,
    });

    let rendered = serde_json::to_string_pretty(&output).map_err(ExportError::from)?;
    println!("{}", rendered);
    Ok(())
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%b %d, %Y %H:%M").to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
