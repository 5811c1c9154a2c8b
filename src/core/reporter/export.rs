//! Export functionality for analysis results.
//!
//! GeoJSON is what a map renderer consumes: markers in display order and the
//! journey as a line. CSV lists cluster membership for spreadsheets.

use crate::core::analysis::AnalysisReport;
use crate::core::photo::PhotoSet;
use crate::error::ExportError;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    ClustersCsv,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "geojson" | "json" => Some(ExportFormat::GeoJson),
            "csv" => Some(ExportFormat::ClustersCsv),
            _ => None,
        }
    }
}

/// Build the GeoJSON `FeatureCollection` for a report
///
/// One `Point` per geotagged photo, in route order, followed by a
/// `LineString` for the journey when it has at least two stops.
pub fn geojson_value(photos: &PhotoSet, report: &AnalysisReport) -> Value {
    let mut features = Vec::new();

    for (route_index, path) in report.route.iter().enumerate() {
        let Some(record) = photos.get(path) else {
            continue;
        };
        let Some(location) = record.location else {
            continue;
        };

        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [location.longitude(), location.latitude()],
            },
            "properties": {
                "path": path.display().to_string(),
                "captured_at": record.captured_at.map(|t| t.to_rfc3339()),
                "route_index": route_index,
                "cluster": report.clusters.label_for(path),
            },
        }));
    }

    let journey_coordinates: Vec<[f64; 2]> = report
        .journey
        .stops
        .iter()
        .filter_map(|p| photos.get(p).and_then(|r| r.location))
        .map(|l| [l.longitude(), l.latitude()])
        .collect();

    if journey_coordinates.len() >= 2 {
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": journey_coordinates,
            },
            "properties": {
                "kind": "journey",
                "total_distance_km": report.journey.total_distance_km,
                "anomalies": report.journey.anomalies.len(),
            },
        }));
    }

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write the report as pretty-printed GeoJSON
pub fn export_geojson<W: Write>(
    photos: &PhotoSet,
    report: &AnalysisReport,
    mut writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, &geojson_value(photos, report))?;
    writeln!(writer)?;
    Ok(())
}

/// Export cluster membership to CSV
///
/// CSV columns: Cluster, Photo Path. The no-location bucket comes last.
pub fn export_clusters_csv<W: Write>(
    report: &AnalysisReport,
    mut writer: W,
) -> Result<(), ExportError> {
    writeln!(writer, "Cluster,Photo Path")?;

    for cluster in report
        .clusters
        .clusters
        .iter()
        .chain(report.clusters.no_location.iter())
    {
        for member in &cluster.members {
            writeln!(
                writer,
                "{},{}",
                csv_field(&cluster.label),
                csv_field(&member.display().to_string())
            )?;
        }
    }

    Ok(())
}

/// Quote a field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Export a report to a file
pub fn export_to_file(
    photos: &PhotoSet,
    report: &AnalysisReport,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    match format {
        ExportFormat::GeoJson => export_geojson(photos, report, &mut writer)?,
        ExportFormat::ClustersCsv => export_clusters_csv(report, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}
