//! Ordered collection of photo records with derived queries.

use super::record::PhotoRecord;
use crate::core::geo::BoundingBox;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Orderings supported by [`PhotoSet::sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first; photos without a timestamp go last
    #[default]
    CapturedAt,
    /// Case-insensitive file name
    FileName,
    /// Largest first; photos without metadata go last
    FileSizeDescending,
}

/// An ordered set of photos, unique by path
///
/// Insertion order is the display order until [`PhotoSet::sort`] is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PhotoRecord>", into = "Vec<PhotoRecord>")]
pub struct PhotoSet {
    records: Vec<PhotoRecord>,
    paths: HashSet<PathBuf>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; returns `false` and leaves the set unchanged if a
    /// record with the same path is already present
    pub fn add(&mut self, record: PhotoRecord) -> bool {
        if !self.paths.insert(record.path().to_path_buf()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Remove and return the record with this path
    pub fn remove(&mut self, path: &Path) -> Option<PhotoRecord> {
        if !self.paths.remove(path) {
            return None;
        }
        let index = self.records.iter().position(|r| r.path() == path)?;
        Some(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.paths.clear();
    }

    /// Reorder the records in place (stable)
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::CapturedAt => self.records.sort_by(|a, b| {
                match (a.captured_at, b.captured_at) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
            SortOrder::FileName => self.records.sort_by_cached_key(|r| {
                r.file_name().map(|n| n.to_lowercase()).unwrap_or_default()
            }),
            SortOrder::FileSizeDescending => self.records.sort_by(|a, b| {
                match (a.file_size(), b.file_size()) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
        }
    }

    /// Reorder with a custom comparator (stable)
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&PhotoRecord, &PhotoRecord) -> Ordering,
    {
        self.records.sort_by(compare);
    }

    pub fn get(&self, path: &Path) -> Option<&PhotoRecord> {
        if !self.paths.contains(path) {
            return None;
        }
        self.records.iter().find(|r| r.path() == path)
    }

    /// Mutable access for filling in metadata after extraction
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut PhotoRecord> {
        if !self.paths.contains(path) {
            return None;
        }
        self.records.iter_mut().find(|r| r.path() == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.records.iter()
    }

    /// The records in display order
    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn with_location(&self) -> Vec<&PhotoRecord> {
        self.records.iter().filter(|r| r.is_geotagged()).collect()
    }

    pub fn without_location(&self) -> Vec<&PhotoRecord> {
        self.records.iter().filter(|r| !r.is_geotagged()).collect()
    }

    /// Fraction of photos with a location, 0.0 for an empty set
    pub fn location_coverage(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.with_location().len() as f64 / self.records.len() as f64
    }

    /// Earliest and latest capture times
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.records
            .iter()
            .filter_map(|r| r.captured_at)
            .fold(None, |range, t| match range {
                None => Some((t, t)),
                Some((min, max)) => Some((min.min(t), max.max(t))),
            })
    }

    /// Bounding box of every location in the set
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.records.iter().filter_map(|r| r.location.as_ref()))
    }

    /// Photos grouped by capture day; undated photos are left out
    pub fn group_by_date(&self) -> BTreeMap<NaiveDate, Vec<&PhotoRecord>> {
        let mut groups: BTreeMap<NaiveDate, Vec<&PhotoRecord>> = BTreeMap::new();
        for record in &self.records {
            if let Some(day) = record.capture_date() {
                groups.entry(day).or_default().push(record);
            }
        }
        groups
    }

    /// Photos grouped by lowercased extension
    pub fn group_by_extension(&self) -> BTreeMap<String, Vec<&PhotoRecord>> {
        let mut groups: BTreeMap<String, Vec<&PhotoRecord>> = BTreeMap::new();
        for record in &self.records {
            let ext = record.extension().unwrap_or_else(|| "unknown".to_string());
            groups.entry(ext).or_default().push(record);
        }
        groups
    }
}

impl From<Vec<PhotoRecord>> for PhotoSet {
    fn from(records: Vec<PhotoRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl From<PhotoSet> for Vec<PhotoRecord> {
    fn from(set: PhotoSet) -> Self {
        set.records
    }
}

impl FromIterator<PhotoRecord> for PhotoSet {
    fn from_iter<I: IntoIterator<Item = PhotoRecord>>(iter: I) -> Self {
        let mut set = PhotoSet::new();
        for record in iter {
            set.add(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PhotoSet {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
