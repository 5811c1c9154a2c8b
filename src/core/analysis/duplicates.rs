//! Duplicate detection by file name and size.
//!
//! Two records are duplicates when their file names match case-insensitively
//! and their sizes are identical. This is a fast heuristic: photo content is
//! never read, so distinct images that happen to share a name and a size in
//! different folders are reported too.

use crate::core::photo::PhotoRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A set of records sharing the same (name, size) key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Unique identifier for this group
    pub id: Uuid,
    /// Lowercased file name shared by every member
    pub file_name: String,
    /// File size shared by every member
    pub file_size: u64,
    /// Members in input order
    pub photos: Vec<PathBuf>,
    /// The copy to keep (first seen)
    pub representative: PathBuf,
    /// Bytes taken by the copies beyond the representative
    pub duplicate_size_bytes: u64,
}

impl DuplicateGroup {
    fn new(file_name: String, file_size: u64, photos: Vec<PathBuf>) -> Self {
        let representative = photos[0].clone();
        let duplicate_size_bytes = file_size.saturating_mul(photos.len() as u64 - 1);
        Self {
            id: Uuid::new_v4(),
            file_name,
            file_size,
            photos,
            representative,
            duplicate_size_bytes,
        }
    }

    /// Get the number of duplicates (excluding the representative)
    pub fn duplicate_count(&self) -> usize {
        self.photos.len().saturating_sub(1)
    }
}

/// Group records by (case-insensitive name, size)
///
/// Records without metadata or without a UTF-8 file name cannot form a key
/// and are skipped. Groups come back in order of their first member.
pub fn find_duplicates(records: &[PhotoRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<(String, u64), usize> = HashMap::new();
    let mut buckets: Vec<((String, u64), Vec<PathBuf>)> = Vec::new();

    for record in records {
        let (Some(name), Some(size)) = (record.file_name(), record.file_size()) else {
            continue;
        };

        let key = (name.to_lowercase(), size);
        match index.get(&key) {
            Some(&slot) => buckets[slot].1.push(record.path().to_path_buf()),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![record.path().to_path_buf()]));
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, photos)| photos.len() >= 2)
        .map(|((name, size), photos)| DuplicateGroup::new(name, size, photos))
        .collect()
}
