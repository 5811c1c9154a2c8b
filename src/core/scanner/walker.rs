//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{FileEnumerator, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory walker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// [`FileEnumerator`] backed by the walkdir crate
pub struct WalkDirEnumerator {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirEnumerator {
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Hidden directories are pruned, except when they are the root itself
    fn should_descend(&self, entry: &DirEntry) -> bool {
        self.config.include_hidden
            || entry.depth() == 0
            || !entry.file_type().is_dir()
            || !is_hidden(entry.path())
    }

    fn walk_root(&self, root: &Path, events: &EventSender, result: &mut ScanResult) {
        if !root.is_dir() {
            let error = ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            };
            warn!("{}", error);
            events.send(Event::Scan(ScanEvent::Error {
                path: root.to_path_buf(),
                message: error.to_string(),
            }));
            result.errors.push(error);
            return;
        }

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut directories_scanned = 0;

        for entry_result in walker.into_iter().filter_entry(|e| self.should_descend(e)) {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = match e.io_error().map(|io| io.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => {
                            ScanError::PermissionDenied { path: path.clone() }
                        }
                        _ => ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        },
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    result.errors.push(error);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                directories_scanned += 1;
                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    directories_scanned,
                    files_found: result.files.len(),
                    current_path: entry.path().to_path_buf(),
                })));
                continue;
            }

            if !self.filter.should_include(entry.path()) {
                continue;
            }

            events.send(Event::Scan(ScanEvent::FileFound {
                path: entry.path().to_path_buf(),
            }));
            result.files.push(entry.into_path());
        }

        debug!(
            root = %root.display(),
            directories = directories_scanned,
            "Finished walking"
        );
    }
}

impl FileEnumerator for WalkDirEnumerator {
    fn enumerate(&self, roots: &[PathBuf]) -> Result<ScanResult, ScanError> {
        self.enumerate_with_events(roots, &crate::events::null_sender())
    }

    fn enumerate_with_events(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        events.send(Event::Scan(ScanEvent::Started {
            paths: roots.to_vec(),
        }));

        let mut result = ScanResult::default();
        for root in roots {
            self.walk_root(root, events, &mut result);
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: result.files.len(),
        }));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        // Minimal JPEG header
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    fn enumerate(config: ScanConfig, root: &Path) -> ScanResult {
        WalkDirEnumerator::new(config)
            .enumerate(&[root.to_path_buf()])
            .unwrap()
    }

    #[test]
    fn empty_directory_returns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let result = enumerate(ScanConfig::default(), temp_dir.path());

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn finds_photos_and_skips_other_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "photo.jpg");
        touch(temp_dir.path(), "photo.heic");
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let result = enumerate(ScanConfig::default(), temp_dir.path());

        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2024").join("rome");
        fs::create_dir_all(&nested).unwrap();
        touch(temp_dir.path(), "root.jpg");
        touch(&nested, "colosseum.jpg");

        let result = enumerate(ScanConfig::default(), temp_dir.path());
        assert_eq!(result.files.len(), 2);

        let shallow = ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        assert_eq!(enumerate(shallow, temp_dir.path()).files.len(), 1);
    }

    #[test]
    fn skips_hidden_files_and_directories_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        touch(temp_dir.path(), "visible.jpg");
        touch(temp_dir.path(), ".hidden.jpg");
        touch(&hidden_dir, "thumb.jpg");

        let result = enumerate(ScanConfig::default(), temp_dir.path());
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("visible.jpg"));

        let with_hidden = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        assert_eq!(enumerate(with_hidden, temp_dir.path()).files.len(), 3);
    }

    #[test]
    fn missing_root_is_recorded_not_fatal() {
        let result = enumerate(ScanConfig::default(), Path::new("/nonexistent/path/12345"));

        assert!(result.files.is_empty());
        assert!(matches!(
            result.errors.as_slice(),
            [ScanError::DirectoryNotFound { .. }]
        ));
    }
}
