//! File discovery module for GHCN-Daily inputs
//!
//! Resolves the input path to the list of `.dly` files to decode and
//! counts the distinct stations they cover.

use crate::constants::DLY_EXTENSION;
use crate::error::{DlyError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for `.dly` inputs
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
    station_count: usize,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            station_count: 0,
        }
    }

    /// Get the current station count
    pub fn station_count(&self) -> usize {
        self.station_count
    }

    /// Discover `.dly` files under the input path
    ///
    /// A single file is used as given, whatever its extension. A directory
    /// is walked recursively, the way the GHCN-Daily archive unpacks:
    /// ```text
    /// ghcnd_all/
    ///   ACW00011604.dly
    ///   USW00094728.dly
    ///   ...
    /// ```
    /// Results are sorted by path so output order is stable.
    pub fn discover_dly_files(&mut self) -> Result<Vec<PathBuf>> {
        if !self.input_path.exists() {
            return Err(DlyError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        let mut files = if self.input_path.is_file() {
            vec![self.input_path.clone()]
        } else {
            debug!("Searching for .dly files in: {}", self.input_path.display());
            self.walk_directory()?
        };
        files.sort();

        // GHCN-Daily names each file after its station
        let stations: HashSet<&str> = files
            .iter()
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()))
            .collect();
        self.station_count = stations.len();

        debug!(
            "Found {} .dly files from {} stations",
            files.len(),
            self.station_count
        );

        Ok(files)
    }

    fn walk_directory(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.input_path) {
            let entry = entry.map_err(|e| {
                DlyError::source_unreadable(self.input_path.display().to_string(), e.into())
            })?;
            if entry.file_type().is_file() && is_dly_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

/// Check if a path has the `.dly` extension
pub fn is_dly_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DLY_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_dly_file() {
        assert!(is_dly_file(Path::new("USW00094728.dly")));
        assert!(is_dly_file(Path::new("/data/ghcnd_all/ACW00011604.DLY")));
        assert!(!is_dly_file(Path::new("ghcnd-stations.txt")));
        assert!(!is_dly_file(Path::new("README")));
    }

    #[test]
    fn test_discover_walks_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("ghcnd_all").join("US");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("USW00094728.dly"), "").unwrap();
        fs::write(temp_dir.path().join("ACW00011604.dly"), "").unwrap();
        fs::write(temp_dir.path().join("ghcnd-stations.txt"), "").unwrap();

        let mut discovery = FileDiscovery::new(temp_dir.path().to_path_buf());
        let files = discovery.discover_dly_files().unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(discovery.station_count(), 2);
    }

    #[test]
    fn test_single_file_input() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("station.txt");
        fs::write(&file, "").unwrap();

        let mut discovery = FileDiscovery::new(file.clone());
        let files = discovery.discover_dly_files().unwrap();

        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_input_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let mut discovery = FileDiscovery::new(missing.clone());
        match discovery.discover_dly_files() {
            Err(DlyError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected InputNotFound error, got {:?}", other),
        }
    }
}
