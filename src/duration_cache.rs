/*!
 * Persistent duration cache for the fallback timing strategy.
 *
 * Maps canonical absolute clip URLs to their measured playback duration in
 * milliseconds. Recordings are treated as immutable, so entries never expire.
 * The cache is a pure optimization: a missing or corrupt cache file is
 * recovered as an empty cache, never propagated as an error.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, warn};

use crate::file_utils::FileManager;

/// Persistent mapping from clip URL to duration in milliseconds
#[derive(Debug)]
pub struct DurationCache {
    /// Backing file path
    path: PathBuf,

    /// In-memory entries
    entries: HashMap<String, u64>,
}

impl DurationCache {
    /// Load the cache from disk. A missing file yields an empty cache;
    /// unparseable content is discarded with a warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, u64>>(&content) {
                Ok(map) => {
                    debug!("Loaded {} cached clip durations from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!(
                        "Duration cache at {} is unreadable ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, entries }
    }

    /// Persist the cache atomically (temp file then rename)
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        FileManager::write_atomic(&self.path, &json)?;
        debug!("Saved {} clip durations to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    /// Look up a clip duration by its canonical URL
    pub fn get(&self, url: &str) -> Option<u64> {
        self.entries.get(url).copied()
    }

    /// Record a measured duration
    pub fn insert(&mut self, url: &str, duration_ms: u64) {
        self.entries.insert(url.to_string(), duration_ms);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
