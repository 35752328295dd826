//! Best completion time persistence
//!
//! A single JSON file holding the fastest surface-to-boss-kill run. Read
//! once at startup, written once when a run improves on it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default file name, placed next to the executable or in the home dir
pub const BEST_TIME_FILE: &str = ".tideward_best_time.json";

/// Stored record for the fastest completed run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BestTime {
    /// Completion time in seconds
    pub seconds: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Resolve the default best-time path (home directory, falling back to cwd)
pub fn default_path() -> PathBuf {
    std::env::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(BEST_TIME_FILE)
}

/// Load the best time, or `None` if the file is missing or unreadable.
/// Corruption is not an error; the record simply starts fresh.
pub fn load(path: &Path) -> Option<BestTime> {
    match fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<BestTime>(&json) {
            Ok(best) => {
                log::info!("Loaded best time: {:.3}s", best.seconds);
                Some(best)
            }
            Err(e) => {
                log::warn!("Best time file unreadable, starting fresh: {e}");
                None
            }
        },
        Err(_) => {
            log::info!("No best time recorded yet");
            None
        }
    }
}

/// Write the best time to disk
pub fn store(path: &Path, best: &BestTime) -> io::Result<()> {
    let json = serde_json::to_string_pretty(best).map_err(io::Error::other)?;
    fs::write(path, json)?;
    log::info!("Best time saved: {:.3}s", best.seconds);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("tideward_best_time_test.json");
        let best = BestTime {
            seconds: 182.451,
            timestamp: 1_700_000_000_000.0,
        };
        store(&path, &best).unwrap();
        assert_eq!(load(&path), Some(best));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let path = Path::new("/nonexistent/tideward_best_time.json");
        assert_eq!(load(path), None);
    }

    #[test]
    fn test_load_corrupt_file_is_none() {
        let dir = std::env::temp_dir();
        let path = dir.join("tideward_best_time_corrupt.json");
        fs::write(&path, "not json at all").unwrap();
        assert_eq!(load(&path), None);
        let _ = fs::remove_file(&path);
    }
}
