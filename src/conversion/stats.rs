//! Statistics for tree conversion runs

use serde::Serialize;
use std::time::Duration;

/// Counters collected over one conversion run
#[derive(Debug, Clone, Serialize)]
pub struct TreeStatistics {
    /// Regular files visited by the walk
    pub files_visited: usize,
    /// Files converted and written
    pub files_written: usize,
    /// Files that failed at any stage
    pub files_failed: usize,
    /// Directories seen and skipped
    pub directories: usize,
    /// Unfollowed symlinks and special files left out of the run
    pub skipped: usize,
    /// Source bytes of visited files
    pub bytes_read: u64,
    /// Converted bytes written
    pub bytes_written: u64,
    /// Wall-clock time of the run in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of when statistics were collected
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl Default for TreeStatistics {
    fn default() -> Self {
        Self {
            files_visited: 0,
            files_written: 0,
            files_failed: 0,
            directories: 0,
            skipped: 0,
            bytes_read: 0,
            bytes_written: 0,
            processing_time_ms: 0,
            collected_at: chrono::Utc::now(),
        }
    }
}

impl TreeStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a file that was written
    pub fn record_written(&mut self, bytes_read: u64, bytes_written: u64) {
        self.files_visited += 1;
        self.files_written += 1;
        self.bytes_read += bytes_read;
        self.bytes_written += bytes_written;
    }

    /// Count a file that failed
    pub fn record_failed(&mut self, bytes_read: u64) {
        self.files_visited += 1;
        self.files_failed += 1;
        self.bytes_read += bytes_read;
    }

    /// Stamp the run duration
    pub fn finish(&mut self, elapsed: Duration) {
        self.processing_time_ms = elapsed.as_millis() as u64;
        self.collected_at = chrono::Utc::now();
    }

    /// Percentage of visited files that were written
    pub fn success_rate(&self) -> f32 {
        if self.files_visited == 0 {
            return 100.0;
        }
        self.files_written as f32 / self.files_visited as f32 * 100.0
    }

    /// Source bytes processed per second
    pub fn throughput_bytes_per_sec(&self) -> f64 {
        if self.processing_time_ms == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / (self.processing_time_ms as f64 / 1000.0)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.processing_time_ms)
    }
}
