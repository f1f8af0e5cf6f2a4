//! # Telemetry Recorder
//!
//! Writes telemetry samples to JSONL (JSON Lines) files with rotation.
//!
//! Each file holds at most `max_records_per_file` samples. When a file is full
//! the recorder opens a new one, and once more than `max_files_to_keep` files
//! exist the oldest is deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;

/// One telemetry reading for one motor
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySample {
    /// Time the sample was taken
    pub timestamp: DateTime<Utc>,

    /// Motor index
    pub motor: usize,

    /// Last commanded throttle
    pub throttle: u16,

    /// Electrical RPM
    pub erpm: u32,

    /// Mechanical RPM
    pub rpm: u32,
}

/// Rotating JSONL writer
#[derive(Debug)]
pub struct TelemetryRecorder {
    log_dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    writer: Option<BufWriter<File>>,
    records_in_file: usize,
    files: VecDeque<PathBuf>,
    file_seq: u64,
}

impl TelemetryRecorder {
    /// Create a recorder writing into `log_dir`
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created
    pub fn new<P: AsRef<Path>>(
        log_dir: P,
        max_records_per_file: usize,
        max_files_to_keep: usize,
    ) -> Result<Self> {
        let log_dir = log_dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir)?;
        info!("Recording telemetry to {}", log_dir.display());

        Ok(Self {
            log_dir,
            max_records_per_file: max_records_per_file.max(1),
            max_files_to_keep: max_files_to_keep.max(1),
            writer: None,
            records_in_file: 0,
            files: VecDeque::new(),
            file_seq: 0,
        })
    }

    /// Append one sample, rotating files as needed
    ///
    /// # Errors
    ///
    /// Returns error if the sample cannot be serialized or written
    pub fn record(&mut self, sample: &TelemetrySample) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, sample)?;
            writer.write_all(b"\n")?;
            self.records_in_file += 1;
        }

        Ok(())
    }

    /// Flush buffered records to disk
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Files currently kept, oldest first
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    fn rotate(&mut self) -> Result<()> {
        self.flush()?;

        let name = format!(
            "telemetry_{}_{:04}.jsonl",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.file_seq
        );
        self.file_seq += 1;

        let path = self.log_dir.join(name);
        let file = File::create(&path)?;
        debug!("Opened telemetry file {}", path.display());

        self.writer = Some(BufWriter::new(file));
        self.records_in_file = 0;
        self.files.push_back(path);

        while self.files.len() > self.max_files_to_keep {
            if let Some(oldest) = self.files.pop_front() {
                debug!("Removing old telemetry file {}", oldest.display());
                fs::remove_file(&oldest)?;
            }
        }

        Ok(())
    }
}

impl Drop for TelemetryRecorder {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(motor: usize, erpm: u32) -> TelemetrySample {
        TelemetrySample {
            timestamp: Utc::now(),
            motor,
            throttle: 500,
            erpm,
            rpm: erpm / 7,
        }
    }

    #[test]
    fn test_record_writes_jsonl() {
        let dir = tempdir().unwrap();
        let mut recorder = TelemetryRecorder::new(dir.path(), 100, 10).unwrap();

        recorder.record(&sample(0, 50_000)).unwrap();
        recorder.record(&sample(1, 60_000)).unwrap();
        recorder.flush().unwrap();

        let files: Vec<_> = recorder.files().map(Path::to_path_buf).collect();
        assert_eq!(files.len(), 1);

        let contents = fs::read_to_string(&files[0]).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["motor"], 0);
        assert_eq!(first["erpm"], 50_000);
        assert_eq!(first["throttle"], 500);
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn test_record_rotates_files() {
        let dir = tempdir().unwrap();
        let mut recorder = TelemetryRecorder::new(dir.path(), 2, 10).unwrap();

        for i in 0..5 {
            recorder.record(&sample(0, i * 100)).unwrap();
        }
        recorder.flush().unwrap();

        // 2 + 2 + 1 records
        assert_eq!(recorder.files().count(), 3);
    }

    #[test]
    fn test_record_removes_oldest_files() {
        let dir = tempdir().unwrap();
        let mut recorder = TelemetryRecorder::new(dir.path(), 1, 2).unwrap();

        for i in 0..4 {
            recorder.record(&sample(0, i)).unwrap();
        }
        recorder.flush().unwrap();

        assert_eq!(recorder.files().count(), 2);
        let on_disk = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(on_disk, 2);
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("logs");
        let _recorder = TelemetryRecorder::new(&nested, 10, 10).unwrap();
        assert!(nested.is_dir());
    }
}
