#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};
use tempfile::{TempDir, tempdir};

pub const SAMPLE_INPUT: &str = "\
Year,Month,Day,Time,TempK
2023,01,01,0000,273.15
2023,01,01,0100,300.0
";

pub const SAMPLE_OUTPUT: &str = "\
Year,Month,Day,Time,TempF
2023,01,01,0000,32
2023,01,01,0100,80
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("read temp file")
    }
}

/// Logger that keeps every record it is handed, for asserting on diagnostics.
#[derive(Default)]
pub struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl CapturingLogger {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records
            .lock()
            .expect("logger lock")
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .expect("logger lock")
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}
