//! CSV output for finished sample buffers.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SampleResult;

/// Writes a sample buffer to `<name>.csv` as a single row of `0`/`1` cells.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// A sink writing to `<name>.csv` inside `dir`.
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!("{name}.csv")),
        }
    }

    /// Destination path of the sample file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the buffer: one row, one cell per sample, no header.
    ///
    /// Every cell is followed by a comma, including the last one; the
    /// trailing empty field keeps the record compatible with the downstream
    /// tooling that consumes these dumps. A failure here leaves the in-memory
    /// buffer untouched.
    pub fn write(&self, samples: &[bool]) -> SampleResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut record: Vec<&str> = samples
            .iter()
            .map(|&level| if level { "1" } else { "0" })
            .collect();
        record.push("");
        writer.write_record(&record)?;
        writer.flush()?;

        info!(samples = samples.len(), path = %self.path.display(), "sample file written");
        Ok(())
    }
}
