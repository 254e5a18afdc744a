use chronos_core::{ChronosError, Result, RiskResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where derived results are archived.
///
/// Callers treat `record` failures as non-fatal: the result is still
/// delivered.
pub trait SampleSink {
    fn record(&mut self, result: &RiskResult) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn record(&mut self, _result: &RiskResult) -> Result<()> {
        Ok(())
    }
}

/// Appends one delivery-shaped JSON object per line.
pub struct JsonLinesSink {
    path:   PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ChronosError::Sink(format!("cannot open '{}': {e}", path.display())))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SampleSink for JsonLinesSink {
    fn record(&mut self, result: &RiskResult) -> Result<()> {
        serde_json::to_writer(&mut self.writer, result)
            .map_err(|e| ChronosError::Sink(format!("encode: {e}")))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
