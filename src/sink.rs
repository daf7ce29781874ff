// Append-only record log
//
// One JSON object per line. The file is opened in append mode so restarts
// extend the existing series.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::messages::PositionSample;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct RecordSink {
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
}

impl RecordSink {
    /// Open (or create) the log file for appending
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        info!("Appending records to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    /// Append one record and flush it to the file
    pub async fn append(&mut self, sample: &PositionSample) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(sample)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        self.records += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this sink
    pub fn records(&self) -> u64 {
        self.records
    }
}
