//! Destinations for downloaded paystubs.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::models::PaystubRecord;

/// Receives materialized paystubs one at a time.
#[async_trait]
pub trait PaystubSink: Send {
    /// Stores one paystub.
    async fn deliver(&mut self, paystub: &PaystubRecord) -> io::Result<()>;
}

/// Writes each paystub as pretty JSON into a directory.
///
/// Files are named `paystub-{workerId}-{payrollId}.json`.
#[derive(Debug)]
pub struct JsonDirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonDirectorySink {
    /// Creates a sink writing into `dir`, which must exist.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn file_name(paystub: &PaystubRecord) -> String {
        let worker: String = paystub
            .employee_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("paystub-{worker}-{}.json", paystub.id)
    }
}

#[async_trait]
impl PaystubSink for JsonDirectorySink {
    async fn deliver(&mut self, paystub: &PaystubRecord) -> io::Result<()> {
        let path = self.dir.join(Self::file_name(paystub));
        let bytes = serde_json::to_vec_pretty(paystub).map_err(io::Error::other)?;
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), payroll_id = %paystub.id, "Paystub written");
        self.written.push(path);
        Ok(())
    }
}
