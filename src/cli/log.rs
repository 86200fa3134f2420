use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::ChangeRecord;

/// Writes the change record to `path` as a json array of `{"offset", "original_byte"}` objects.
pub fn write_change_log(path: &Path, record: &ChangeRecord) -> Result<()> {
    let file = File::create(path).with_context(|| format!("couldn't create log file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record).context("couldn't serialize corruption log")?;
    writer.flush().with_context(|| format!("couldn't write log file {}", path.display()))?;
    tracing::info!(event = "log_written", path = %path.display(), entries = record.len(), "corruption log written");
    Ok(())
}
