use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use timesheet_core::TargetMonth;

pub fn output_path(dir: &Path, file_prefix: &str, month: &TargetMonth) -> PathBuf {
    dir.join(format!("{}-{}.csv", file_prefix, month))
}

/// Writes the CSV, creating parent directories as needed.
pub fn write_report(path: &Path, csv: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
