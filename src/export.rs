//! CSV export
//!
//! Writes one `<input stem>_<CATEGORY>.csv` per non-empty category,
//! columns in record order with `timestamp` first.

use std::path::{Path, PathBuf};

use crate::types::store::LogData;
use crate::Result;

/// Export every non-empty category next to the input file (or into
/// `output_dir` when given). Returns the paths written.
pub fn export_to_csv(
    data: &LogData,
    input_path: &Path,
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&dir)?;

    let mut written = Vec::new();
    for table in data.tables() {
        let path = dir.join(format!("{}_{}.csv", stem, table.category.as_str()));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        written.push(path);
    }
    Ok(written)
}
