//! Inspect command implementation.

use chrono::{DateTime, SecondsFormat, Utc};
use lnstats_storage::{FileBackend, StoreBackend};
use lnstats_sync::codec;
use serde::Serialize;
use std::path::Path;

/// Dataset summary.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    /// Dataset path.
    pub path: String,
    /// Whether the dataset file exists.
    pub exists: bool,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows.
    pub rows: usize,
    /// Timestamp of the last row in milliseconds.
    pub watermark_ms: u64,
    /// The watermark as an RFC 3339 date.
    pub watermark_utc: Option<String>,
}

/// Collects the summary of the dataset held by `backend`.
pub fn collect(
    path: &Path,
    backend: &dyn StoreBackend,
) -> Result<DatasetInfo, Box<dyn std::error::Error>> {
    let mut info = DatasetInfo {
        path: path.display().to_string(),
        exists: backend.exists()?,
        size_bytes: 0,
        rows: 0,
        watermark_ms: 0,
        watermark_utc: None,
    };
    if !info.exists {
        return Ok(info);
    }

    info.size_bytes = backend.size()?;
    let text = String::from_utf8(backend.read_all()?)?;
    let snapshot = codec::parse_store(&text)?;
    info.rows = snapshot.data_rows;
    info.watermark_ms = snapshot.watermark;
    if snapshot.data_rows > 0 {
        info.watermark_utc = i64::try_from(snapshot.watermark)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    Ok(info)
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let backend = FileBackend::new(path);
    let info = collect(path, &backend)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Dataset: {}", info.path);
    if !info.exists {
        println!("  (not created yet)");
        return Ok(());
    }
    println!("  Size:      {} bytes", info.size_bytes);
    println!("  Rows:      {}", info.rows);
    match &info.watermark_utc {
        Some(date) => println!("  Watermark: {} ({})", info.watermark_ms, date),
        None => println!("  Watermark: none"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnstats_storage::InMemoryBackend;

    #[test]
    fn missing_dataset() {
        let backend = InMemoryBackend::new();
        let info = collect(Path::new("dataset.csv"), &backend).unwrap();
        assert!(!info.exists);
        assert_eq!(info.rows, 0);
        assert!(info.watermark_utc.is_none());
    }

    #[test]
    fn populated_dataset() {
        let text = format!(
            "{}\n1699999999000,1,2,3,4,5,6\n1700000000000,1,2,3,4,5,6",
            codec::header_line()
        );
        let backend = InMemoryBackend::with_data(text.clone().into_bytes());
        let info = collect(Path::new("dataset.csv"), &backend).unwrap();

        assert!(info.exists);
        assert_eq!(info.rows, 2);
        assert_eq!(info.size_bytes, text.len() as u64);
        assert_eq!(info.watermark_ms, 1_700_000_000_000);
        assert_eq!(info.watermark_utc.as_deref(), Some("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn corrupt_dataset_is_an_error() {
        let backend = InMemoryBackend::with_data(b"garbage".to_vec());
        assert!(collect(Path::new("dataset.csv"), &backend).is_err());
    }
}
