//! Verify command implementation.

use lnstats_storage::{FileBackend, StoreBackend};
use lnstats_sync::codec::{self, StoreReport};
use std::path::Path;

/// Reads and scans the dataset held by `backend`.
pub fn check(backend: &dyn StoreBackend) -> Result<StoreReport, Box<dyn std::error::Error>> {
    let text = String::from_utf8(backend.read_all()?)?;
    Ok(codec::verify_store(&text))
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying dataset at {:?}", path);
    println!();

    let backend = FileBackend::new(path);
    let report = check(&backend)?;

    println!("  Rows checked: {}", report.rows_checked);
    println!("  Valid rows:   {}", report.valid_rows);
    for issue in &report.issues {
        println!("  line {}: {}", issue.line, issue.message);
    }

    println!();
    if report.is_ok() {
        println!("✓ Dataset verification passed");
        Ok(())
    } else {
        println!("✗ Dataset verification failed");
        Err(format!("{} issues found", report.issues.len()).into())
    }
}
