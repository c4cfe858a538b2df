//! CSV store codec.
//!
//! The store is UTF-8 text with `\n` line separators and no quoting:
//!
//! ```text
//! added,channel_count,total_capacity,tor_nodes,clearnet_nodes,unannounced_nodes,clearnet_tor_nodes
//! 1700000000000,59000,499000000000,9900,1990,290,1490
//! 1700086400000,60000,500000000000,10000,2000,300,1500
//! ```
//!
//! The first line is the header and appears only once the first row is
//! written. The first column of every data row is a millisecond timestamp.
//! Files are written without a trailing newline; one trailing newline is
//! tolerated on read.

use crate::delta::TimestampedRecord;
use crate::error::{SyncError, SyncResult};
use lnstats_source::STAT_FIELDS;

const SEPARATOR: char = ',';
const LINE_END: char = '\n';

/// Summary of a store's content needed to resume a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSnapshot {
    /// Whether the header line is present.
    pub has_header: bool,
    /// Number of data rows after the header.
    pub data_rows: usize,
    /// Timestamp of the last data row, or 0 if there are no data rows.
    pub watermark: u64,
}

impl StoreSnapshot {
    /// Returns true if the store holds no lines at all.
    pub fn is_empty(&self) -> bool {
        !self.has_header
    }
}

/// Returns the header line for the declared schema.
pub fn header_line() -> String {
    STAT_FIELDS.join(",")
}

/// Encodes one record as a data row, in header order.
pub fn encode_row(record: &TimestampedRecord) -> String {
    let mut row = record.added_ms.to_string();
    for value in record.stats.gauge_values() {
        row.push(SEPARATOR);
        row.push_str(&value);
    }
    row
}

fn strip_line_end(text: &str) -> &str {
    text.strip_suffix(LINE_END).unwrap_or(text)
}

/// Parses the timestamp of a data row, checking the column count.
fn parse_row_timestamp(row: &str) -> Result<u64, String> {
    let columns: Vec<&str> = row.split(SEPARATOR).collect();
    if columns.len() != STAT_FIELDS.len() {
        return Err(format!(
            "expected {} columns, found {}",
            STAT_FIELDS.len(),
            columns.len()
        ));
    }
    columns[0]
        .parse::<u64>()
        .map_err(|_| format!("timestamp {:?} is not a non-negative integer", columns[0]))
}

fn check_header(header: &str) -> Result<(), String> {
    let expected = header_line();
    if header == expected {
        Ok(())
    } else {
        Err(format!("expected header {expected:?}, found {header:?}"))
    }
}

/// Parses the store content and extracts its watermark.
///
/// Only the header and the last row are examined; use [`verify_store`] for
/// a full scan.
///
/// # Errors
///
/// Returns [`SyncError::CorruptStore`] if the header does not match the
/// schema or the last row cannot be parsed. An unreadable last row is never
/// treated as a zero watermark.
pub fn parse_store(text: &str) -> SyncResult<StoreSnapshot> {
    let body = strip_line_end(text);
    if body.is_empty() {
        return Ok(StoreSnapshot::default());
    }

    let mut lines = body.split(LINE_END);
    if let Some(header) = lines.next() {
        check_header(header).map_err(|reason| SyncError::corrupt(1, reason))?;
    }

    let mut data_rows = 0usize;
    let mut last_row = None;
    for line in lines {
        data_rows += 1;
        last_row = Some(line);
    }

    let watermark = match last_row {
        Some(row) => {
            parse_row_timestamp(row).map_err(|reason| SyncError::corrupt(data_rows + 1, reason))?
        }
        None => 0,
    };

    Ok(StoreSnapshot {
        has_header: true,
        data_rows,
        watermark,
    })
}

/// Builds the new store content with `rows` appended.
///
/// The header is synthesized when the store is empty. Existing content is
/// kept byte-for-byte apart from a trailing newline.
pub fn append_rows(existing: &str, snapshot: &StoreSnapshot, rows: &[TimestampedRecord]) -> String {
    let mut out = if snapshot.is_empty() {
        header_line()
    } else {
        strip_line_end(existing).to_string()
    };
    for row in rows {
        out.push(LINE_END);
        out.push_str(&encode_row(row));
    }
    out
}

/// A single problem found while verifying a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIssue {
    /// 1-based line number.
    pub line: usize,
    /// Description of the problem.
    pub message: String,
}

/// Result of a full store scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReport {
    /// Number of data rows checked.
    pub rows_checked: usize,
    /// Number of rows without issues.
    pub valid_rows: usize,
    /// Smallest timestamp seen.
    pub first_timestamp: Option<u64>,
    /// Timestamp of the last parsable row.
    pub last_timestamp: Option<u64>,
    /// Problems found.
    pub issues: Vec<StoreIssue>,
}

impl StoreReport {
    /// Returns true if no issues were found.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    fn push_issue(&mut self, line: usize, message: String) {
        self.issues.push(StoreIssue { line, message });
    }
}

/// Scans every row of the store.
///
/// Checks the header, the column count and numeric content of each row,
/// and that timestamps are strictly increasing.
pub fn verify_store(text: &str) -> StoreReport {
    let mut report = StoreReport::default();
    let body = strip_line_end(text);
    if body.is_empty() {
        return report;
    }

    let mut lines = body.split(LINE_END).enumerate();
    if let Some((_, header)) = lines.next() {
        if let Err(message) = check_header(header) {
            report.push_issue(1, message);
        }
    }

    let mut previous: Option<u64> = None;
    for (index, row) in lines {
        let line = index + 1;
        report.rows_checked += 1;

        let timestamp = match parse_row_timestamp(row) {
            Ok(ts) => ts,
            Err(message) => {
                report.push_issue(line, message);
                continue;
            }
        };

        let mut row_ok = true;
        for (column, value) in row.split(SEPARATOR).enumerate().skip(1) {
            if value.parse::<f64>().is_err() {
                report.push_issue(
                    line,
                    format!("{} value {value:?} is not numeric", STAT_FIELDS[column]),
                );
                row_ok = false;
            }
        }

        if let Some(prev) = previous {
            if timestamp <= prev {
                report.push_issue(
                    line,
                    format!("timestamp {timestamp} does not increase past {prev}"),
                );
                row_ok = false;
            }
        }

        report.first_timestamp = Some(
            report
                .first_timestamp
                .map_or(timestamp, |first| first.min(timestamp)),
        );
        report.last_timestamp = Some(timestamp);
        previous = Some(timestamp);
        if row_ok {
            report.valid_rows += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnstats_source::StatRecord;

    const HEADER: &str =
        "added,channel_count,total_capacity,tor_nodes,clearnet_nodes,unannounced_nodes,clearnet_tor_nodes";

    fn record(added_ms: u64) -> TimestampedRecord {
        TimestampedRecord {
            added_ms,
            stats: StatRecord {
                added: (added_ms / 1000) as u32,
                channel_count: 10,
                total_capacity: 20.5,
                tor_nodes: 30,
                clearnet_nodes: 40,
                unannounced_nodes: 50,
                clearnet_tor_nodes: 60,
            },
        }
    }

    #[test]
    fn header_matches_schema() {
        assert_eq!(header_line(), HEADER);
    }

    #[test]
    fn encode_row_puts_timestamp_first() {
        assert_eq!(encode_row(&record(5000)), "5000,10,20.5,30,40,50,60");
    }

    #[test]
    fn empty_store_has_zero_watermark() {
        assert_eq!(parse_store("").unwrap(), StoreSnapshot::default());
        assert!(parse_store("").unwrap().is_empty());
    }

    #[test]
    fn header_only_store_has_zero_watermark() {
        let snapshot = parse_store(HEADER).unwrap();
        assert!(snapshot.has_header);
        assert_eq!(snapshot.data_rows, 0);
        assert_eq!(snapshot.watermark, 0);
    }

    #[test]
    fn watermark_is_last_row_timestamp() {
        let text = format!("{HEADER}\n1000,1,2,3,4,5,6\n2000,1,2,3,4,5,6");
        let snapshot = parse_store(&text).unwrap();
        assert_eq!(snapshot.data_rows, 2);
        assert_eq!(snapshot.watermark, 2000);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let text = format!("{HEADER}\n1000,1,2,3,4,5,6\n");
        assert_eq!(parse_store(&text).unwrap().watermark, 1000);
    }

    #[test]
    fn non_numeric_last_timestamp_is_corrupt() {
        let text = format!("{HEADER}\n1000,1,2,3,4,5,6\nabc,1,2,3,4,5,6");
        let err = parse_store(&text).unwrap_err();
        assert!(matches!(err, SyncError::CorruptStore { line: 3, .. }));
    }

    #[test]
    fn truncated_last_row_is_corrupt() {
        let text = format!("{HEADER}\n1000,1,2");
        let err = parse_store(&text).unwrap_err();
        assert!(matches!(err, SyncError::CorruptStore { line: 2, .. }));
    }

    #[test]
    fn foreign_header_is_corrupt() {
        let err = parse_store("time,value\n1,2").unwrap_err();
        assert!(matches!(err, SyncError::CorruptStore { line: 1, .. }));
    }

    #[test]
    fn append_to_empty_store_writes_header() {
        let out = append_rows("", &StoreSnapshot::default(), &[record(1000)]);
        assert_eq!(out, format!("{HEADER}\n1000,10,20.5,30,40,50,60"));
    }

    #[test]
    fn append_keeps_existing_content() {
        let existing = format!("{HEADER}\n1000,10,20.5,30,40,50,60\n");
        let snapshot = parse_store(&existing).unwrap();
        let out = append_rows(&existing, &snapshot, &[record(2000), record(3000)]);
        assert_eq!(
            out,
            format!(
                "{HEADER}\n1000,10,20.5,30,40,50,60\n2000,10,20.5,30,40,50,60\n3000,10,20.5,30,40,50,60"
            )
        );
    }

    #[test]
    fn verify_clean_store() {
        let text = format!("{HEADER}\n1000,1,2,3,4,5,6\n2000,1,2.5,3,4,5,6");
        let report = verify_store(&text);
        assert!(report.is_ok());
        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.valid_rows, 2);
        assert_eq!(report.first_timestamp, Some(1000));
        assert_eq!(report.last_timestamp, Some(2000));
    }

    #[test]
    fn verify_flags_order_violation() {
        let text = format!("{HEADER}\n2000,1,2,3,4,5,6\n2000,1,2,3,4,5,6\n1000,1,2,3,4,5,6");
        let report = verify_store(&text);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].line, 3);
        assert_eq!(report.issues[1].line, 4);
        assert_eq!(report.valid_rows, 1);
    }

    #[test]
    fn verify_flags_malformed_rows() {
        let text = format!("{HEADER}\n1000,1,x,3,4,5,6\n2000,1");
        let report = verify_store(&text);
        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.valid_rows, 0);
        assert!(report.issues[0].message.contains("total_capacity"));
        assert!(report.issues[1].message.contains("columns"));
    }

    #[test]
    fn verify_empty_store() {
        let report = verify_store("");
        assert!(report.is_ok());
        assert_eq!(report.rows_checked, 0);
    }
}
