//! Production records as CSV.
//!
//! The column layout matches the spreadsheet the reports were historically
//! exported to: `Employee,Date,Store,Pieces/Hr,$/Hr,Skus/Hr`. Spreadsheet
//! exports often leave the employee cell blank on every row after the first
//! of a block, so the reader fills blank employee cells forward from the
//! last non-blank one, exactly as the owner heading carries over during
//! text extraction.

use std::io::{Read, Write};
use std::path::Path;

use prod_report_extract::{CleanOutcome, OwnerContext, clean_all};
use prod_report_production_models::{DatePolicy, RawRecord, TypedRecord};

use crate::ExportError;

/// Column captions, in file order.
pub const HEADER: [&str; 6] = ["Employee", "Date", "Store", "Pieces/Hr", "$/Hr", "Skus/Hr"];

/// Formats a metric cell; missing values are written as empty cells.
#[must_use]
pub fn format_metric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes records with a header row. Returns the number of data rows.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_records<W: Write>(records: &[TypedRecord], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for record in records {
        csv_writer.write_record([
            record.owner.clone(),
            record.date.to_string(),
            record.location.clone(),
            format_metric(record.metrics.pieces),
            format_metric(record.metrics.dollars),
            format_metric(record.metrics.skus),
        ])?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}

/// Writes records to a CSV file, creating or truncating it.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_records_to_path(records: &[TypedRecord], path: &Path) -> Result<usize, ExportError> {
    let file = std::fs::File::create(path)?;
    let count = write_records(records, std::io::BufWriter::new(file))?;
    log::info!("Wrote {count} records to {}", path.display());
    Ok(count)
}

/// Locates each required column by its (trimmed) caption.
fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], ExportError> {
    let mut indices = [0; 6];
    for (slot, caption) in indices.iter_mut().zip(HEADER) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == caption)
            .ok_or(ExportError::MissingColumn(caption))?;
    }
    Ok(indices)
}

/// Reads records from CSV and cleans them under `policy`.
///
/// Columns are found by caption, so extra columns and reordering are
/// tolerated. Blank `Employee` cells inherit the last non-blank employee;
/// rows before the first named employee are rejected as ownerless.
///
/// # Errors
///
/// Returns [`ExportError`] if the CSV is malformed or lacks a required
/// column.
pub fn read_records<R: Read>(reader: R, policy: DatePolicy) -> Result<CleanOutcome, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let [employee, date, store, pieces, dollars, skus] = column_indices(csv_reader.headers()?)?;

    let mut owner = OwnerContext::new();
    let mut raws = Vec::new();

    for result in csv_reader.records() {
        let row = result?;
        let cell = |i: usize| row.get(i).unwrap_or_default().trim();

        if !cell(employee).is_empty() {
            owner.observe(cell(employee));
        }

        raws.push(RawRecord {
            owner: owner.current().map(str::to_owned),
            date: cell(date).to_owned(),
            location: cell(store).to_owned(),
            pieces_text: cell(pieces).to_owned(),
            dollars_text: cell(dollars).to_owned(),
            skus_text: cell(skus).to_owned(),
            ..RawRecord::default()
        });
    }

    log::debug!("Read {} CSV rows", raws.len());

    Ok(clean_all(raws, policy))
}

/// Reads and cleans records from a CSV file.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be opened or parsed.
pub fn read_records_from_path(path: &Path, policy: DatePolicy) -> Result<CleanOutcome, ExportError> {
    let file = std::fs::File::open(path)?;
    let outcome = read_records(std::io::BufReader::new(file), policy)?;
    log::info!(
        "Loaded {} records from {}",
        outcome.records.len(),
        path.display()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use prod_report_production_models::{Metrics, NaiveDate, RecordDate};

    use super::*;

    fn record(owner: &str, location: &str) -> TypedRecord {
        TypedRecord {
            owner: owner.to_owned(),
            date: RecordDate::Unknown("01/05/2025".to_owned()),
            location: location.to_owned(),
            metrics: Metrics {
                pieces: Some(100.0),
                dollars: Some(4.25),
                skus: None,
            },
            ambiguities: Vec::new(),
        }
    }

    fn written(records: &[TypedRecord]) -> String {
        let mut buf = Vec::new();
        write_records(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_exact_header() {
        let text = written(&[]);
        assert_eq!(text, "Employee,Date,Store,Pieces/Hr,$/Hr,Skus/Hr\n");
    }

    #[test]
    fn writes_one_row_per_record() {
        let text = written(&[record("Jane Doe", "Main St")]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Jane Doe,01/05/2025,Main St,100,4.25,");
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let text = written(&[record("Doe, Jane", "Main St")]);
        assert!(text.lines().nth(1).unwrap().starts_with("\"Doe, Jane\","));
    }

    #[test]
    fn reads_with_fill_forward_owner() {
        let csv = "Employee,Date,Store,Pieces/Hr,$/Hr,Skus/Hr\n\
                   Jane Doe,01/05/2025,Main St,\"1,100\",$4.00,40\n\
                   ,01/06/2025,Oak St,120,$4.50,45\n\
                   Bob,01/06/2025,Oak St,90,,\n";
        let outcome = read_records(csv.as_bytes(), DatePolicy::Strict).unwrap();
        let owners: Vec<_> = outcome.records.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["Jane Doe", "Jane Doe", "Bob"]);
        assert_eq!(outcome.records[0].metrics.pieces, Some(1100.0));
        assert_eq!(outcome.records[0].metrics.dollars, Some(4.0));
        assert_eq!(outcome.records[2].metrics.dollars, None);
    }

    #[test]
    fn leading_blank_owner_rows_are_rejected() {
        let csv = "Employee,Date,Store,Pieces/Hr,$/Hr,Skus/Hr\n\
                   ,01/05/2025,Main St,100,$4.00,40\n";
        let outcome = read_records(csv.as_bytes(), DatePolicy::Strict).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.missing_owner, 1);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Employee,Date,Store\nJane,01/05/2025,Main\n";
        let err = read_records(csv.as_bytes(), DatePolicy::Strict).unwrap_err();
        assert!(matches!(err, ExportError::MissingColumn("Pieces/Hr")));
    }

    #[test]
    fn exported_records_read_back_identically() {
        let mut original = record("Jane Doe", "Main St");
        original.date = RecordDate::Parsed(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let text = written(std::slice::from_ref(&original));
        let outcome = read_records(text.as_bytes(), DatePolicy::Strict).unwrap();
        assert_eq!(outcome.records, vec![original]);
    }
}
