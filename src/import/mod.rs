//! Bulk CSV import and the matching downloadable templates.
//!
//! Rows are read with the `csv` crate, so quoted fields containing commas
//! come back exactly as they were exported. Bad rows are collected and
//! reported together; good rows are still imported.

use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::HashMap;
use std::path::Path;

/// Errors shown before the summary is cut short.
pub const MAX_SHOWN_ERRORS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImportKind {
    Users,
    Vendors,
    Devices,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Users => "users",
            ImportKind::Vendors => "vendors",
            ImportKind::Devices => "devices",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Users => &["name", "mobile", "email", "role", "partner_id"],
            ImportKind::Vendors => &["name", "partner_type", "contact_person", "phone"],
            ImportKind::Devices => &["venue_name", "device_id"],
        }
    }

    fn sample(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Users => &["Asha Rao", "9876543210", "asha@example.com", "Invigilator", ""],
            ImportKind::Vendors => &["EyeWatch CCTV", "CCTV", "R. Mehta", "9123456780"],
            ImportKind::Devices => &["Central School Hall", "BIO-001"],
        }
    }
}

/// One data row, addressable by header name.
pub struct CsvRow {
    /// 1-based line number in the file, header included
    pub line: usize,
    fields: HashMap<String, String>,
}

impl CsvRow {
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        summarize_errors(&self.errors, MAX_SHOWN_ERRORS)
    }
}

/// First `max` errors, then "...and N more errors".
pub fn summarize_errors(errors: &[String], max: usize) -> String {
    let mut lines: Vec<String> = errors.iter().take(max).cloned().collect();
    if errors.len() > max {
        lines.push(format!("...and {} more errors", errors.len() - max));
    }
    lines.join("\n")
}

pub fn check_extension(path: &Path) -> AppResult<()> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !ok {
        return Err(AppError::invalid(
            "file",
            format!("{} is not a .csv file", path.display()),
        ));
    }
    Ok(())
}

/// Read every data row, failing early only on a missing file, a wrong
/// extension or missing header columns.
pub fn read_rows(path: &Path, kind: ImportKind) -> AppResult<Vec<AppResult<CsvRow>>> {
    check_extension(path)?;

    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing: Vec<&str> = kind
        .headers()
        .iter()
        .filter(|h| !headers.iter().any(|x| x == *h))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Import(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let line = i + 2;
        out.push(
            rec.map_err(|e| AppError::Import(format!("Row {}: {}", line, e)))
                .and_then(|r| to_row(&headers, &r, line)),
        );
    }
    Ok(out)
}

fn to_row(headers: &[String], rec: &StringRecord, line: usize) -> AppResult<CsvRow> {
    if rec.len() != headers.len() {
        return Err(AppError::Import(format!(
            "Row {}: expected {} fields, found {}",
            line,
            headers.len(),
            rec.len()
        )));
    }
    let fields = headers
        .iter()
        .cloned()
        .zip(rec.iter().map(str::to_string))
        .collect();
    Ok(CsvRow { line, fields })
}

/// Feed each row to `apply`, collecting per-row failures.
pub fn import_rows<F>(rows: Vec<AppResult<CsvRow>>, mut apply: F) -> ImportReport
where
    F: FnMut(&CsvRow) -> AppResult<()>,
{
    let mut report = ImportReport::default();

    for row in rows {
        match row.and_then(|r| apply(&r).map_err(|e| row_error(r.line, e))) {
            Ok(()) => report.imported += 1,
            Err(e) => report.errors.push(error_text(e)),
        }
    }

    report
}

fn row_error(line: usize, e: AppError) -> AppError {
    AppError::Import(format!("Row {}: {}", line, e))
}

fn error_text(e: AppError) -> String {
    match e {
        AppError::Import(msg) => msg,
        other => other.to_string(),
    }
}

/// Header plus one sample row.
pub fn write_template(path: &Path, kind: ImportKind) -> AppResult<()> {
    check_extension(path)?;
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(kind.headers())?;
    wtr.write_record(kind.sample())?;
    wtr.flush()?;
    Ok(())
}
