// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::ReportTable;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export entry point.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `table` to `file` in the requested format.
    ///
    /// - `file` must be an absolute path
    /// - an existing file is replaced only with `force` or after confirmation
    /// - returns `false` when there was nothing to export
    pub fn export(
        table: &ReportTable,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<bool> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        if table.is_empty() {
            warning(format!("No {} rows to export.", table.title.to_lowercase()));
            return Ok(false);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(table, path)?,
            ExportFormat::Json => export_json(table, path)?,
            ExportFormat::Xlsx => export_xlsx(table, path)?,
        }

        Ok(true)
    }
}
