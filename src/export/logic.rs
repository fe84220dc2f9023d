// src/export/logic.rs

use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::csv_export::export_csv;
use crate::export::xlsx::export_xlsx;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Writes every stored entry to `file`, replacing any previous export.
    ///
    /// Rows follow store order (chronological). The parent directory must
    /// already exist; the resolved output path is returned.
    pub fn export(store: &Store, format: ExportFormat, file: &Path) -> AppResult<PathBuf> {
        let path = resolve_output(file)?;

        let entries = store.get_all()?;

        match format {
            ExportFormat::Csv => export_csv(&entries, &path)?,
            ExportFormat::Xlsx => export_xlsx(&entries, &path)?,
        }

        info!(
            "{} export completed: {} ({} rows)",
            format.label(),
            path.display(),
            entries.len()
        );
        Ok(path)
    }
}

/// Absolute output path; fails when the target directory does not exist.
fn resolve_output(file: &Path) -> AppResult<PathBuf> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()?.join(file)
    };

    let parent = path.parent().ok_or_else(|| {
        AppError::from(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid export path: {}", path.display()),
        ))
    })?;

    if !parent.is_dir() {
        return Err(AppError::from(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Export directory not found: {}", parent.display()),
        )));
    }

    Ok(path)
}
