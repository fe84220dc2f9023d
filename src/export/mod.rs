// src/export/mod.rs

mod csv_export;
pub mod logic;
mod model;
mod xlsx;

pub use logic::ExportLogic;
pub use model::HEADERS;

/// Default file name of the spreadsheet export.
pub const DEFAULT_EXPORT_FILE: &str = "practicelog_logs_export.xlsx";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "XLSX",
        }
    }

    /// Format implied by the file extension; anything unknown is XLSX.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }
}
