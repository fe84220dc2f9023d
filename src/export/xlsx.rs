// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{DURATION_COL, entry_to_row, get_headers};
use crate::models::LogEntry;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, XlsxError};
use std::io;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

pub(crate) const SHEET_NAME: &str = "Logs";

/// Export XLSX con styling e auto-larghezza colonne.
pub(crate) fn export_xlsx(entries: &[LogEntry], path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(to_app_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let headers = get_headers();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_app_error)?;
    }

    worksheet.set_freeze_panes(1, 0).ok();

    // ---------------------------
    // Calcolo larghezze colonne
    // ---------------------------
    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Scrittura righe
    // ---------------------------
    for (row_index, entry) in entries.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        let fmt = Format::new()
            .set_background_color(band_color)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        for (col, value) in entry_to_row(entry).iter().enumerate() {
            if col == DURATION_COL {
                worksheet
                    .write_with_format(
                        row,
                        col as u16,
                        entry.duration_minutes as f64,
                        &fmt.clone().set_align(FormatAlign::Right),
                    )
                    .map_err(to_app_error)?;
            } else {
                worksheet
                    .write_with_format(row, col as u16, value.as_str(), &fmt)
                    .map_err(to_app_error)?;
            }

            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    // ---------------------------
    // Set column widths
    // ---------------------------
    for (c, w) in col_widths.iter().enumerate() {
        // le note possono essere lunghe: limite a 80 caratteri
        let w = (*w).min(80);
        worksheet
            .set_column_width(c as u16, w as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;
    Ok(())
}

fn to_app_error(e: XlsxError) -> AppError {
    match e {
        XlsxError::IoError(io_err) => AppError::Io(io_err),
        other => AppError::from(io::Error::other(other.to_string())),
    }
}
