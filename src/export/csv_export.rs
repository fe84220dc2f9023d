use crate::errors::AppResult;
use crate::export::model::{entry_to_row, get_headers};
use crate::models::LogEntry;
use csv::Writer;
use std::path::Path;

/// Scrive gli eventi in CSV nel file indicato.
pub(crate) fn export_csv(entries: &[LogEntry], path: &Path) -> AppResult<()> {
    let mut wtr = Writer::from_path(path).map_err(csv_to_io)?;

    wtr.write_record(get_headers()).map_err(csv_to_io)?;

    for e in entries {
        wtr.write_record(entry_to_row(e)).map_err(csv_to_io)?;
    }

    wtr.flush()?;
    Ok(())
}

fn csv_to_io(e: csv::Error) -> std::io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io_err) => io_err,
        other => std::io::Error::other(format!("{other:?}")),
    }
}
