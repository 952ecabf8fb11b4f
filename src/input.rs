use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::domain::parse_domain_lines;
use crate::errors::InputError;

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Domains listed in `path`, in file order.
///
/// Spreadsheets and CSV files must have a header row containing `column`.
/// Any other file is read as plain text with one domain per line.
pub fn read_domains(path: &Path, column: &str) -> Result<Vec<String>> {
    info!(action = "start", component = "input", file_path = ?path, column = column, "Reading domains");

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let domains = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet_column(path, column)?
    } else if extension == "csv" {
        read_csv_column(path, column)?
    } else {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {:?}", path))?;
        parse_domain_lines(&text)
    };

    info!(action = "complete", component = "input", domain_count = domains.len(), "Domains loaded");
    Ok(domains)
}

fn read_spreadsheet_column(path: &Path, column: &str) -> Result<Vec<String>, InputError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| InputError::Workbook {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InputError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| InputError::Workbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header = rows.next().unwrap_or(&[]);
    let index = header
        .iter()
        .position(|cell| cell_text(cell) == column)
        .ok_or_else(|| InputError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })?;

    // The range starts at the first non-empty cell, not at A1
    let header_row = range.start().map_or(0, |(row, _)| row as usize);

    let mut domains = Vec::new();
    for (row_num, row) in rows.enumerate() {
        let value = row.get(index).map(cell_text).unwrap_or_default();
        if value.is_empty() {
            warn!(action = "skip", component = "input", row = sheet_row_number(header_row, row_num), "Empty cell in domain column");
            continue;
        }
        domains.push(value);
    }
    Ok(domains)
}

/// 1-based sheet row of the `index`-th data row below a header at
/// 0-based sheet row `header_row`.
fn sheet_row_number(header_row: usize, index: usize) -> usize {
    header_row + index + 2
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn read_csv_column(path: &Path, column: &str) -> Result<Vec<String>, InputError> {
    let csv_error = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let index = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| InputError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut domains = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let value = record.get(index).map(str::trim).unwrap_or_default();
        if value.is_empty() {
            warn!(action = "skip", component = "input", row = row_num + 2, "Empty cell in domain column");
            continue;
        }
        domains.push(value.to_string());
    }
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn reads_link_column_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.csv");
        fs::write(&path, "Name,Link\nGoogle,google.com\nEmpty,\nDetik, detik.com \n").unwrap();

        let domains = read_domains(&path, "Link").unwrap();
        assert_eq!(domains, vec!["google.com", "detik.com"]);
    }

    #[test]
    fn csv_without_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.csv");
        fs::write(&path, "Name,Url\nGoogle,google.com\n").unwrap();

        let err = read_domains(&path, "Link").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::MissingColumn { .. })
        ));
    }

    #[test]
    fn reads_link_column_from_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Media").unwrap();
        sheet.write_string(0, 1, "Link").unwrap();
        sheet.write_string(1, 0, "Kompas").unwrap();
        sheet.write_string(1, 1, "kompas.com").unwrap();
        sheet.write_string(3, 1, "tempo.co").unwrap();
        workbook.save(&path).unwrap();

        let domains = read_domains(&path, "Link").unwrap();
        assert_eq!(domains, vec!["kompas.com", "tempo.co"]);
    }

    #[test]
    fn xlsx_header_below_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 0, "Link").unwrap();
        sheet.write_string(3, 0, "kompas.com").unwrap();
        sheet.write_string(5, 0, "detik.com").unwrap();
        workbook.save(&path).unwrap();

        let domains = read_domains(&path, "Link").unwrap();
        assert_eq!(domains, vec!["kompas.com", "detik.com"]);

        // The blank cell sits on sheet row 5 (A5)
        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let header_row = range.start().map_or(0, |(row, _)| row as usize);
        assert_eq!(header_row, 2);
        assert_eq!(sheet_row_number(header_row, 1), 5);
        assert_eq!(sheet_row_number(0, 0), 2);
    }

    #[test]
    fn xlsx_without_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Website").unwrap();
        sheet.write_string(1, 0, "kompas.com").unwrap();
        workbook.save(&path).unwrap();

        let err = read_domains(&path, "Link").unwrap_err();
        assert!(err.to_string().contains("'Link' column not found"));
    }

    #[test]
    fn plain_text_is_line_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.txt");
        fs::write(&path, "google.com\n\nkompas.com\n").unwrap();

        assert_eq!(
            read_domains(&path, "Link").unwrap(),
            vec!["google.com", "kompas.com"]
        );
    }

    #[test]
    fn unreadable_workbook_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, "not a zip archive").unwrap();

        let err = read_domains(&path, "Link").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Workbook { .. })
        ));
    }
}
