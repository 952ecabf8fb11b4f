use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config::ExportFormat;
use crate::record::{TrafficRecord, COLUMN_HEADERS};

pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn export_records(records: &[TrafficRecord], path: &Path, format: ExportFormat) -> Result<()> {
    let start_time = Instant::now();
    info!(action = "start", component = "export", file_path = ?path, format = ?format, "Exporting results");

    match format {
        ExportFormat::Xlsx => {
            let mut workbook = build_workbook(records)?;
            workbook
                .save(path)
                .with_context(|| format!("Failed to write {:?}", path))?;
        }
        ExportFormat::Csv => write_csv(records, path)?,
    }

    info!(
        action = "complete",
        component = "export",
        row_count = records.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Results exported"
    );
    Ok(())
}

/// Workbook bytes, for hosts that serve the results as a download.
pub fn write_xlsx_to_buffer(records: &[TrafficRecord]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    workbook
        .save_to_buffer()
        .context("Failed to serialize workbook")
}

fn build_workbook(records: &[TrafficRecord]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, records).context("Failed to build worksheet")?;
    Ok(workbook)
}

fn fill_worksheet(worksheet: &mut Worksheet, records: &[TrafficRecord]) -> Result<(), XlsxError> {
    let header = Format::new().set_bold();
    for (col, title) in COLUMN_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in record.cells().iter().enumerate() {
            // Missing values stay blank cells
            if !cell.is_empty() {
                worksheet.write_string(row, col as u16, cell)?;
            }
        }
    }

    worksheet.set_column_width(0, 28)?;
    worksheet.set_column_width(4, 40)?;
    Ok(())
}

fn write_csv(records: &[TrafficRecord], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TrafficFields;
    use calamine::{open_workbook_auto, Data, Reader};
    use std::fs;

    fn records() -> Vec<TrafficRecord> {
        vec![
            TrafficRecord::success(
                "google.com",
                TrafficFields {
                    estimated_reach: "1,234,567".into(),
                    estimated_impressions: "9,876,543".into(),
                    monthly_visitors: "0".into(),
                },
            ),
            TrafficRecord::failure("example.com", &"HTTP 404 Not Found"),
        ]
    }

    #[test]
    fn xlsx_has_headers_and_blank_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypestat_data.xlsx");
        export_records(&records(), &path, ExportFormat::Xlsx).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 3);
        let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, COLUMN_HEADERS);
        assert_eq!(rows[1][1], Data::String("1,234,567".into()));
        assert_eq!(rows[2][0], Data::String("example.com".into()));
        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[2][4], Data::String("ERROR: HTTP 404 Not Found".into()));
    }

    #[test]
    fn csv_uses_display_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypestat_data.csv");
        export_records(&records(), &path, ExportFormat::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Website,Est. Reach,Est. Impressions,Monthly Visitors,Status")
        );
        assert_eq!(
            lines.next(),
            Some("google.com,\"1,234,567\",\"9,876,543\",0,OK")
        );
        assert_eq!(
            lines.next(),
            Some("example.com,,,,ERROR: HTTP 404 Not Found")
        );
    }

    #[test]
    fn buffer_is_a_zip_archive() {
        let bytes = write_xlsx_to_buffer(&records()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
