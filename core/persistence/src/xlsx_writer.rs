//! FILENAME: core/persistence/src/xlsx_writer.rs

use corpus::MetadataIndex;
use pivot_engine::{ColumnKind, RowDisplay, TableMode, TableRow, TableView};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

use crate::PersistenceError;

const TABLE_SHEET_NAME: &str = "Table";
const SUMMARY_SHEET_NAME: &str = "Summary";

/// Writes the visible rows of `view` to an XLSX file, plus a summary sheet.
pub fn save_table_xlsx(view: &TableView, meta: &MetadataIndex, path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let header = Format::new().set_bold();
    let percent = Format::new().set_num_format("0.00");

    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(TABLE_SHEET_NAME)?;

    // Header row
    let leading: Vec<&str> = match view.mode {
        TableMode::ByDocument => vec![meta.namespace().field_name(), "Title", "Authors", "Year"],
        TableMode::ByYear => vec!["Word group"],
    };
    let mut col: u16 = 0;
    for label in &leading {
        worksheet.write_string_with_format(0, col, *label, &header)?;
        col += 1;
    }
    for column in &view.columns {
        worksheet.write_string_with_format(0, col, column.label.as_str(), &header)?;
        col += 1;
    }
    worksheet.write_string_with_format(0, col, "Total", &header)?;

    // Body
    for (i, row) in view.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, row.id.as_str())?;

        let mut col: u16 = 1;
        if view.mode == TableMode::ByDocument {
            let display = display_for(row, meta);
            for text in [&display.title, &display.authors, &display.year] {
                if !text.is_empty() {
                    worksheet.write_string(r, col, text.as_str())?;
                }
                col += 1;
            }
        }

        for column in &view.columns {
            let value = view.cell_value(row, column);
            match column.kind {
                ColumnKind::Count => worksheet.write_number(r, col, value)?,
                ColumnKind::Percent => worksheet.write_number_with_format(r, col, value, &percent)?,
            };
            col += 1;
        }
        worksheet.write_number(r, col, row.total)?;
    }

    worksheet.set_column_width(0, 24.0)?;
    if view.mode == TableMode::ByDocument {
        worksheet.set_column_width(1, 40.0)?;
        worksheet.set_column_width(2, 28.0)?;
    }

    write_summary(xlsx.add_worksheet(), view, &header)?;

    xlsx.save(path)?;
    log::info!("wrote {} rows to {}", view.rows.len(), path.display());
    Ok(())
}

fn display_for(row: &TableRow, meta: &MetadataIndex) -> RowDisplay {
    if let Some(display) = &row.display {
        return display.clone();
    }
    meta.lookup(&row.id)
        .map(|m| RowDisplay {
            title: m.title.clone().unwrap_or_default(),
            authors: m.authors.clone().unwrap_or_default(),
            year: m.year.clone().unwrap_or_default(),
        })
        .unwrap_or_default()
}

fn write_summary(worksheet: &mut Worksheet, view: &TableView, header: &Format) -> Result<(), PersistenceError> {
    worksheet.set_name(SUMMARY_SHEET_NAME)?;
    worksheet.write_string_with_format(0, 0, "Statistic", header)?;
    worksheet.write_string_with_format(0, 1, "Value", header)?;

    let summary = &view.summary;
    let mut lines: Vec<(&str, f64)> = vec![
        ("Documents", summary.document_count as f64),
        ("Word groups", summary.topic_count as f64),
        ("Grand total", summary.grand_total),
        ("Documents without year", summary.dropped_documents as f64),
        ("Rows before filter", summary.built_row_count as f64),
        ("Rows after filter", summary.filtered_row_count as f64),
    ];
    if let Some(page) = &view.page {
        lines.push(("Page", (page.page_index + 1) as f64));
        lines.push(("Pages", page.page_count as f64));
    }

    for (i, (label, value)) in lines.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, *label)?;
        worksheet.write_number(r, 1, *value)?;
    }
    worksheet.set_column_width(0, 26.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus::{DocumentMeta, EvaluationResult, IdNamespace};
    use pivot_engine::{derive_view, ViewOptions};

    fn fixture() -> (EvaluationResult, MetadataIndex) {
        let mut result = EvaluationResult::new();
        result.add("1", "natur", 3);
        result.add("2", "krig", 2);
        let meta = MetadataIndex::from_entries(
            IdNamespace::Dhlabid,
            vec![("1".to_string(), DocumentMeta::new(Some("Sult".into()), None, Some("1890".into())))],
        );
        (result, meta)
    }

    #[test]
    fn test_writes_document_table() {
        let (result, meta) = fixture();
        let view = derive_view(&result, &meta, &ViewOptions::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.xlsx");

        save_table_xlsx(&view, &meta, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_writes_pivot_with_percent() {
        let (result, meta) = fixture();
        let options = ViewOptions { pivot_by_year: true, show_percent: true, ..ViewOptions::default() };
        let view = derive_view(&result, &meta, &options);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pivot.xlsx");

        save_table_xlsx(&view, &meta, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_display_falls_back_to_metadata() {
        let (_, meta) = fixture();
        let row = TableRow::new("1".to_string(), Default::default(), None);
        assert_eq!(display_for(&row, &meta).title, "Sult");

        let unknown = TableRow::new("9".to_string(), Default::default(), None);
        assert_eq!(display_for(&unknown, &meta), RowDisplay::default());
    }
}
