//! Reading uploaded `.xlsx` workbooks and producing the import template.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use common::import::{
    TEMPLATE_COLUMN_WIDTHS, TEMPLATE_HEADERS, TEMPLATE_SAMPLE_ROWS, TEMPLATE_SHEET_NAME,
};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::AppError;

/// Read the first worksheet of an `.xlsx` workbook as rows of cell text.
///
/// Rows and columns are positioned as in the sheet, starting at A1, even when
/// the used range starts further down or to the right.
pub fn read_first_sheet(data: &[u8]) -> Result<Vec<Vec<String>>, AppError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
        .map_err(|e| AppError::Validation(format!("Invalid spreadsheet: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Validation("Spreadsheet contains no worksheet".into()))?
        .map_err(|e| AppError::Validation(format!("Failed to read worksheet: {e}")))?;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    let mut sheet: Vec<Vec<String>> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![String::new(); first_col as usize];
        cells.extend(row.iter().map(cell_text));
        sheet.push(cells);
    }

    Ok(sheet)
}

/// Text of a cell as the user sees it. Whole numbers lose the trailing `.0`
/// so numeric exam IDs and scores read naturally.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Build the downloadable import template: a header row plus sample rows.
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET_NAME)?;

    for (col, (header, width)) in TEMPLATE_HEADERS
        .iter()
        .zip(TEMPLATE_COLUMN_WIDTHS)
        .enumerate()
    {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *header, &bold)?;
        sheet.set_column_width(col, width)?;
    }

    for (i, sample) in TEMPLATE_SAMPLE_ROWS.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, sample.full_name)?;
        sheet.write_string(row, 1, sample.sbd)?;
        // Text, so leading zeros survive.
        sheet.write_string(row, 2, sample.cccd)?;
        sheet.write_string(row, 3, sample.school)?;
        sheet.write_string(row, 4, sample.subject)?;
        sheet.write_number(row, 5, sample.score)?;
        sheet.write_string(row, 6, sample.award.label())?;
    }

    workbook.save_to_buffer()
}
