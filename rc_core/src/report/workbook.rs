//! Spreadsheet workbook export.
//!
//! One sheet per beam. Each sheet holds a header table at fixed cell
//! addresses and the report lines below it. [`Workbook`] is the addressed
//! cell model (serializable, carries each row's result record);
//! [`Workbook::to_xlsx`] lays it out as an `.xlsx` file.
//!
//! ```text
//! B2   1) Section and design assumptions
//! C3   fck = .. MPa, fy = .. MPa, ...
//! C4.. header   B(mm) | H(mm) | d(mm) | Dc(mm) | Mu | Vu | Ms
//! C5.. values
//! B7.. report lines
//! ```

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook as XlsxBook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};

use super::text::{render, ReportContext};
use super::beam_label;
use crate::batch::{BatchRequest, RowSummary};
use crate::codes::DesignCode;
use crate::errors::{CalcError, CalcResult};
use crate::project::ProjectInfo;

/// Maximum sheet name length accepted by spreadsheet applications
pub const MAX_SHEET_NAME: usize = 31;

/// First row used for report lines
const REPORT_START_ROW: usize = 7;

/// Header columns of the section table
const TABLE_COLUMNS: [&str; 7] = ["C", "F", "I", "L", "O", "S", "W"];

/// Merged width of each table column, in sheet columns
const TABLE_SPANS: [u16; 7] = [3, 3, 3, 3, 4, 4, 4];

/// Rows (1-based) holding the section table
const TABLE_ROWS: [u32; 2] = [4, 5];

/// Narrow grid used by the calculation sheet layout
const GRID_COLUMNS: u16 = 26;
const GRID_WIDTH: f64 = 3.0;
const FONT_SIZE: f64 = 9.0;
const HEADER_FILL: u32 = 0x0F_FF_F0;

/// A cell value: text or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

/// One addressed cell, e.g. `B2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub address: String,
    pub value: CellValue,
}

impl Cell {
    pub fn text(address: impl Into<String>, value: impl Into<String>) -> Self {
        Cell {
            address: address.into(),
            value: CellValue::Text(value.into()),
        }
    }

    pub fn number(address: impl Into<String>, value: f64) -> Self {
        Cell {
            address: address.into(),
            value: CellValue::Number(value),
        }
    }
}

/// One beam's sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<Cell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RowSummary>,
    /// Set when the row could not be checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Sheet {
    /// Value at an address, if set
    pub fn cell(&self, address: &str) -> Option<&CellValue> {
        self.cells.iter().find(|c| c.address == address).map(|c| &c.value)
    }
}

/// Workbook for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub project: ProjectInfo,
    pub code: DesignCode,
    pub generated: NaiveDate,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Lay the sheets out as an `.xlsx` document.
    pub fn to_xlsx(&self) -> CalcResult<Vec<u8>> {
        let mut book = XlsxBook::new();
        for sheet in &self.sheets {
            let worksheet = book.add_worksheet();
            write_sheet(worksheet, sheet).map_err(|e| xlsx_error(&sheet.name, e))?;
        }
        book.save_to_buffer().map_err(|e| xlsx_error("workbook", e))
    }
}

fn xlsx_error(context: &str, e: XlsxError) -> CalcError {
    CalcError::serialization(format!("Cannot build spreadsheet ({}): {}", context, e))
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxError> {
    worksheet.set_name(sheet.name.as_str())?;
    for col in 0..GRID_COLUMNS {
        worksheet.set_column_width(col, GRID_WIDTH)?;
    }

    let plain = Format::new().set_font_size(FONT_SIZE);
    let table = Format::new()
        .set_font_size(FONT_SIZE)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let header = table.clone().set_background_color(Color::RGB(HEADER_FILL));

    for cell in &sheet.cells {
        let Some((row, col)) = cell_position(&cell.address) else {
            continue;
        };
        let span = table_span(row, col);
        let format = match (span, row) {
            (Some(_), 3) => &header,
            (Some(_), _) => &table,
            (None, _) => &plain,
        };
        if let Some(span) = span {
            worksheet.merge_range(row, col, row, col + span - 1, "", format)?;
        }
        match &cell.value {
            CellValue::Text(text) => worksheet.write_string_with_format(row, col, text.as_str(), format)?,
            CellValue::Number(value) => worksheet.write_number_with_format(row, col, *value, format)?,
        };
    }
    Ok(())
}

/// Merged width of the table cell at zero-based `(row, col)`, if it is one
fn table_span(row: u32, col: u16) -> Option<u16> {
    if !TABLE_ROWS.contains(&(row + 1)) {
        return None;
    }
    TABLE_COLUMNS
        .iter()
        .zip(TABLE_SPANS)
        .find(|(letters, _)| cell_position(&format!("{}1", letters)).map(|(_, c)| c) == Some(col))
        .map(|(_, span)| span)
}

/// Zero-based `(row, col)` of an A1-style address.
pub fn cell_position(address: &str) -> Option<(u32, u16)> {
    let split = address.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = address.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let col = letters
        .bytes()
        .try_fold(0u32, |acc, b| acc.checked_mul(26)?.checked_add(u32::from(b - b'A') + 1))?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, u16::try_from(col - 1).ok()?))
}

/// Make a label usable as a sheet name: forbidden characters replaced,
/// truncated to 31 characters, and made unique within `taken`.
///
/// Spreadsheet applications compare sheet names without case, so `taken`
/// holds lowercase names.
pub fn sheet_name(label: &str, taken: &mut HashSet<String>) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    let cleaned = if cleaned.is_empty() {
        "Beam".to_string()
    } else if cleaned.eq_ignore_ascii_case("history") {
        format!("{}_", cleaned)
    } else {
        cleaned
    };

    let base: String = cleaned.chars().take(MAX_SHEET_NAME).collect();
    let mut name = base.clone();
    let mut n = 2;
    while taken.contains(&name.to_lowercase()) {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        name = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    taken.insert(name.to_lowercase());
    name
}

/// Build the workbook dated today.
pub fn build_workbook(request: &BatchRequest) -> Workbook {
    build_workbook_dated(request, Utc::now().date_naive())
}

/// Build the workbook with an explicit report date.
pub fn build_workbook_dated(request: &BatchRequest, date: NaiveDate) -> Workbook {
    let mut taken = HashSet::new();
    let sheets = request
        .check_all()
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| match outcome {
            Ok(row) => {
                let label = beam_label(index, &row.input);
                let name = sheet_name(&label, &mut taken);
                let ctx = ReportContext {
                    project: &request.project,
                    beam_label: label,
                    date,
                };
                let report = render(&row.check, &ctx);
                let mut cells = header_cells(&row);
                cells.extend(
                    report
                        .total
                        .lines()
                        .enumerate()
                        .map(|(i, line)| Cell::text(format!("B{}", REPORT_START_ROW + i), line)),
                );
                Sheet {
                    name,
                    cells,
                    summary: Some(RowSummary::from_check(&row)),
                    error: None,
                }
            }
            Err(e) => {
                let label = request
                    .row(index)
                    .map(|input| beam_label(index, &input))
                    .unwrap_or_else(|_| format!("Beam_{}", index + 1));
                Sheet {
                    name: sheet_name(&label, &mut taken),
                    cells: vec![Cell::text("B2", format!("Row {} could not be checked: {}", index + 1, e))],
                    summary: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Workbook {
        project: request.project.clone(),
        code: request.settings.code,
        generated: date,
        sheets,
    }
}

fn header_cells(row: &crate::batch::RowCheck) -> Vec<Cell> {
    let s = &row.check.section;
    let f = &row.check.flexure;
    let mut cells = vec![
        Cell::text("B2", "1) Section and design assumptions"),
        Cell::text(
            "C3",
            format!(
                "fck = {} MPa, fy = {} MPa, Øf = {:.2}, Øv = {:.2}, Es = {} MPa",
                s.fck(),
                s.fy(),
                f.phi,
                row.check.shear.phi_v,
                s.steel.es_mpa
            ),
        ),
    ];
    let headers = ["B(mm)", "H(mm)", "d(mm)", "Dc(mm)", "Mu(kN.m)", "Vu(kN)", "Ms(kN.m)"];
    let values = [
        s.b,
        s.h,
        s.d_eff,
        s.dc,
        row.input.mu,
        row.input.vu,
        row.input.ms,
    ];
    for ((col, header), value) in TABLE_COLUMNS.iter().zip(headers).zip(values) {
        cells.push(Cell::text(format!("{}4", col), header));
        cells.push(Cell::number(format!("{}5", col), value));
    }
    cells
}
