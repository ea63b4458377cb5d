//! # Reports
//!
//! - [`text`]: hand-calculation style text report for one section
//! - [`workbook`]: one sheet per row, written as `.xlsx`

pub mod text;
pub mod workbook;

pub use text::{render, ReportContext, TextReport};
pub use workbook::{build_workbook, build_workbook_dated, cell_position, sheet_name, Cell, CellValue, Sheet, Workbook};

use chrono::NaiveDate;

use crate::batch::BatchRequest;
use crate::errors::{CalcError, CalcResult};
use crate::section::RowInput;

/// Label of row `index`: its name, else `Beam_{id}`, else `Beam_{index + 1}`.
pub fn beam_label(index: usize, row: &RowInput) -> String {
    match row.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Beam_{}", row.id_label().unwrap_or_else(|| (index + 1).to_string())),
    }
}

/// Report for the first row of a request.
pub fn first_row_report(request: &BatchRequest, date: NaiveDate) -> CalcResult<TextReport> {
    if request.rows.is_empty() {
        return Err(CalcError::missing_field("rows"));
    }
    let row = request.check_row(0)?;
    let ctx = ReportContext {
        project: &request.project,
        beam_label: beam_label(0, &row.input),
        date,
    };
    Ok(render(&row.check, &ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_beam_label() {
        let named = RowInput { name: Some("G1".to_string()), ..Default::default() };
        assert_eq!(beam_label(0, &named), "G1");
        let with_id = RowInput { id: Some(json!("B-2")), ..Default::default() };
        assert_eq!(beam_label(4, &with_id), "Beam_B-2");
        let blank = RowInput { name: Some("  ".to_string()), ..Default::default() };
        assert_eq!(beam_label(4, &blank), "Beam_5");
    }

    #[test]
    fn test_first_row_report() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let empty = BatchRequest::default();
        assert_eq!(first_row_report(&empty, date).unwrap_err().error_code(), "MISSING_FIELD");

        let request = BatchRequest {
            rows: vec![json!({"name": "G1", "Mu": 450, "H": 600, "B": 400, "Dc": 60, "as_num": 6})],
            ..Default::default()
        };
        let report = first_row_report(&request, date).unwrap();
        assert!(report.total.contains("G1"));
        assert!(report.total.contains("2025-03-01"));
    }
}
