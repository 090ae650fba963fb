use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Cursor;

use crate::error::{DashboardError, Result};
use crate::process::RawTable;

/// Serial of 9999-12-31, the last date Excel can represent.
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Excel serial day 0 (the 1900 system, with its leap-year quirk folded in).
fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Convert an Excel serial date (days, fractional time) to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.trunc() as i64;
    let secs = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    excel_epoch()?.checked_add_signed(Duration::try_days(days)? + Duration::try_seconds(secs)?)
}

/// Render one cell the way a CSV export of the sheet would spell it.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Empty cells and formula errors.
        _ => String::new(),
    }
}

/// Parse XLSX / XLS bytes; the first worksheet's first row is the header.
pub fn read_first_sheet(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DashboardError::parse("spreadsheet", e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::parse("spreadsheet", "workbook contains no sheets"))?
        .map_err(|e| DashboardError::parse("spreadsheet", e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DashboardError::parse("spreadsheet", "first sheet is empty"))?
        .iter()
        .map(cell_text)
        .collect();

    let body = rows
        .map(|r| r.iter().map(cell_text).collect::<Vec<String>>())
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .collect();

    Ok(RawTable::new(headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::DateParser;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn serial_dates_convert() {
        // 42682 = 2016-11-08
        let ts = excel_serial_to_datetime(42682.0).unwrap();
        assert_eq!(ts.to_string(), "2016-11-08 00:00:00");
        let noon = excel_serial_to_datetime(42682.5).unwrap();
        assert_eq!(noon.format("%H:%M").to_string(), "12:00");
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn out_of_range_serials_are_empty() {
        assert_eq!(excel_serial_to_datetime(1e17), None);
        assert_eq!(excel_serial_to_datetime(-1.0), None);
        assert!(excel_serial_to_datetime(EXCEL_MAX_SERIAL).is_some());
        assert_eq!(excel_serial_to_datetime(EXCEL_MAX_SERIAL + 1.0), None);

        let huge = Data::DateTime(ExcelDateTime::new(1e17, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell_text(&huge), "");
    }

    #[test]
    fn date_cells_render_as_parseable_timestamps() {
        let cell = Data::DateTime(ExcelDateTime::new(42682.0, ExcelDateTimeType::DateTime, false));
        let text = cell_text(&cell);
        assert_eq!(text, "2016-11-08 00:00:00");
        assert_eq!(
            DateParser::default().parse(&text),
            NaiveDate::from_ymd_opt(2016, 11, 8)
        );

        let iso = Data::DateTimeIso("2016-11-08T10:30:00".into());
        assert_eq!(cell_text(&iso), "2016-11-08T10:30:00");
        assert_eq!(
            DateParser::default().parse(&cell_text(&iso)),
            NaiveDate::from_ymd_opt(2016, 11, 8)
        );
    }

    #[test]
    fn cells_render_as_text() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(261.96)), "261.96");
        assert_eq!(cell_text(&Data::Int(-7)), "-7");
        assert_eq!(cell_text(&Data::String("West".into())), "West");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = read_first_sheet(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { kind: "spreadsheet", .. }));
    }
}
