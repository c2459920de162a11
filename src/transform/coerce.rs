//! Per-column type coercion of raw cells into [`OrderRecord`]s.
//!
//! Coercion is all-or-nothing: the first cell that cannot be parsed aborts the
//! whole table. Null cells are not parse failures; they become `None` and are
//! left to the validity filter.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{OrderRecord, RawTable, RawValue};
use crate::error::TransformError;
use crate::transform::schema::ColumnIndex;

const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// Time of day is parsed only to be discarded.
const DATETIME_FMTS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Coerce every row of `table` into a canonical [`OrderRecord`].
pub fn coerce_rows(table: &RawTable, cols: &ColumnIndex) -> Result<Vec<OrderRecord>, TransformError> {
    let mut out = Vec::with_capacity(table.len());

    for r in 0..table.len() {
        // 1-based for error messages.
        let row = r + 1;
        let cell = |c: usize| table.cell(r, c);

        out.push(OrderRecord {
            order_id: coerce_int(cell(cols.order_id), "order_id", row)?,
            customer_id: coerce_int(cell(cols.customer_id), "customer_id", row)?,
            order_date: coerce_date(cell(cols.order_date), "order_date", row)?,
            item: coerce_text(cell(cols.item)),
            quantity: coerce_float(cell(cols.quantity), "quantity", row)?,
            price: coerce_float(cell(cols.price), "price", row)?,
            city: coerce_text(cell(cols.city)),
            country: coerce_text(cell(cols.country)),
        });
    }

    Ok(out)
}

/// Parse a calendar date from the common string representations.
///
/// ISO dates, `YYYY/MM/DD`, month-first `MM/DD/YYYY`, compact `YYYYMMDD`,
/// and date-times (including RFC 3339). Any time-of-day is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return Some(d);
        }
    }

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // Keeps the calendar date in the timestamp's own offset.
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn coerce_int(cell: &RawValue, column: &'static str, row: usize) -> Result<Option<i64>, TransformError> {
    if cell.is_null() {
        return Ok(None);
    }
    let parsed = match cell {
        RawValue::Int(v) => Some(*v),
        RawValue::Float(v) => integral_f64(*v),
        RawValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        RawValue::Null => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| coercion_error(cell, column, row, "integer"))
}

fn coerce_float(cell: &RawValue, column: &'static str, row: usize) -> Result<Option<f64>, TransformError> {
    if cell.is_null() {
        return Ok(None);
    }
    let parsed = match cell {
        RawValue::Int(v) => Some(*v as f64),
        RawValue::Float(v) => Some(*v),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Null => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| coercion_error(cell, column, row, "number"))
}

fn coerce_date(cell: &RawValue, column: &'static str, row: usize) -> Result<Option<NaiveDate>, TransformError> {
    if cell.is_null() {
        return Ok(None);
    }
    let parsed = match cell {
        RawValue::Text(s) => parse_date(s),
        // Only meaningful as a compact YYYYMMDD date.
        RawValue::Int(v) => parse_date(&v.to_string()),
        RawValue::Float(_) | RawValue::Null => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| coercion_error(cell, column, row, "date"))
}

fn coerce_text(cell: &RawValue) -> Option<String> {
    if cell.is_null() {
        return None;
    }
    Some(cell.to_string())
}

fn integral_f64(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    if v.is_finite() && v.fract() == 0.0 && in_range {
        Some(v as i64)
    } else {
        None
    }
}

fn coercion_error(cell: &RawValue, column: &'static str, row: usize, expected: &'static str) -> TransformError {
    TransformError::Coercion {
        column,
        row,
        value: cell.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        assert_eq!(parse_date("2025-09-01"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("2025/09/01"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("09/01/2025"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("20250901"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("2025-09-01 23:59:59"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("2025-09-01T08:30:00.250"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("2025-09-01T23:30:00-05:00"), Some(ymd(2025, 9, 1)));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn int_coercion_is_strict_about_fractions() {
        assert_eq!(coerce_int(&RawValue::from("42"), "order_id", 1), Ok(Some(42)));
        assert_eq!(coerce_int(&RawValue::from("42.0"), "order_id", 1), Ok(Some(42)));
        assert_eq!(coerce_int(&RawValue::Float(7.0), "order_id", 1), Ok(Some(7)));
        assert_eq!(coerce_int(&RawValue::Null, "order_id", 1), Ok(None));

        let err = coerce_int(&RawValue::from("4.5"), "order_id", 3).unwrap_err();
        assert_eq!(
            err,
            TransformError::Coercion {
                column: "order_id",
                row: 3,
                value: "4.5".to_string(),
                expected: "integer",
            }
        );
        assert!(coerce_int(&RawValue::from("abc"), "customer_id", 1).is_err());
    }

    #[test]
    fn float_coercion_accepts_ints_and_text() {
        assert_eq!(coerce_float(&RawValue::Int(2), "quantity", 1), Ok(Some(2.0)));
        assert_eq!(coerce_float(&RawValue::from(" 1.5 "), "price", 1), Ok(Some(1.5)));
        assert_eq!(coerce_float(&RawValue::from(""), "price", 1), Ok(None));
        assert!(coerce_float(&RawValue::from("cheap"), "price", 1).is_err());
    }

    #[test]
    fn date_coercion_rejects_numbers_that_are_not_dates() {
        assert_eq!(
            coerce_date(&RawValue::Int(20250901), "order_date", 1),
            Ok(Some(ymd(2025, 9, 1)))
        );
        assert!(coerce_date(&RawValue::Float(1.5), "order_date", 1).is_err());
        assert!(coerce_date(&RawValue::from("not a date"), "order_date", 2).is_err());
    }

    #[test]
    fn text_columns_render_numbers() {
        assert_eq!(coerce_text(&RawValue::Int(5)), Some("5".to_string()));
        assert_eq!(coerce_text(&RawValue::from("NA")), None);
    }
}
