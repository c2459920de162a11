//! Terminal formatting for `preview`, `query`, and the `run` summary.
//!
//! Kept in one place so the pipeline code never builds display strings.

use crate::domain::RawTable;
use crate::io::query::{QueryResult, QueryValue};
use crate::transform::TransformStats;

/// Render a raw extract as an aligned text table with a row-number gutter.
pub fn format_preview(table: &RawTable) -> String {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(table.columns().iter().cloned())
        .collect();
    let body: Vec<Vec<String>> = (0..table.len())
        .map(|r| {
            std::iter::once(r.to_string())
                .chain((0..table.columns().len()).map(|c| table.cell(r, c).to_string()))
                .collect()
        })
        .collect();

    render_aligned(&header, &body)
}

/// Render query results one tuple per line, e.g. `(1, 'Pen', 2.0)`.
pub fn format_query_rows(result: &QueryResult) -> String {
    let mut out = String::new();
    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(format_query_value).collect();
        if cells.len() == 1 {
            out.push_str(&format!("({},)\n", cells[0]));
        } else {
            out.push_str(&format!("({})\n", cells.join(", ")));
        }
    }
    out
}

/// One-line summary of a transform call.
pub fn format_run_summary(stats: &TransformStats) -> String {
    format!(
        "fact_orders={} rows, dim_customers={} rows (read {}, after cutoff {}, rejected {})",
        stats.fact_rows,
        stats.dim_rows,
        stats.rows_in,
        stats.rows_after_cutoff,
        stats.rows_rejected(),
    )
}

fn format_query_value(value: &QueryValue) -> String {
    match value {
        QueryValue::Null => "None".to_string(),
        QueryValue::Integer(v) => v.to_string(),
        // Debug keeps a trailing `.0` on whole numbers.
        QueryValue::Real(v) => format!("{v:?}"),
        QueryValue::Text(s) => quote(s),
        QueryValue::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

fn render_aligned(header: &[String], body: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:>w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = render_row(header);
    for row in body {
        out.push('\n');
        out.push_str(&render_row(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawValue;

    #[test]
    fn preview_aligns_columns() {
        let table = RawTable::from_columns([
            ("order_id", vec![RawValue::from("1"), RawValue::from("12")]),
            ("item", vec![RawValue::from("Pen"), RawValue::Null]),
        ]);
        let text = format_preview(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["   order_id  item", "0         1   Pen", "1        12"]);
    }

    #[test]
    fn query_rows_render_as_tuples() {
        let result = QueryResult {
            columns: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            rows: vec![
                vec![
                    QueryValue::Integer(1),
                    QueryValue::Text("Pen".into()),
                    QueryValue::Real(2.0),
                    QueryValue::Null,
                ],
                vec![QueryValue::Text("it's".into())],
            ],
        };
        assert_eq!(format_query_rows(&result), "(1, 'Pen', 2.0, None)\n(\"it's\",)\n");
    }

    #[test]
    fn summary_mentions_both_tables() {
        let stats = TransformStats {
            rows_in: 5,
            rows_after_cutoff: 4,
            rows_valid: 3,
            fact_rows: 3,
            dim_rows: 2,
        };
        let s = format_run_summary(&stats);
        assert!(s.starts_with("fact_orders=3 rows, dim_customers=2 rows"));
        assert!(s.contains("rejected 1"));
    }
}
