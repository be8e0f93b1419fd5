use crate::error::ReportError;
use crate::schedule::{RowClassification, classify};
use crate::table::SheetTable;
use serde::Serialize;

/// One sheet row with its schedule classification attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub cells: Vec<String>,
    pub label: String,
    pub classification: RowClassification,
}

/// An instructor's rows in schedule order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub instructor: String,
    pub headers: Vec<String>,
    pub label_column: usize,
    pub rows: Vec<ReportRow>,
}

/// Classify and order every row of an instructor's sheet
///
/// Each row keeps all of its original cells; the classification is attached
/// alongside. Rows are stable-sorted by weekday, time of day and label.
///
/// # Arguments
/// * `table` - The instructor's sheet
/// * `label_candidates` - Header names that identify the class label column
///
/// # Returns
/// * `Result<Report, ReportError>` - The ordered report, or
///   `MissingLabelColumn` when no header matches a candidate
///
/// # Examples
/// ```
/// use heads_up::report::build_report;
/// use heads_up::table::SheetTable;
///
/// let table = SheetTable {
///     name: "Lee".to_string(),
///     headers: vec!["Student".to_string(), "Class".to_string()],
///     rows: vec![
///         vec!["Ada".to_string(), "Tap 2 TU".to_string()],
///         vec!["Grace".to_string(), "Ballet 1 M".to_string()],
///     ],
/// };
/// let report = build_report(&table, &["Class".to_string()]).unwrap();
/// assert_eq!(report.rows[0].label, "Ballet 1 M");
/// ```
pub fn build_report(table: &SheetTable, label_candidates: &[String]) -> Result<Report, ReportError> {
    let label_column = table
        .column_index(label_candidates)
        .ok_or_else(|| ReportError::MissingLabelColumn(table.name.clone()))?;

    let mut rows: Vec<ReportRow> = table
        .rows
        .iter()
        .map(|cells| {
            let label = cells.get(label_column).cloned().unwrap_or_default();
            ReportRow {
                classification: classify(&label),
                label,
                cells: cells.clone(),
            }
        })
        .collect();

    // Vec::sort_by is stable, identical labels keep sheet order.
    rows.sort_by(|a, b| {
        a.classification
            .schedule_cmp(&a.label, &b.classification, &b.label)
    });

    Ok(Report {
        instructor: table.name.clone(),
        headers: table.headers.clone(),
        label_column,
        rows,
    })
}
