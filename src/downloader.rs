use crate::error::ReportError;
use crate::report::{Report, ReportRow};

const DAY_HEADER: &str = "Day";
const TIME_HEADER: &str = "Time";
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Convert a report to CSV format
///
/// This function exports an instructor's report in schedule order. It creates
/// a string where:
/// - The first line holds the sheet headers followed by `Day` and `Time`
/// - Each row carries its original cells, then the derived weekday and time
/// - Fields containing commas, quotes or newlines are quoted
///
/// # Arguments
/// * `report` - Reference to the report to convert
///
/// # Returns
/// * `String` - CSV content
///
/// # Examples
/// ```
/// use heads_up::downloader::to_csv;
/// use heads_up::report::build_report;
/// use heads_up::table::SheetTable;
///
/// let table = SheetTable {
///     name: "Lee".to_string(),
///     headers: vec!["Class".to_string()],
///     rows: vec![vec!["Tap 2:15P TU".to_string()]],
/// };
/// let report = build_report(&table, &["Class".to_string()]).unwrap();
/// assert_eq!(to_csv(&report), "Class,Day,Time\nTap 2:15P TU,Tuesday,2:15 PM\n");
/// ```
pub fn to_csv(report: &Report) -> String {
    let mut csv_content = String::new();

    push_csv_line(&mut csv_content, export_headers(report).iter().map(String::as_str));
    for row in &report.rows {
        let derived = derived_cells(row);
        push_csv_line(
            &mut csv_content,
            row.cells
                .iter()
                .map(String::as_str)
                .chain(derived.iter().map(String::as_str)),
        );
    }

    csv_content
}

/// Convert a report to XLSX format
///
/// Uses the rust_xlsxwriter library to produce a single worksheet named after
/// the instructor, with a bold header row and the same columns as [`to_csv`].
///
/// # Arguments
/// * `report` - Reference to the report to convert
///
/// # Returns
/// * `Result<Vec<u8>, ReportError>` - XLSX file content as bytes or an error
pub fn to_xlsx(report: &Report) -> Result<Vec<u8>, ReportError> {
    use rust_xlsxwriter::{Format, Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(sheet_name(&report.instructor))?;

    let bold = Format::new().set_bold();
    for (c, header) in export_headers(report).iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, header, &bold)?;
    }

    for (r, row) in report.rows.iter().enumerate() {
        let derived = derived_cells(row);
        for (c, value) in row.cells.iter().chain(derived.iter()).enumerate() {
            if !value.is_empty() {
                worksheet.write_string((r + 1) as u32, c as u16, value)?;
            }
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

fn export_headers(report: &Report) -> Vec<String> {
    let mut headers = report.headers.clone();
    headers.push(DAY_HEADER.to_string());
    headers.push(TIME_HEADER.to_string());
    headers
}

fn derived_cells(row: &ReportRow) -> [String; 2] {
    let class = &row.classification;
    let day = if class.weekday.is_known() {
        class.weekday.name().to_string()
    } else {
        String::new()
    };
    let time = class.time.map(|t| t.to_string()).unwrap_or_default();
    [day, time]
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, value) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            let escaped = value.replace('"', "\"\"");
            out.push_str(&format!("\"{}\"", escaped));
        } else {
            out.push_str(value);
        }
    }
    out.push('\n');
}

/// Make an instructor name acceptable as an Excel worksheet name.
///
/// Excel rejects `[]:*?/\`, leading or trailing apostrophes, blank names and
/// names longer than 31 characters.
fn sheet_name(instructor: &str) -> String {
    let cleaned: String = instructor
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();

    if cleaned.is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}
