use serde::Serialize;

/// Number of leading rows scanned when looking for the header row.
pub const HEADER_SCAN_ROWS: usize = 10;

/// One named sheet of the workbook, reduced to display strings
///
/// `headers` and every row in `rows` have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Build a table from raw rows, detecting the header row first
    ///
    /// Rows above the header and fully blank rows are discarded. Columns with
    /// no header and no data are removed, blank headers of populated columns
    /// become `Column N`, and short rows are padded.
    ///
    /// # Arguments
    /// * `name` - Sheet name
    /// * `raw` - Cell text in row-major order, as read from the workbook
    /// * `label_candidates` - Header names that identify the class label column
    ///
    /// # Returns
    /// * `SheetTable` - The normalized table (empty when `raw` has no content)
    pub fn from_raw_rows(name: &str, raw: Vec<Vec<String>>, label_candidates: &[String]) -> Self {
        let raw: Vec<Vec<String>> = raw
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.trim().to_string()).collect())
            .collect();

        let header_idx = match detect_header_row(&raw, label_candidates) {
            Some(idx) => idx,
            None => {
                return SheetTable {
                    name: name.to_string(),
                    headers: Vec::new(),
                    rows: Vec::new(),
                };
            }
        };

        let mut rows = raw;
        let body = rows.split_off(header_idx + 1);
        let header = rows.pop().unwrap_or_default();
        let body: Vec<Vec<String>> = body.into_iter().filter(|row| !is_blank(row)).collect();

        let width = body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let keep: Vec<usize> = (0..width)
            .filter(|&c| {
                let named = header.get(c).is_some_and(|h| !h.is_empty());
                named || body.iter().any(|row| row.get(c).is_some_and(|v| !v.is_empty()))
            })
            .collect();

        let headers = keep
            .iter()
            .map(|&c| match header.get(c) {
                Some(h) if !h.is_empty() => h.clone(),
                _ => format!("Column {}", c + 1),
            })
            .collect();

        let rows = body
            .iter()
            .map(|row| {
                keep.iter()
                    .map(|&c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        SheetTable {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Find a column by header name, trying each candidate in order
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn column_index(&self, candidates: &[String]) -> Option<usize> {
        candidates.iter().find_map(|candidate| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(candidate.trim()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// Locate the header row of an inconsistently shaped sheet
///
/// Looks only at the first [`HEADER_SCAN_ROWS`] rows. The first row holding
/// one of the label column names wins. Otherwise the first row with at least
/// two non-empty cells covering half of the widest row is used, and failing
/// that the first non-blank row.
///
/// # Arguments
/// * `rows` - Trimmed cell text, row-major
/// * `label_candidates` - Header names that identify the class label column
///
/// # Returns
/// * `Option<usize>` - Index of the header row, or None when every row is blank
///
/// # Examples
/// ```
/// use heads_up::table::detect_header_row;
///
/// let rows = vec![
///     vec!["Spring Session".to_string()],
///     vec![],
///     vec!["Student".to_string(), "Class".to_string()],
///     vec!["Ada".to_string(), "Ballet 1 M".to_string()],
/// ];
/// assert_eq!(detect_header_row(&rows, &["class".to_string()]), Some(2));
/// ```
pub fn detect_header_row(rows: &[Vec<String>], label_candidates: &[String]) -> Option<usize> {
    let scanned = &rows[..rows.len().min(HEADER_SCAN_ROWS)];

    let by_label = scanned.iter().position(|row| {
        row.iter().any(|cell| {
            label_candidates
                .iter()
                .any(|c| cell.trim().eq_ignore_ascii_case(c.trim()))
        })
    });
    if by_label.is_some() {
        return by_label;
    }

    let filled = |row: &Vec<String>| row.iter().filter(|c| !c.trim().is_empty()).count();
    let widest = scanned.iter().map(filled).max().unwrap_or(0);
    let dense = scanned.iter().position(|row| {
        let n = filled(row);
        n >= 2 && n * 2 >= widest
    });
    if dense.is_some() {
        return dense;
    }

    rows.iter().position(|row| filled(row) > 0)
}
