use crate::error::ReportError;
use crate::table::SheetTable;
use calamine::{Data, Reader, Xlsx};
use log::{debug, warn};
use std::io::Cursor;
use std::path::Path;

/// Every sheet of a workbook, one per instructor
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<SheetTable>,
}

impl Workbook {
    /// Parse a workbook from XLSX bytes
    ///
    /// Each worksheet is read with header detection applied, in workbook order.
    /// Sheets that calamine cannot read are skipped with a warning.
    ///
    /// # Arguments
    /// * `bytes` - Content of an `.xlsx` file
    /// * `label_candidates` - Header names that identify the class label column
    ///
    /// # Returns
    /// * `Result<Workbook, ReportError>` - The parsed workbook or a parse error
    ///
    /// # Examples
    /// ```no_run
    /// use heads_up::loader::Workbook;
    ///
    /// let bytes = std::fs::read("data/report.xlsx").unwrap();
    /// let workbook = Workbook::from_bytes(bytes, &["Class".to_string()]).unwrap();
    /// println!("{} instructors", workbook.sheets.len());
    /// ```
    pub fn from_bytes(bytes: Vec<u8>, label_candidates: &[String]) -> Result<Self, ReportError> {
        let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let mut sheets = Vec::new();

        for name in xlsx.sheet_names() {
            let range = match xlsx.worksheet_range(&name) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Skipping unreadable sheet {:?}: {}", name, e);
                    continue;
                }
            };

            let raw: Vec<Vec<String>> = range
                .rows()
                .map(|row| row.iter().map(cell_to_string).collect())
                .collect();

            let table = SheetTable::from_raw_rows(&name, raw, label_candidates);
            debug!(
                "Loaded sheet {:?}: {} columns, {} rows",
                name,
                table.headers.len(),
                table.rows.len()
            );
            sheets.push(table);
        }

        Ok(Workbook { sheets })
    }

    /// Read and parse a workbook file from disk
    pub fn from_path(path: impl AsRef<Path>, label_candidates: &[String]) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, label_candidates)
    }

    /// Names of the sheets shown as instructors
    ///
    /// # Arguments
    /// * `excluded` - Sheet names to hide, compared case-insensitively
    ///
    /// # Returns
    /// * `Vec<String>` - Sheet names in workbook order
    pub fn instructors(&self, excluded: &[String]) -> Vec<String> {
        self.sheets
            .iter()
            .map(|sheet| sheet.name.clone())
            .filter(|name| !excluded.iter().any(|x| x.trim().eq_ignore_ascii_case(name.trim())))
            .collect()
    }

    /// Look up one sheet by its exact name.
    pub fn sheet(&self, name: &str) -> Option<&SheetTable> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Render a cell as the text a reader would see in the spreadsheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string().to_uppercase(),
        other => other.to_string(),
    }
}
