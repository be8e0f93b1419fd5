#![cfg(not(tarpaulin_include))]

use heads_up::config::DEFAULT_LABEL_COLUMNS;
use heads_up::loader::Workbook;
use heads_up::report::build_report;
use std::env;
use std::process::ExitCode;

/// Print the instructors of a workbook, or one instructor's ordered report
///
/// Usage: `cli <workbook.xlsx> [instructor]`
fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <workbook.xlsx> [instructor]", args[0]);
        return ExitCode::FAILURE;
    }

    let label_columns: Vec<String> = DEFAULT_LABEL_COLUMNS.iter().map(|s| s.to_string()).collect();

    let workbook = match Workbook::from_path(&args[1], &label_columns) {
        Ok(workbook) => workbook,
        Err(e) => {
            eprintln!("Error loading {}: {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    let Some(instructor) = args.get(2) else {
        for sheet in &workbook.sheets {
            println!("{} ({} rows)", sheet.name, sheet.rows.len());
        }
        return ExitCode::SUCCESS;
    };

    let Some(sheet) = workbook.sheet(instructor) else {
        eprintln!("Error: no sheet named {:?}", instructor);
        return ExitCode::FAILURE;
    };

    let report = match build_report(sheet, &label_columns) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{:<10} {:<9} {}", "DAY", "TIME", report.headers.join(" | "));
    for row in &report.rows {
        let class = &row.classification;
        let day = if class.weekday.is_known() {
            class.weekday.name()
        } else {
            "-"
        };
        let time = class
            .time
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<10} {:<9} {}", day, time, row.cells.join(" | "));
    }

    ExitCode::SUCCESS
}
