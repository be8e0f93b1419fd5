/*!
# Heads Up Report

A small reporting web application that shows one spreadsheet sheet per
instructor as a colored, schedule-ordered HTML table.

## Overview

The workbook lives either on the local filesystem or behind a file-storage
HTTP API. Every request fetches it afresh, picks the requested instructor's
sheet, classifies each row by the weekday and time written in its class label,
and renders the rows in schedule order.

## Architecture

### Schedule classification
- **Weekday extraction** - full day names or short codes at the end of a label
  (`"Ballet 1 M"`, `"Jazz 3 Wednesday"`)
- **Time extraction** - `H:MM` followed by `A` or `P` (`"Tap 2:15P TU"`)
- **Color assignment** - one CSS class per weekday plus one for unknown labels
- Classification is total: unrecognized labels sort last instead of failing

### Sheet loading
- XLSX parsing with calamine
- Header row detection for sheets with title rows and stray columns
- Local file or remote (HTTP) workbook storage

### Web layer
- axum server with handlebars templates
- CSV and XLSX export of a single instructor's report
- Workbook download, and upload guarded by a shared secret

## Modules

- **schedule**: Label classification and schedule ordering
- **table**: Sheet model and header detection
- **loader**: Workbook parsing
- **report**: Classified, ordered instructor reports
- **downloader**: Export functionality (CSV, XLSX)
- **config**: Environment-driven settings
- **auth**: Upload secret verification
- **storage**: Workbook sources (web feature)
- **render**: HTML page rendering (web feature)
- **app**: Routing and handlers (web feature)

## REST API Endpoints

- `/?instructor={name}` - Report page (any other path serves it too)
- `/download` - Raw workbook
- `/export?instructor={name}&format=csv|xlsx` - Sorted report export
- `/api/report?instructor={name}` - Sorted report as JSON
- `/upload` - Upload form (GET) and workbook replacement (POST)
- `/health` - Liveness check
*/

pub mod auth;
pub mod config;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod report;
pub mod schedule;
pub mod table;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod render;
#[cfg(feature = "web")]
pub mod storage;

pub use error::ReportError;
pub use schedule::{RowClassification, TimeOfDay, Weekday, classify, sort_by_schedule};

/// Content type of `.xlsx` files.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
