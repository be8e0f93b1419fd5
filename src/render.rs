use crate::error::ReportError;
use crate::report::Report;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use handlebars::Handlebars;
use serde::Serialize;

const REPORT_TEMPLATE: &str = "report";
const UPLOAD_TEMPLATE: &str = "upload";

pub const SELECT_INSTRUCTOR_MESSAGE: &str = "Select an instructor to view student information.";

#[derive(Debug, Serialize)]
pub struct InstructorLink {
    pub name: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub color_class: &'static str,
    pub day: &'static str,
    pub time: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub csv_href: String,
    pub xlsx_href: String,
}

/// Everything the report page template needs
#[derive(Debug, Serialize)]
pub struct ReportPage {
    pub heading: String,
    pub instructors: Vec<InstructorLink>,
    pub table: Option<TableView>,
    pub message: Option<String>,
    pub updated_at: String,
    pub app_env: String,
    pub show_env_banner: bool,
}

impl ReportPage {
    /// Assemble the page model
    ///
    /// # Arguments
    /// * `instructors` - Names for the picker, in display order
    /// * `report` - The selected instructor's report, if any
    /// * `updated_at` - Preformatted timestamp
    /// * `app_env` - Environment label
    /// * `show_env_banner` - Whether to show the environment label prominently
    pub fn new(
        instructors: &[String],
        report: Option<&Report>,
        updated_at: String,
        app_env: &str,
        show_env_banner: bool,
    ) -> Self {
        let selected = report.map(|r| r.instructor.as_str());

        let instructors = instructors
            .iter()
            .map(|name| InstructorLink {
                name: name.clone(),
                href: format!("/?instructor={}", urlencoding::encode(name)),
                selected: Some(name.as_str()) == selected,
            })
            .collect();

        let table = report.map(table_view);
        let message = match table {
            Some(_) => None,
            None => Some(SELECT_INSTRUCTOR_MESSAGE.to_string()),
        };

        ReportPage {
            heading: selected.unwrap_or("Select an Instructor").to_string(),
            instructors,
            table,
            message,
            updated_at,
            app_env: app_env.to_string(),
            show_env_banner,
        }
    }
}

/// Format the "updated at" stamp in the report's zone, e.g.
/// `2026-01-15 12:00:00 CST`.
pub fn format_updated_at(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

fn table_view(report: &Report) -> TableView {
    let encoded = urlencoding::encode(&report.instructor);
    TableView {
        headers: report.headers.clone(),
        rows: report
            .rows
            .iter()
            .map(|row| {
                let class = &row.classification;
                RowView {
                    color_class: class.color_class,
                    day: if class.weekday.is_known() {
                        class.weekday.name()
                    } else {
                        ""
                    },
                    time: class.time.map(|t| t.to_string()).unwrap_or_default(),
                    cells: row.cells.clone(),
                }
            })
            .collect(),
        csv_href: format!("/export?instructor={}&format=csv", encoded),
        xlsx_href: format!("/export?instructor={}&format=xlsx", encoded),
    }
}

#[derive(Debug, Serialize)]
pub struct UploadPage {
    pub enabled: bool,
    pub message: Option<String>,
    pub app_env: String,
    pub show_env_banner: bool,
}

/// Page renderer backed by the embedded handlebars templates
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_template_string(REPORT_TEMPLATE, include_str!("./static/report.html"))?;
        registry.register_template_string(UPLOAD_TEMPLATE, include_str!("./static/upload.html"))?;
        Ok(Renderer { registry })
    }

    pub fn report_page(&self, page: &ReportPage) -> Result<String, ReportError> {
        Ok(self.registry.render(REPORT_TEMPLATE, page)?)
    }

    pub fn upload_page(&self, page: &UploadPage) -> Result<String, ReportError> {
        Ok(self.registry.render(UPLOAD_TEMPLATE, page)?)
    }
}
