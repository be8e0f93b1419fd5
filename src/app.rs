use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::XLSX_CONTENT_TYPE;
use crate::auth::verify_upload_secret;
use crate::config::Config;
use crate::downloader;
use crate::error::ReportError;
use crate::loader::Workbook;
use crate::render::{self, ReportPage, Renderer, UploadPage};
use crate::report::{Report, build_report};
use crate::storage::{self, WorkbookSource};

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn WorkbookSource>,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn WorkbookSource>) -> Result<Self, ReportError> {
        Ok(AppState {
            config,
            source,
            renderer: Renderer::new()?,
        })
    }

    fn upload_page(&self, message: Option<String>) -> UploadPage {
        UploadPage {
            enabled: self.config.upload_secret.is_some(),
            message,
            app_env: self.config.app_env.clone(),
            show_env_banner: !self.config.is_production(),
        }
    }
}

#[derive(Deserialize)]
struct ReportQuery {
    #[serde(default)]
    instructor: String,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

#[derive(Deserialize)]
struct ExportQuery {
    instructor: String,
    #[serde(default)]
    format: ExportFormat,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportError::SheetNotFound(_) => StatusCode::NOT_FOUND,
            ReportError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ReportError::MissingLabelColumn(_) | ReportError::InvalidUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            ReportError::Unauthorized => StatusCode::UNAUTHORIZED,
            ReportError::UploadDisabled | ReportError::ReadOnlySource => StatusCode::FORBIDDEN,
            ReportError::Remote(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected ({}): {}", status, self);
        }

        (status, self.to_string()).into_response()
    }
}

/// Build the router over a prepared application state.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(serve_report))
        .route("/health", get(health))
        .route("/download", get(download_workbook))
        .route("/export", get(export_report))
        .route("/api/report", get(report_json))
        .route("/upload", get(serve_upload_form).post(handle_upload))
        .route("/*path", get(serve_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = storage::from_location(&config.workbook);
    info!("Serving workbook from {}", source.describe());

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::new(config, source)?);
    let app = router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn load_workbook(state: &AppState) -> Result<Workbook, ReportError> {
    state.source.load(&state.config.label_columns).await
}

fn instructor_report(
    state: &AppState,
    workbook: &Workbook,
    instructor: &str,
) -> Result<Report, ReportError> {
    let visible = workbook.instructors(&state.config.excluded_sheets);
    let sheet = workbook
        .sheet(instructor)
        .filter(|_| visible.iter().any(|name| name == instructor))
        .ok_or_else(|| ReportError::SheetNotFound(instructor.to_string()))?;
    build_report(sheet, &state.config.label_columns)
}

async fn serve_report(
    Query(params): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ReportError> {
    let requested = params.instructor.trim();
    debug!("Report requested for instructor={:?}", requested);

    let workbook = load_workbook(&state).await?;
    let instructors = workbook.instructors(&state.config.excluded_sheets);

    let mut notice = None;
    let report = if requested.is_empty() {
        None
    } else {
        match instructor_report(&state, &workbook, requested) {
            Ok(report) => Some(report),
            Err(ReportError::SheetNotFound(_)) => None,
            Err(ReportError::MissingLabelColumn(name)) => {
                warn!("Sheet {:?} has no class column", name);
                notice = Some(format!(
                    "The sheet for {} has no class column ({}).",
                    name,
                    state.config.label_columns.join(", ")
                ));
                None
            }
            Err(e) => return Err(e),
        }
    };

    let updated_at = render::format_updated_at(chrono::Utc::now(), state.config.timezone);

    let mut page = ReportPage::new(
        &instructors,
        report.as_ref(),
        updated_at,
        &state.config.app_env,
        !state.config.is_production(),
    );
    if notice.is_some() {
        page.message = notice;
    }

    Ok(Html(state.renderer.report_page(&page)?))
}

async fn report_json(
    Query(params): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Report>, ReportError> {
    let workbook = load_workbook(&state).await?;
    let report = instructor_report(&state, &workbook, params.instructor.trim())?;
    Ok(Json(report))
}

async fn health() -> &'static str {
    "ok"
}

async fn download_workbook(State(state): State<Arc<AppState>>) -> Result<Response, ReportError> {
    let bytes = state.source.raw_bytes().await?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"report.xlsx\""),
        ],
        bytes,
    )
        .into_response())
}

async fn export_report(
    Query(params): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ReportError> {
    let instructor = params.instructor.trim();
    let workbook = load_workbook(&state).await?;
    let report = instructor_report(&state, &workbook, instructor)?;
    let filename = export_filename(instructor);

    let response = match params.format {
        ExportFormat::Csv => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.csv\"", filename),
                ),
            ],
            downloader::to_csv(&report),
        )
            .into_response(),
        ExportFormat::Xlsx => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.xlsx\"", filename),
                ),
            ],
            downloader::to_xlsx(&report)?,
        )
            .into_response(),
    };

    Ok(response)
}

/// Keep only characters that are safe inside a quoted header filename.
fn export_filename(instructor: &str) -> String {
    let name: String = instructor
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() { "report".to_string() } else { name }
}

async fn serve_upload_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, ReportError> {
    let page = state.upload_page(None);
    Ok(Html(state.renderer.upload_page(&page)?))
}

async fn handle_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, ReportError> {
    let mut secret = String::new();
    let mut file_data = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ReportError::InvalidUpload(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("unknown").to_string();
        match field_name.as_str() {
            "secret" => {
                secret = field
                    .text()
                    .await
                    .map_err(|e| ReportError::InvalidUpload(e.to_string()))?;
            }
            "workbook" => {
                file_data = field
                    .bytes()
                    .await
                    .map_err(|e| ReportError::InvalidUpload(e.to_string()))?
                    .to_vec();
            }
            _ => {}
        }
    }

    verify_upload_secret(state.config.upload_secret.as_deref(), &secret)?;

    if file_data.is_empty() {
        return Err(ReportError::InvalidUpload("no workbook file received".to_string()));
    }

    let workbook = Workbook::from_bytes(file_data.clone(), &state.config.label_columns)
        .map_err(|e| ReportError::InvalidUpload(e.to_string()))?;
    if workbook.sheets.is_empty() {
        return Err(ReportError::InvalidUpload("workbook has no sheets".to_string()));
    }

    state.source.store(file_data).await?;
    info!("Workbook replaced with {} sheets", workbook.sheets.len());

    let page = state.upload_page(Some(format!(
        "Workbook updated with {} sheets.",
        workbook.sheets.len()
    )));
    Ok(Html(state.renderer.upload_page(&page)?))
}
