use thiserror::Error;

/// Everything that can go wrong while loading, reporting or storing a workbook.
///
/// Classification itself never fails; see [`crate::schedule::classify`].
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("workbook I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[cfg(feature = "web")]
    #[error("could not reach workbook storage: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("no sheet named {0:?}")]
    SheetNotFound(String),

    #[error("sheet {0:?} has no class column")]
    MissingLabelColumn(String),

    #[error("workbook storage is read-only")]
    ReadOnlySource,

    #[error("uploads are disabled")]
    UploadDisabled,

    #[error("invalid upload secret")]
    Unauthorized,

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[cfg(feature = "web")]
    #[error("could not render page: {0}")]
    Template(#[from] handlebars::RenderError),

    #[cfg(feature = "web")]
    #[error("invalid page template: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    #[error("could not build export: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}
