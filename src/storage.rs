use crate::config::WorkbookLocation;
use crate::error::ReportError;
use crate::loader::Workbook;
use async_trait::async_trait;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Somewhere a workbook can be fetched from and stored to
///
/// Implementations are consulted on every request; nothing is cached here.
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// Fetch the current workbook file content.
    async fn raw_bytes(&self) -> Result<Vec<u8>, ReportError>;

    /// Replace the stored workbook with new content.
    async fn store(&self, bytes: Vec<u8>) -> Result<(), ReportError>;

    /// Human readable location, used in log lines.
    fn describe(&self) -> String;

    /// Fetch and parse the current workbook.
    async fn load(&self, label_candidates: &[String]) -> Result<Workbook, ReportError> {
        let bytes = self.raw_bytes().await?;
        debug!("Fetched {} bytes from {}", bytes.len(), self.describe());
        Workbook::from_bytes(bytes, label_candidates)
    }
}

/// Workbook kept as a file on the local filesystem
pub struct LocalWorkbook {
    path: PathBuf,
}

impl LocalWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalWorkbook { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WorkbookSource for LocalWorkbook {
    async fn raw_bytes(&self) -> Result<Vec<u8>, ReportError> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    /// Writes to a temporary file beside the target, then renames it over
    /// the target so readers never see a partial workbook.
    async fn store(&self, bytes: Vec<u8>) -> Result<(), ReportError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&path, &bytes))
            .await
            .map_err(|e| ReportError::Io(std::io::Error::other(e)))??;
        info!("Stored new workbook at {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ReportError::Io(e.error))?;
    Ok(())
}

/// Workbook held by a file-storage service reachable over HTTP
pub struct RemoteWorkbook {
    client: reqwest::Client,
    download_url: String,
    upload_url: Option<String>,
    token: Option<String>,
}

impl RemoteWorkbook {
    pub fn new(download_url: String, upload_url: Option<String>, token: Option<String>) -> Self {
        RemoteWorkbook {
            client: reqwest::Client::new(),
            download_url,
            upload_url,
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl WorkbookSource for RemoteWorkbook {
    async fn raw_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let response = self
            .authorize(self.client.get(&self.download_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn store(&self, bytes: Vec<u8>) -> Result<(), ReportError> {
        let url = self.upload_url.as_ref().ok_or(ReportError::ReadOnlySource)?;
        self.authorize(self.client.put(url))
            .header(reqwest::header::CONTENT_TYPE, crate::XLSX_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?;
        info!("Uploaded new workbook to {}", url);
        Ok(())
    }

    fn describe(&self) -> String {
        self.download_url.clone()
    }
}

/// Build the source named by the configuration.
pub fn from_location(location: &WorkbookLocation) -> Arc<dyn WorkbookSource> {
    match location {
        WorkbookLocation::Local(path) => Arc::new(LocalWorkbook::new(path.clone())),
        WorkbookLocation::Remote {
            download_url,
            upload_url,
            token,
        } => Arc::new(RemoteWorkbook::new(
            download_url.clone(),
            upload_url.clone(),
            token.clone(),
        )),
    }
}
