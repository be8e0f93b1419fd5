use chrono_tz::Tz;
use log::warn;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_WORKBOOK_PATH: &str = "data/report.xlsx";
pub const DEFAULT_LABEL_COLUMNS: [&str; 4] = ["Class", "Class Name", "Class Label", "Course"];
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Chicago;
const PRODUCTION: &str = "production";

/// Where the workbook lives
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbookLocation {
    Local(PathBuf),
    Remote {
        download_url: String,
        upload_url: Option<String>,
        token: Option<String>,
    },
}

/// Application settings, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Environment label; anything other than `production` shows a banner
    pub app_env: String,
    pub bind_addr: String,
    pub workbook: WorkbookLocation,
    /// Shared secret for uploads; uploads are disabled when unset
    pub upload_secret: Option<String>,
    /// Header names that identify the class label column, in priority order
    pub label_columns: Vec<String>,
    /// Sheets hidden from the instructor picker
    pub excluded_sheets: Vec<String>,
    pub max_upload_bytes: usize,
    /// Zone of the "updated at" timestamp on the report page
    pub timezone: Tz,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_env: PRODUCTION.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            workbook: WorkbookLocation::Local(PathBuf::from(DEFAULT_WORKBOOK_PATH)),
            upload_secret: None,
            label_columns: DEFAULT_LABEL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            excluded_sheets: Vec::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables
    ///
    /// Loads a `.env` file from the working directory first, if there is one.
    /// Variables already set in the process win over the file. Unset variables
    /// take their defaults.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, or None when unset
    ///
    /// # Returns
    /// * `Config` - Settings with defaults filled in
    ///
    /// # Examples
    /// ```
    /// use heads_up::config::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "APP_ENV" => Some("staging".to_string()),
    ///     _ => None,
    /// });
    /// assert!(!config.is_production());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let workbook = match get("WORKBOOK_URL") {
            Some(download_url) => WorkbookLocation::Remote {
                download_url,
                upload_url: get("WORKBOOK_UPLOAD_URL"),
                token: get("WORKBOOK_TOKEN"),
            },
            None => WorkbookLocation::Local(
                get("WORKBOOK_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK_PATH)),
            ),
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "Ignoring invalid MAX_UPLOAD_BYTES={:?}, using {}",
                        raw, defaults.max_upload_bytes
                    );
                    defaults.max_upload_bytes
                }
            },
            None => defaults.max_upload_bytes,
        };

        let timezone = match get("REPORT_TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().unwrap_or_else(|_| {
                warn!(
                    "Ignoring unknown REPORT_TIMEZONE={:?}, using {}",
                    raw, defaults.timezone.name()
                );
                defaults.timezone
            }),
            None => defaults.timezone,
        };

        Config {
            app_env: get("APP_ENV").unwrap_or(defaults.app_env),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            workbook,
            upload_secret: get("UPLOAD_SECRET"),
            label_columns: get("LABEL_COLUMNS")
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.label_columns),
            excluded_sheets: get("EXCLUDED_SHEETS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            max_upload_bytes,
            timezone,
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case(PRODUCTION)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
