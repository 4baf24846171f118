//! Runtime configuration read from the environment (and `.env`, when present).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_TIMETABLE_URL: &str = "http://www.feri.uni-mb.si/urniki/groups.asp";
pub const DEFAULT_HELPER_URL: &str = "http://www.feri.uni-mb.si/urniki/lib/helper.asp";
pub const DEFAULT_FACILITY: &str = "FERI";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub timetable_url: String,
    pub branches_url: String,
    pub groups_url: String,
    pub output_dir: PathBuf,
    /// Prefix of calendar event locations.
    pub facility: String,
    /// TrueType font for PDF output; the builtin Helvetica lacks most accented letters.
    pub pdf_font: Option<PathBuf>,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timetable_url: DEFAULT_TIMETABLE_URL.to_string(),
            branches_url: DEFAULT_HELPER_URL.to_string(),
            groups_url: DEFAULT_HELPER_URL.to_string(),
            output_dir: PathBuf::from("."),
            facility: DEFAULT_FACILITY.to_string(),
            pdf_font: None,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_timeout = match env::var("TIMETABLE_HTTP_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .context("TIMETABLE_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            timetable_url: env::var("TIMETABLE_URL").unwrap_or(defaults.timetable_url),
            branches_url: env::var("BRANCHES_URL").unwrap_or(defaults.branches_url),
            groups_url: env::var("GROUPS_URL").unwrap_or(defaults.groups_url),
            output_dir: env::var("TIMETABLE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            facility: env::var("TIMETABLE_FACILITY").unwrap_or(defaults.facility),
            pdf_font: env::var("TIMETABLE_PDF_FONT").ok().map(PathBuf::from),
            http_timeout,
        })
    }
}
