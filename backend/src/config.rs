//! Runtime configuration read from the environment (and an optional `.env` file).
//!
//! | Variable              | Default                 |
//! |-----------------------|-------------------------|
//! | `HOST`                | `127.0.0.1`             |
//! | `PORT`                | `8080`                  |
//! | `MARKING_SERVICE_URL` | `http://127.0.0.1:9000` |
//! | `WEEKLY_UPLOAD_LIMIT` | `15`                    |
//! | `SHOW_MARKING_POINTS` | `true`                  |
//! | `MAX_UPLOAD_MB`       | `50`                    |
//! | `OPEN_BROWSER`        | `false`                 |
//! | `RESULT_TTL_MINUTES`  | `60`                    |
//! | `PDF_FONT_DIR`        | `./fonts`               |
//! | `PDF_FONT_FAMILY`     | `LiberationSans`        |
//!
//! `RESULT_TTL_MINUTES` bounds how long finished jobs and rendered results
//! (and so their PDF downloads) stay in memory.

use common::model::options::{DEFAULT_WEEKLY_UPLOAD_LIMIT, FormOptions};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where the TrueType files for PDF exports are read from.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFonts {
    pub dir: PathBuf,
    pub family: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub marking_service_url: String,
    pub weekly_upload_limit: u32,
    pub show_marking_points: bool,
    pub max_upload_bytes: usize,
    pub open_browser: bool,
    pub result_ttl: Duration,
    pub pdf_fonts: PdfFonts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            marking_service_url: "http://127.0.0.1:9000".to_string(),
            weekly_upload_limit: DEFAULT_WEEKLY_UPLOAD_LIMIT,
            show_marking_points: true,
            max_upload_bytes: 50 * 1024 * 1024,
            open_browser: false,
            result_ttl: Duration::from_secs(60 * 60),
            pdf_fonts: PdfFonts {
                dir: PathBuf::from("./fonts"),
                family: "LiberationSans".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let max_upload_mb: usize = parse_or(&lookup, "MAX_UPLOAD_MB", 50)?;
        let result_ttl_minutes: u64 = parse_or(&lookup, "RESULT_TTL_MINUTES", 60)?;

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            marking_service_url: lookup("MARKING_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.marking_service_url),
            weekly_upload_limit: parse_or(&lookup, "WEEKLY_UPLOAD_LIMIT", defaults.weekly_upload_limit)?,
            show_marking_points: parse_or(&lookup, "SHOW_MARKING_POINTS", defaults.show_marking_points)?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            open_browser: parse_or(&lookup, "OPEN_BROWSER", defaults.open_browser)?,
            result_ttl: Duration::from_secs(result_ttl_minutes * 60),
            pdf_fonts: PdfFonts {
                dir: lookup("PDF_FONT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.pdf_fonts.dir),
                family: lookup("PDF_FONT_FAMILY").unwrap_or(defaults.pdf_fonts.family),
            },
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn form_options(&self) -> FormOptions {
        FormOptions {
            show_marking_points: self.show_marking_points,
            weekly_upload_limit: self.weekly_upload_limit,
            ..FormOptions::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
