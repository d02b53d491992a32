use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// No default content path is assumed; the caller must provide it.
/// The synonym table falls back to the built-in one when no override is set.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filesystem path to the portfolio content document (markdown).
    pub content_path: String,
    /// Optional JSON synonym table replacing the built-in one.
    pub synonyms_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `PORTFOLIO_CONTENT_PATH`: path to the content document
    ///
    /// Optional:
    /// - `PORTFOLIO_SYNONYMS_PATH`: JSON synonym table (omit to use the built-in table)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let content_path = lookup("PORTFOLIO_CONTENT_PATH").ok_or_else(|| {
            AppError::Config("PORTFOLIO_CONTENT_PATH environment variable is required".to_string())
        })?;
        if !Path::new(&content_path).is_file() {
            return Err(AppError::Config(format!(
                "portfolio content not found at {content_path}"
            )));
        }

        let synonyms_path = lookup("PORTFOLIO_SYNONYMS_PATH").filter(|p| !p.trim().is_empty());
        if let Some(path) = &synonyms_path {
            if !Path::new(path).is_file() {
                return Err(AppError::Config(format!(
                    "synonym table not found at {path}"
                )));
            }
        }

        Ok(Self {
            content_path,
            synonyms_path,
        })
    }

    pub fn content_file_path(&self) -> PathBuf {
        PathBuf::from(&self.content_path)
    }

    pub fn synonyms_file_path(&self) -> Option<PathBuf> {
        self.synonyms_path.as_ref().map(PathBuf::from)
    }
}
