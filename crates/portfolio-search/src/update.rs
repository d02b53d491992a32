/// Content reload service.
///
/// Reads the content document (and the synonym override, if configured),
/// fingerprints them with SHA-256 and rebuilds the registry when the
/// fingerprint changes. Used at startup and by the `reload_portfolio` tool.
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use portfolio_core::model::Registry;
use portfolio_core::parser;
use portfolio_core::synonyms::SynonymTable;

use crate::config::Config;
use crate::error::AppError;

/// A freshly parsed corpus, ready to back a new search session.
#[derive(Debug)]
pub struct LoadedPortfolio {
    pub registry: Registry,
    pub synonyms: SynonymTable,
    pub fingerprint: String,
}

/// Result of a reload request.
#[derive(Debug)]
pub struct ReloadResult {
    /// Whether the content changed and a new corpus was built.
    pub updated: bool,
    /// Fingerprint of the sources as read by this request.
    pub fingerprint: String,
    /// Present only when `updated` is true.
    pub portfolio: Option<LoadedPortfolio>,
}

pub struct ReloadService {
    config: Config,
}

impl ReloadService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read, fingerprint and parse the configured sources.
    pub fn load(&self) -> Result<LoadedPortfolio, AppError> {
        let (content, synonyms_json) = self.read_sources()?;
        let fingerprint = fingerprint(&content, synonyms_json.as_deref());

        let registry = parser::parse_portfolio(&content)?;
        let synonyms = match synonyms_json.as_deref() {
            Some(json) => SynonymTable::from_json(json)?,
            None => SynonymTable::builtin(),
        };

        info!(
            sections = registry.sections().len(),
            cards = registry.cards().len(),
            links = registry.links().len(),
            synonyms = synonyms.len(),
            fingerprint = %fingerprint,
            "portfolio loaded"
        );

        Ok(LoadedPortfolio {
            registry,
            synonyms,
            fingerprint,
        })
    }

    /// Rebuild the corpus if the sources no longer match `current_fingerprint`.
    pub fn reload(&self, current_fingerprint: &str) -> Result<ReloadResult, AppError> {
        let (content, synonyms_json) = self.read_sources()?;
        let fingerprint = fingerprint(&content, synonyms_json.as_deref());

        if fingerprint == current_fingerprint {
            info!(fingerprint = %fingerprint, "portfolio unchanged, skipping reload");
            return Ok(ReloadResult {
                updated: false,
                fingerprint,
                portfolio: None,
            });
        }

        let portfolio = self.load()?;
        Ok(ReloadResult {
            updated: true,
            fingerprint: portfolio.fingerprint.clone(),
            portfolio: Some(portfolio),
        })
    }

    fn read_sources(&self) -> Result<(String, Option<String>), AppError> {
        let content = read_file(&self.config.content_file_path())?;
        let synonyms_json = self
            .config
            .synonyms_file_path()
            .map(|path| read_file(&path))
            .transpose()?;
        Ok((content, synonyms_json))
    }
}

fn read_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Deterministic fingerprint over the content document and synonym override.
fn fingerprint(content: &str, synonyms_json: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(b"|");
    if let Some(json) = synonyms_json {
        hasher.update(json.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn config_for(
        content: &tempfile::NamedTempFile,
        synonyms: Option<&tempfile::NamedTempFile>,
    ) -> Config {
        Config {
            content_path: content.path().display().to_string(),
            synonyms_path: synonyms.map(|f| f.path().display().to_string()),
        }
    }

    #[test]
    fn load_uses_builtin_synonyms_by_default() {
        let content = write_temp("# Skills\n- Rust\n");
        let loaded = ReloadService::new(config_for(&content, None)).load().unwrap();
        assert_eq!(loaded.registry.cards().len(), 1);
        assert_eq!(loaded.synonyms, SynonymTable::builtin());
        assert_eq!(loaded.fingerprint.len(), 64);
    }

    #[test]
    fn load_reads_synonym_override() {
        let content = write_temp("# Skills\n- Rust\n");
        let synonyms = write_temp(r#"[{"key": "rs", "expansions": ["rust"]}]"#);
        let loaded = ReloadService::new(config_for(&content, Some(&synonyms)))
            .load()
            .unwrap();
        assert_eq!(loaded.synonyms.len(), 1);
        assert_eq!(loaded.synonyms.entries()[0].key, "rs");
    }

    #[test]
    fn load_surfaces_parse_errors() {
        let content = write_temp("## project: Orphan\n");
        let err = ReloadService::new(config_for(&content, None)).load().unwrap_err();
        assert!(matches!(err, AppError::Core(_)));
    }

    #[test]
    fn reload_skips_when_unchanged() {
        let content = write_temp("# Skills\n- Rust\n");
        let service = ReloadService::new(config_for(&content, None));
        let loaded = service.load().unwrap();

        let result = service.reload(&loaded.fingerprint).unwrap();
        assert!(!result.updated);
        assert!(result.portfolio.is_none());
        assert_eq!(result.fingerprint, loaded.fingerprint);
    }

    #[test]
    fn reload_rebuilds_when_content_changes() {
        let mut content = write_temp("# Skills\n- Rust\n");
        let service = ReloadService::new(config_for(&content, None));
        let loaded = service.load().unwrap();

        content.write_all(b"- Go\n").unwrap();
        content.flush().unwrap();

        let result = service.reload(&loaded.fingerprint).unwrap();
        assert!(result.updated);
        assert_ne!(result.fingerprint, loaded.fingerprint);
        assert_eq!(result.portfolio.unwrap().registry.cards().len(), 2);
    }

    #[test]
    fn fingerprint_covers_synonyms() {
        assert_ne!(fingerprint("x", None), fingerprint("x", Some("[]")));
        assert_eq!(fingerprint("x", Some("[]")), fingerprint("x", Some("[]")));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let config = Config {
            content_path: "/nonexistent/portfolio.md".to_string(),
            synonyms_path: None,
        };
        let err = ReloadService::new(config).load().unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }
}
