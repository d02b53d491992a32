/// Synonym table used to broaden substring matching.
///
/// Entries map a short key token ("ai", "db") to expansion phrases. Lookup is
/// symmetric and substring based, so it is approximate on purpose: "db" also
/// fires inside unrelated words that contain those two letters.
///
/// The table is fixed once built. Entry order is kept and decides which entry
/// is reported as the cause of a synonym match.
use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const BUILTIN: &[(&str, &[&str])] = &[
    ("ai", &["artificial intelligence", "machine learning", "ml"]),
    ("ml", &["machine learning", "artificial intelligence", "ai"]),
    ("nlp", &["natural language processing"]),
    ("cv", &["computer vision", "opencv"]),
    ("db", &["database", "mongodb", "sql"]),
    ("js", &["javascript"]),
    ("py", &["python"]),
    ("react", &["reactjs", "react.js"]),
    ("git", &["github", "version control"]),
    ("aws", &["amazon web services", "cloud"]),
    ("ocr", &["optical character recognition"]),
    ("bot", &["telegram bot", "chatbot"]),
    ("audio", &["music", "sound", "midi", "daw"]),
    ("iot", &["internet of things", "raspberry pi", "arduino"]),
    ("n8n", &["automation", "workflow"]),
    ("selenium", &["web automation", "testing"]),
    ("tableau", &["data visualization", "analytics"]),
    ("powerbi", &["power bi", "microsoft", "business intelligence"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SynonymEntry {
    /// Abbreviation or short token, e.g. "cv".
    pub key: String,
    /// Phrases the key stands for, e.g. "computer vision".
    pub expansions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
}

impl SynonymTable {
    /// Build a table from entries, lower-casing keys and phrases.
    ///
    /// Rejects empty keys, empty phrases, entries without phrases and
    /// duplicate keys. An empty phrase would match every card.
    pub fn new(entries: Vec<SynonymEntry>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            let key = entry.key.trim().to_lowercase();
            if key.is_empty() {
                return Err(CoreError::Synonyms("synonym key must not be empty".to_string()));
            }
            if !seen.insert(key.clone()) {
                return Err(CoreError::Synonyms(format!("duplicate synonym key: {key}")));
            }
            let expansions: Vec<String> = entry
                .expansions
                .iter()
                .map(|p| p.trim().to_lowercase())
                .collect();
            if expansions.is_empty() {
                return Err(CoreError::Synonyms(format!(
                    "synonym key '{key}' has no expansions"
                )));
            }
            if expansions.iter().any(|p| p.is_empty()) {
                return Err(CoreError::Synonyms(format!(
                    "synonym key '{key}' has an empty expansion"
                )));
            }
            normalized.push(SynonymEntry { key, expansions });
        }

        Ok(Self { entries: normalized })
    }

    /// The abbreviations the portfolio page has always understood.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(key, expansions)| SynonymEntry {
                key: key.to_string(),
                expansions: expansions.iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    /// A table that never expands anything.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Parse a JSON array of `{"key": ..., "expansions": [...]}` objects.
    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        let entries: Vec<SynonymEntry> = serde_json::from_str(content)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, expansions: &[&str]) -> SynonymEntry {
        SynonymEntry {
            key: key.to_string(),
            expansions: expansions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn builtin_keeps_insertion_order() {
        let table = SynonymTable::builtin();
        assert_eq!(table.len(), 18);
        assert_eq!(table.entries()[0].key, "ai");
        assert_eq!(table.entries()[3].key, "cv");
        assert_eq!(table.entries()[17].key, "powerbi");
    }

    #[test]
    fn builtin_passes_validation() {
        let rebuilt = SynonymTable::new(SynonymTable::builtin().entries().to_vec()).unwrap();
        assert_eq!(rebuilt, SynonymTable::builtin());
    }

    #[test]
    fn new_lowercases_entries() {
        let table = SynonymTable::new(vec![entry(" K8S ", &["Kubernetes"])]).unwrap();
        assert_eq!(table.entries()[0], entry("k8s", &["kubernetes"]));
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(SynonymTable::new(vec![entry("", &["x"])]).is_err());
        assert!(SynonymTable::new(vec![entry("k", &[])]).is_err());
        assert!(SynonymTable::new(vec![entry("k", &["  "])]).is_err());
        assert!(SynonymTable::new(vec![entry("k", &["a"]), entry("K", &["b"])]).is_err());
    }

    #[test]
    fn from_json() {
        let table = SynonymTable::from_json(
            r#"[{"key": "rs", "expansions": ["rust"]}, {"key": "go", "expansions": ["golang"]}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].expansions, vec!["golang"]);
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = SynonymTable::from_json(r#"{"key": "rs"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
