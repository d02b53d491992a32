/// Per-item match rule.
///
/// Precedence:
/// 1. the item text contains the whole query
/// 2. the item text contains every query term
/// 3. a synonym entry links query and text, in either direction
///
/// Text passed in must already be case-folded.
use schemars::JsonSchema;
use serde::Serialize;

use crate::query::NormalizedQuery;
use crate::synonyms::SynonymTable;

/// Which side of a synonym entry the query supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SynonymDirection {
    /// Query contains the key, text contains the phrase.
    KeyInQuery,
    /// Query contains the phrase, text contains the key.
    PhraseInQuery,
}

/// Why an item matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MatchReason {
    Substring,
    AllTerms,
    Synonym {
        key: String,
        phrase: String,
        direction: SynonymDirection,
    },
}

pub fn matches(query: &NormalizedQuery, folded_text: &str, synonyms: &SynonymTable) -> bool {
    explain(query, folded_text, synonyms).is_some()
}

/// Evaluate the match rule and report the first rule that fired.
pub fn explain(
    query: &NormalizedQuery,
    folded_text: &str,
    synonyms: &SynonymTable,
) -> Option<MatchReason> {
    let q = query.as_str();

    if folded_text.contains(q) {
        return Some(MatchReason::Substring);
    }

    if query.terms().iter().all(|term| folded_text.contains(term.as_str())) {
        return Some(MatchReason::AllTerms);
    }

    for entry in synonyms.entries() {
        if q.contains(entry.key.as_str()) {
            if let Some(phrase) = entry
                .expansions
                .iter()
                .find(|p| folded_text.contains(p.as_str()))
            {
                return Some(MatchReason::Synonym {
                    key: entry.key.clone(),
                    phrase: phrase.clone(),
                    direction: SynonymDirection::KeyInQuery,
                });
            }
        }
        if let Some(phrase) = entry.expansions.iter().find(|p| q.contains(p.as_str())) {
            if folded_text.contains(entry.key.as_str()) {
                return Some(MatchReason::Synonym {
                    key: entry.key.clone(),
                    phrase: phrase.clone(),
                    direction: SynonymDirection::PhraseInQuery,
                });
            }
        }
    }

    None
}
