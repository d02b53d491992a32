/// Query normalization.
///
/// Raw input is lower-cased, trimmed and split on whitespace. An input that is
/// empty after trimming is not a query at all: it is the signal to clear the
/// current search, which callers must handle separately from "no matches".
use std::fmt;

/// What a raw input value asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Clear,
    Search(NormalizedQuery),
}

impl QueryInput {
    pub fn parse(raw: &str) -> Self {
        match NormalizedQuery::new(raw) {
            Some(query) => Self::Search(query),
            None => Self::Clear,
        }
    }
}

/// A lower-cased, trimmed query with at least one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    text: String,
    terms: Vec<String>,
}

impl NormalizedQuery {
    /// Returns `None` when the input is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        let terms: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if terms.is_empty() {
            return None;
        }
        Some(Self { text, terms })
    }

    /// The full normalized query. Inner whitespace is kept as typed.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whitespace-delimited terms, in input order. Never empty.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_trims_and_splits() {
        let q = NormalizedQuery::new("  Machine   Learning ").unwrap();
        assert_eq!(q.as_str(), "machine   learning");
        assert_eq!(q.terms(), ["machine", "learning"]);
    }

    #[test]
    fn tabs_and_newlines_delimit_terms() {
        let q = NormalizedQuery::new("rust\tgo\nzig").unwrap();
        assert_eq!(q.terms(), ["rust", "go", "zig"]);
    }

    #[test]
    fn empty_and_blank_input_clear() {
        assert_eq!(QueryInput::parse(""), QueryInput::Clear);
        assert_eq!(QueryInput::parse("   \t "), QueryInput::Clear);
    }

    #[test]
    fn non_empty_input_searches() {
        match QueryInput::parse("AI") {
            QueryInput::Search(q) => assert_eq!(q.to_string(), "ai"),
            QueryInput::Clear => panic!("expected a search"),
        }
    }
}
