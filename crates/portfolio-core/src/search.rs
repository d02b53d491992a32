/// Search engine over the portfolio registry.
///
/// Every call re-evaluates the whole corpus: each section's cards, the
/// section's own title and prose, then the flat list of sidebar/contact
/// links. Non-matching items are never hidden; search only changes emphasis.
use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

use crate::matcher::{self, MatchReason};
use crate::model::{CardId, CardKind, LinkId, Registry, Section, SectionId};
use crate::query::{NormalizedQuery, QueryInput};
use crate::synonyms::SynonymTable;

/// Element the page should scroll to after a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MatchTarget {
    Card(CardId),
    Link(LinkId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMatch {
    pub card: CardId,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub link: LinkId,
    pub reason: MatchReason,
}

/// Suggestion shown under the no-results message.
pub const NO_RESULTS_HINT: &str = "Try searching for skills, technologies, or experience";

/// Notice shown when a non-empty query matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoResultsNotice {
    pub query: String,
    pub hint: &'static str,
}

impl fmt::Display for NoResultsNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No results found for \"{}\"", self.query)
    }
}

/// Result of evaluating one query against the registry.
///
/// Built fresh for every query and never reused for another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: NormalizedQuery,
    /// Matched cards, in document order.
    pub cards: Vec<CardMatch>,
    /// Matched links, in document order.
    pub links: Vec<LinkMatch>,
    /// Sections flagged as containing a match (own title/prose or a card).
    pub sections: Vec<SectionId>,
    /// Skill tags forced visible because their category matched.
    pub revealed: Vec<CardId>,
    /// Last matching skill category in document order; the skills carousel
    /// ends up scrolled to it.
    pub carousel_focus: Option<CardId>,
}

impl SearchResult {
    /// True when any card or link matched. A section matching only by its
    /// title does not count.
    pub fn any_match(&self) -> bool {
        !self.cards.is_empty() || !self.links.is_empty()
    }

    /// First match in document order: cards of every section first, then links.
    pub fn first_match(&self) -> Option<MatchTarget> {
        self.cards
            .first()
            .map(|m| MatchTarget::Card(m.card))
            .or_else(|| self.links.first().map(|m| MatchTarget::Link(m.link)))
    }

    pub fn notice(&self) -> Option<NoResultsNotice> {
        (!self.any_match()).then(|| NoResultsNotice {
            query: self.query.as_str().to_string(),
            hint: NO_RESULTS_HINT,
        })
    }

    pub fn is_card_highlighted(&self, id: CardId) -> bool {
        self.cards.iter().any(|m| m.card == id)
    }

    pub fn is_link_highlighted(&self, id: LinkId) -> bool {
        self.links.iter().any(|m| m.link == id)
    }

    pub fn is_section_highlighted(&self, id: SectionId) -> bool {
        self.sections.contains(&id)
    }
}

/// What a single input event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The input was empty: every flag resets.
    Cleared,
    Searched(SearchResult),
}

pub struct SearchEngine<'a> {
    registry: &'a Registry,
    synonyms: &'a SynonymTable,
}

impl<'a> SearchEngine<'a> {
    pub fn new(registry: &'a Registry, synonyms: &'a SynonymTable) -> Self {
        Self { registry, synonyms }
    }

    /// Handle a raw input value.
    pub fn search(&self, raw: &str) -> SearchOutcome {
        match QueryInput::parse(raw) {
            QueryInput::Clear => SearchOutcome::Cleared,
            QueryInput::Search(query) => SearchOutcome::Searched(self.evaluate(query)),
        }
    }

    /// Evaluate a normalized query over every section and link.
    pub fn evaluate(&self, query: NormalizedQuery) -> SearchResult {
        let mut result = SearchResult {
            query,
            cards: Vec::new(),
            links: Vec::new(),
            sections: Vec::new(),
            revealed: Vec::new(),
            carousel_focus: None,
        };

        for section in self.registry.sections() {
            if self.evaluate_section(section, &mut result) {
                result.sections.push(section.id);
            }
        }

        for link in self.registry.links() {
            let folded = link.label.to_lowercase();
            if let Some(reason) = matcher::explain(&result.query, &folded, self.synonyms) {
                result.links.push(LinkMatch {
                    link: link.id,
                    reason,
                });
            }
        }

        debug!(
            query = %result.query,
            cards = result.cards.len(),
            links = result.links.len(),
            sections = result.sections.len(),
            "search evaluated"
        );
        result
    }

    /// Evaluate every card of one section. Returns whether the section matches.
    fn evaluate_section(&self, section: &Section, result: &mut SearchResult) -> bool {
        let mut section_matches = section.folded_text().contains(result.query.as_str());

        for card in self.registry.section_cards(section) {
            let folded = card.folded_text();
            let Some(reason) = matcher::explain(&result.query, &folded, self.synonyms) else {
                continue;
            };

            section_matches = true;
            result.cards.push(CardMatch {
                card: card.id,
                reason,
            });

            if card.kind == CardKind::SkillCategory {
                for child in self.registry.children_of(card.id) {
                    if !result.revealed.contains(&child.id) {
                        result.revealed.push(child.id);
                    }
                }
                result.carousel_focus = Some(card.id);
            }
        }

        section_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegistryBuilder;

    fn single_card(text: &str) -> (Registry, CardId) {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Skills"));
        let id = b.card(s, CardKind::SkillTag, text);
        (b.build(), id)
    }

    fn searched(outcome: SearchOutcome) -> SearchResult {
        match outcome {
            SearchOutcome::Searched(result) => result,
            SearchOutcome::Cleared => panic!("expected a search result"),
        }
    }

    #[test]
    fn cv_finds_opencv_card() {
        let (registry, id) = single_card("Python, Flask, OpenCV");
        let synonyms = SynonymTable::builtin();
        let result = searched(SearchEngine::new(&registry, &synonyms).search("cv"));

        assert!(result.any_match());
        assert_eq!(result.first_match(), Some(MatchTarget::Card(id)));
        assert!(result.notice().is_none());
    }

    #[test]
    fn every_term_must_appear_in_one_card() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Languages"));
        b.card(s, CardKind::SkillTag, "Python");
        b.card(s, CardKind::SkillTag, "Java");
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("python java"));
        assert!(!result.any_match());
        assert_eq!(result.first_match(), None);
        let notice = result.notice().unwrap();
        assert_eq!(notice.to_string(), "No results found for \"python java\"");
        assert_eq!(notice.hint, NO_RESULTS_HINT);
    }

    #[test]
    fn builtin_py_key_matches_python_card_on_multi_term_query() {
        // "python java" contains the key "py", and the card contains its
        // expansion "python", so the synonym rule fires for the Python card.
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Languages"));
        let python = b.card(s, CardKind::SkillTag, "Python");
        let java = b.card(s, CardKind::SkillTag, "Java");
        let registry = b.build();
        let synonyms = SynonymTable::builtin();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("python java"));
        assert!(result.is_card_highlighted(python));
        assert!(!result.is_card_highlighted(java));
    }

    #[test]
    fn ai_highlights_machine_learning_card() {
        let (registry, id) = single_card("machine learning pipelines");
        let synonyms = SynonymTable::builtin();
        let result = searched(SearchEngine::new(&registry, &synonyms).search("ai"));
        assert!(result.is_card_highlighted(id));
        assert_eq!(result.first_match(), Some(MatchTarget::Card(id)));
    }

    #[test]
    fn empty_input_is_cleared_not_no_results() {
        let (registry, _) = single_card("Rust");
        let synonyms = SynonymTable::builtin();
        let engine = SearchEngine::new(&registry, &synonyms);
        assert_eq!(engine.search(""), SearchOutcome::Cleared);
        assert_eq!(engine.search("   "), SearchOutcome::Cleared);
    }

    #[test]
    fn section_title_matches_without_counting_as_result() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Certifications"));
        b.card(s, CardKind::Certification, "AWS Cloud Practitioner");
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("certif"));
        assert!(result.is_section_highlighted(s));
        assert!(!result.any_match());
        assert!(result.notice().is_some());
    }

    #[test]
    fn section_prose_matches_by_substring() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("About"));
        b.body_line(s, "Based in Lisbon, open to remote work");
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("lisbon"));
        assert_eq!(result.sections, vec![s]);
    }

    #[test]
    fn card_match_flags_its_section() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Projects"));
        b.card(s, CardKind::Project, "Telegram chatbot");
        let registry = b.build();
        let synonyms = SynonymTable::builtin();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("bot"));
        assert!(result.is_section_highlighted(s));
    }

    #[test]
    fn skill_category_match_reveals_children() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Skills"));
        let data = b.card(s, CardKind::SkillCategory, "Data");
        let pandas = b.child_tag(data, "Pandas").unwrap();
        let numpy = b.child_tag(data, "NumPy").unwrap();
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        // Matches the category via its text ("pandas"), and the Pandas tag itself.
        let result = searched(SearchEngine::new(&registry, &synonyms).search("pandas"));
        assert!(result.is_card_highlighted(data));
        assert!(result.is_card_highlighted(pandas));
        assert!(!result.is_card_highlighted(numpy));
        assert_eq!(result.revealed, vec![pandas, numpy]);
        assert_eq!(result.carousel_focus, Some(data));
        assert_eq!(result.first_match(), Some(MatchTarget::Card(data)));
    }

    #[test]
    fn carousel_focus_follows_last_matching_category() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Skills"));
        let data = b.card(s, CardKind::SkillCategory, "Data");
        b.child_tag(data, "Python").unwrap();
        let web = b.card(s, CardKind::SkillCategory, "Web");
        b.child_tag(web, "Python Django").unwrap();
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("python"));
        assert!(result.is_card_highlighted(data));
        assert!(result.is_card_highlighted(web));
        assert_eq!(web, CardId(2));
        assert_eq!(result.carousel_focus, Some(web));
        assert_eq!(result.first_match(), Some(MatchTarget::Card(data)));
    }

    #[test]
    fn links_use_the_same_rule() {
        let mut b = RegistryBuilder::new();
        b.section(Some("Contact"));
        let gh = b.link("GitHub", "https://github.com/someone");
        b.link("Email", "mailto:someone@example.com");
        let registry = b.build();
        let synonyms = SynonymTable::builtin();

        // "git" -> "github" is a synonym expansion; plain substring also holds.
        let result = searched(SearchEngine::new(&registry, &synonyms).search("git"));
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.first_match(), Some(MatchTarget::Link(gh)));

        // Only the synonym rule can match this one.
        let result = searched(SearchEngine::new(&registry, &synonyms).search("version control"));
        assert!(result.is_link_highlighted(gh));
    }

    #[test]
    fn cards_precede_links_for_scroll_target() {
        let mut b = RegistryBuilder::new();
        let s = b.section(Some("Projects"));
        let card = b.card(s, CardKind::Project, "Rust CLI tools");
        b.link("Rust blog", "https://example.com");
        let registry = b.build();
        let synonyms = SynonymTable::empty();

        let result = searched(SearchEngine::new(&registry, &synonyms).search("rust"));
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.first_match(), Some(MatchTarget::Card(card)));
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let (registry, _) = single_card("Python, Flask, OpenCV");
        let synonyms = SynonymTable::builtin();
        let engine = SearchEngine::new(&registry, &synonyms);
        assert_eq!(engine.search("flask"), engine.search("flask"));
    }
}
