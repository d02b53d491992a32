/// Page-level search context.
///
/// A `SearchSession` owns the registry, the synonym table and the flags the
/// page renders. It is created when the content is loaded and replaced when the
/// content is reloaded. Each input event runs one full synchronous pass and
/// replaces the flags wholesale, so applying the same input twice is a no-op.
///
/// ```text
/// Idle --(non-empty input)--> Searching --(empty input)--> Idle
///                              ^      |
///                              +------+  (every further input)
/// ```
use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

use crate::model::{CardId, LinkId, Registry, SectionId};
use crate::search::{MatchTarget, NoResultsNotice, SearchEngine, SearchOutcome, SearchResult};
use crate::synonyms::SynonymTable;

/// Presentation signals for one card, section or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Flags {
    pub highlighted: bool,
    pub visible: bool,
}

impl Flags {
    const RESET: Flags = Flags {
        highlighted: false,
        visible: true,
    };
}

/// Every flag the page needs to render the current search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightState {
    cards: Vec<Flags>,
    sections: Vec<Flags>,
    links: Vec<Flags>,
    scroll_target: Option<MatchTarget>,
    notice: Option<NoResultsNotice>,
}

impl HighlightState {
    /// Everything visible, nothing highlighted, no notice.
    pub fn reset(registry: &Registry) -> Self {
        Self {
            cards: vec![Flags::RESET; registry.cards().len()],
            sections: vec![Flags::RESET; registry.sections().len()],
            links: vec![Flags::RESET; registry.links().len()],
            scroll_target: None,
            notice: None,
        }
    }

    fn from_result(registry: &Registry, result: &SearchResult) -> Self {
        let mut state = Self::reset(registry);
        for m in &result.cards {
            if let Some(flags) = state.cards.get_mut(m.card.0) {
                flags.highlighted = true;
            }
        }
        for id in &result.sections {
            if let Some(flags) = state.sections.get_mut(id.0) {
                flags.highlighted = true;
            }
        }
        for m in &result.links {
            if let Some(flags) = state.links.get_mut(m.link.0) {
                flags.highlighted = true;
            }
        }
        state.scroll_target = result.first_match();
        state.notice = result.notice();
        state
    }

    pub fn card(&self, id: CardId) -> Option<Flags> {
        self.cards.get(id.0).copied()
    }

    pub fn section(&self, id: SectionId) -> Option<Flags> {
        self.sections.get(id.0).copied()
    }

    pub fn link(&self, id: LinkId) -> Option<Flags> {
        self.links.get(id.0).copied()
    }

    pub fn cards(&self) -> impl Iterator<Item = (CardId, Flags)> + '_ {
        self.cards.iter().enumerate().map(|(i, f)| (CardId(i), *f))
    }

    pub fn sections(&self) -> impl Iterator<Item = (SectionId, Flags)> + '_ {
        self.sections.iter().enumerate().map(|(i, f)| (SectionId(i), *f))
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, Flags)> + '_ {
        self.links.iter().enumerate().map(|(i, f)| (LinkId(i), *f))
    }

    pub fn scroll_target(&self) -> Option<MatchTarget> {
        self.scroll_target
    }

    pub fn notice(&self) -> Option<&NoResultsNotice> {
        self.notice.as_ref()
    }

    pub fn highlighted_cards(&self) -> Vec<CardId> {
        self.cards()
            .filter(|(_, f)| f.highlighted)
            .map(|(id, _)| id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Searching(SearchResult),
}

pub struct SearchSession {
    registry: Registry,
    synonyms: SynonymTable,
    state: SessionState,
    highlights: HighlightState,
}

impl SearchSession {
    pub fn new(registry: Registry, synonyms: SynonymTable) -> Self {
        let highlights = HighlightState::reset(&registry);
        Self {
            registry,
            synonyms,
            state: SessionState::Idle,
            highlights,
        }
    }

    /// Handle one input event from the search box.
    pub fn on_input(&mut self, raw: &str) -> &SessionState {
        let outcome = SearchEngine::new(&self.registry, &self.synonyms).search(raw);
        match outcome {
            SearchOutcome::Cleared => self.clear(),
            SearchOutcome::Searched(result) => {
                self.highlights = HighlightState::from_result(&self.registry, &result);
                self.state = SessionState::Searching(result);
            }
        }
        &self.state
    }

    /// Unconditional reset, as when the clear control is pressed.
    pub fn clear(&mut self) {
        debug!("search cleared");
        self.highlights = HighlightState::reset(&self.registry);
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, SessionState::Searching(_))
    }

    pub fn highlights(&self) -> &HighlightState {
        &self.highlights
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }
}
