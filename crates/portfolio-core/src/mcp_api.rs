use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::matcher::MatchReason;
use crate::model::{CardId, CardKind, LinkId, SectionId};
use crate::search::{MatchTarget, NoResultsNotice};
use crate::session::Flags;
use crate::synonyms::SynonymEntry;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchPortfolioParams {
    /// Current value of the search box. An empty or blank value clears the search.
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCardParams {
    /// Card id as returned by search_portfolio or list_section.
    pub card_id: usize,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListSectionParams {
    /// Section title, case-insensitive, e.g. "Projects".
    pub section: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CardSummary {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CardMatchResult {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    pub section: Option<String>,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LinkResult {
    pub id: LinkId,
    pub label: String,
    pub url: String,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SectionSummary {
    pub id: SectionId,
    pub title: Option<String>,
    pub card_count: usize,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchPortfolioResponse {
    /// True when the input was empty and every flag was reset.
    pub cleared: bool,
    /// Normalized query, absent when cleared.
    pub query: Option<String>,
    pub any_match: bool,
    pub cards: Vec<CardMatchResult>,
    pub links: Vec<LinkResult>,
    /// Sections carrying the has-match highlight.
    pub sections: Vec<SectionSummary>,
    /// First match in document order; the element to scroll into view.
    pub scroll_target: Option<MatchTarget>,
    /// Skill tags forced visible because their category matched.
    pub revealed: Vec<CardId>,
    /// Skill category the skills carousel should scroll to.
    pub carousel_focus: Option<CardId>,
    /// "No results" notice, present only for a non-empty query with no match.
    pub notice: Option<NoticePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NoticePayload {
    /// `No results found for "<query>"`.
    pub message: String,
    pub hint: String,
}

impl From<&NoResultsNotice> for NoticePayload {
    fn from(notice: &NoResultsNotice) -> Self {
        Self {
            message: notice.to_string(),
            hint: notice.hint.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CardFlags {
    pub id: CardId,
    #[serde(flatten)]
    pub flags: Flags,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SectionFlags {
    pub id: SectionId,
    #[serde(flatten)]
    pub flags: Flags,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LinkFlags {
    pub id: LinkId,
    #[serde(flatten)]
    pub flags: Flags,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct HighlightsResponse {
    /// Active normalized query, absent while idle.
    pub query: Option<String>,
    pub cards: Vec<CardFlags>,
    pub sections: Vec<SectionFlags>,
    pub links: Vec<LinkFlags>,
    pub scroll_target: Option<MatchTarget>,
    pub notice: Option<NoticePayload>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CardDetailResponse {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    pub text: String,
    pub section: Option<String>,
    pub parent: Option<CardSummary>,
    /// Populated for skill categories.
    pub children: Vec<CardSummary>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SectionDetailResponse {
    pub id: SectionId,
    pub title: Option<String>,
    pub body: String,
    pub cards: Vec<CardSummary>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SynonymListResponse {
    /// Entries in lookup order.
    pub entries: Vec<SynonymEntry>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ReloadPortfolioResponse {
    pub updated: bool,
    /// SHA-256 of the content document and synonym table, hex encoded.
    pub fingerprint: String,
    pub section_count: usize,
    pub card_count: usize,
    pub link_count: usize,
}
