use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identity of a card. Assigned in document order when the registry is built.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct CardId(pub usize);

/// Stable identity of a section, in document order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SectionId(pub usize);

/// Stable identity of a sidebar/contact link, in document order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct LinkId(pub usize);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display category of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    SkillTag,
    Experience,
    Project,
    Certification,
    /// A group of skill tags. Matching it reveals every child tag.
    SkillCategory,
}

impl CardKind {
    /// Map a content heading prefix (`## project: ...`) to a kind.
    ///
    /// Skill tags are never declared by heading; they come from bullet lines.
    pub fn from_heading(prefix: &str) -> Option<Self> {
        match prefix.trim().to_ascii_lowercase().as_str() {
            "experience" => Some(Self::Experience),
            "project" => Some(Self::Project),
            "certification" => Some(Self::Certification),
            "skills" | "skill-category" => Some(Self::SkillCategory),
            _ => None,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardKind::SkillTag => write!(f, "skill_tag"),
            CardKind::Experience => write!(f, "experience"),
            CardKind::Project => write!(f, "project"),
            CardKind::Certification => write!(f, "certification"),
            CardKind::SkillCategory => write!(f, "skill_category"),
        }
    }
}

/// A unit of displayed content that search can match and highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    /// Rendered text content, original casing. Folded at evaluation time.
    pub text: String,
    pub section: SectionId,
    /// Owning skill category, for skill tags listed inside one.
    pub parent: Option<CardId>,
}

impl Card {
    pub fn folded_text(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A titled grouping of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub title: Option<String>,
    /// Free prose of the section that does not belong to any card.
    pub body: String,
    /// Cards in document order. A skill category precedes its children.
    pub cards: Vec<CardId>,
}

impl Section {
    /// Title and body prose, case-folded. Card text is not included.
    pub fn folded_text(&self) -> String {
        let mut text = self.title.as_deref().unwrap_or_default().to_lowercase();
        if !self.body.is_empty() {
            text.push('\n');
            text.push_str(&self.body.to_lowercase());
        }
        text
    }
}

/// A sidebar or contact link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub label: String,
    pub url: String,
}

/// Ordered collection of every section, card and link on the page.
///
/// Built once from the content document; the search engine only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    sections: Vec<Section>,
    cards: Vec<Card>,
    links: Vec<Link>,
}

impl Registry {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.0)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    /// Cards of a section, in document order.
    pub fn section_cards<'a>(
        &'a self,
        section: &'a Section,
    ) -> impl Iterator<Item = &'a Card> + 'a {
        section.cards.iter().filter_map(|id| self.card(*id))
    }

    /// Skill tags listed inside the given skill category.
    pub fn children_of(&self, parent: CardId) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |c| c.parent == Some(parent))
    }

    /// Case-insensitive lookup by section title.
    pub fn find_section(&self, title: &str) -> Option<&Section> {
        let wanted = title.trim();
        self.sections.iter().find(|s| {
            s.title
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(wanted))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.links.is_empty()
    }
}

/// Incremental constructor for a [`Registry`]. Ids are handed out in call order,
/// so callers must add items in document order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&mut self, title: Option<&str>) -> SectionId {
        let id = SectionId(self.registry.sections.len());
        self.registry.sections.push(Section {
            id,
            title: title.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
            body: String::new(),
            cards: Vec::new(),
        });
        id
    }

    /// Append a line of prose to a section body.
    pub fn body_line(&mut self, section: SectionId, line: &str) {
        if let Some(s) = self.registry.sections.get_mut(section.0) {
            push_line(&mut s.body, line);
        }
    }

    /// Add a card whose initial text is its title.
    pub fn card(&mut self, section: SectionId, kind: CardKind, title: &str) -> CardId {
        self.push_card(section, kind, title, None)
    }

    /// Add a skill tag inside a skill category. The tag name also becomes part
    /// of the category's text.
    pub fn child_tag(&mut self, parent: CardId, name: &str) -> Option<CardId> {
        let section = self.registry.cards.get(parent.0)?.section;
        self.append_text(parent, name);
        Some(self.push_card(section, CardKind::SkillTag, name, Some(parent)))
    }

    /// Append a line to a card's searchable text.
    pub fn append_text(&mut self, card: CardId, line: &str) {
        if let Some(c) = self.registry.cards.get_mut(card.0) {
            push_line(&mut c.text, line);
        }
    }

    pub fn link(&mut self, label: &str, url: &str) -> LinkId {
        let id = LinkId(self.registry.links.len());
        self.registry.links.push(Link {
            id,
            label: label.trim().to_string(),
            url: url.trim().to_string(),
        });
        id
    }

    pub fn build(self) -> Registry {
        self.registry
    }

    fn push_card(
        &mut self,
        section: SectionId,
        kind: CardKind,
        title: &str,
        parent: Option<CardId>,
    ) -> CardId {
        let id = CardId(self.registry.cards.len());
        let title = title.trim().to_string();
        self.registry.cards.push(Card {
            id,
            kind,
            text: title.clone(),
            title,
            section,
            parent,
        });
        if let Some(s) = self.registry.sections.get_mut(section.0) {
            s.cards.push(id);
        }
        id
    }
}

fn push_line(buf: &mut String, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}
