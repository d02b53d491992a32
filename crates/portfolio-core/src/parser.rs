/// Parser for the portfolio content document.
///
/// The document is line-oriented markdown:
/// - Section headers: `# Title`
/// - Card headers: `## kind: Title` where kind is experience, project,
///   certification or skills
/// - Skill tags: `- Name`, either inside a `skills` card or directly under a section
/// - Links: a line holding only `[Label](url)`, optionally bulleted
/// - Anything else is card text, or section prose when no card is open
///
/// Parser approach: line-by-line state machine with regex for header detection.
use regex::Regex;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{CardId, CardKind, Registry, RegistryBuilder, SectionId};

/// Where non-heading lines currently go.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Before the first section; lines are ignored.
    Preamble,
    Section(SectionId),
    Card(SectionId, CardId, CardKind),
    /// Inside a block whose heading was not understood; lines are ignored.
    Skipping(SectionId),
}

/// Parse the content document into a registry.
///
/// Unknown card kinds are skipped with a warning. A card heading that
/// appears before any section is an error.
pub fn parse_portfolio(content: &str) -> Result<Registry, CoreError> {
    let section_re = Regex::new(r"^#(?:\s+(.*))?$").expect("valid regex");
    let card_re = Regex::new(r"^##\s+([A-Za-z-]+)\s*:\s*(.+)$").expect("valid regex");
    let subheading_re = Regex::new(r"^#{2,}\s").expect("valid regex");
    let link_re =
        Regex::new(r"^(?:[-*]\s+)?\[([^\]]+)\]\(([^)\s]+)\)$").expect("valid regex");
    let bullet_re = Regex::new(r"^[-*]\s+(.+)$").expect("valid regex");

    let mut builder = RegistryBuilder::new();
    let mut cursor = Cursor::Preamble;

    for (i, raw_line) in content.lines().enumerate() {
        let line_number = i + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = section_re.captures(line) {
            let title = caps.get(1).map(|m| m.as_str());
            cursor = Cursor::Section(builder.section(title));
            continue;
        }

        if subheading_re.is_match(line) {
            let section = match cursor {
                Cursor::Preamble => {
                    return Err(CoreError::Parse {
                        line: line_number,
                        message: "card heading before any section".to_string(),
                    });
                }
                Cursor::Section(s) | Cursor::Card(s, _, _) | Cursor::Skipping(s) => s,
            };

            let parsed = card_re.captures(line).and_then(|caps| {
                CardKind::from_heading(&caps[1]).map(|kind| (kind, caps[2].trim().to_string()))
            });
            cursor = match parsed {
                Some((kind, title)) => {
                    let card = builder.card(section, kind, &title);
                    Cursor::Card(section, card, kind)
                }
                None => {
                    warn!(
                        line_number,
                        content = line,
                        "unrecognized card heading, skipping block"
                    );
                    Cursor::Skipping(section)
                }
            };
            continue;
        }

        if let Some(caps) = link_re.captures(line) {
            if matches!(cursor, Cursor::Preamble | Cursor::Skipping(_)) {
                continue;
            }
            builder.link(&caps[1], &caps[2]);
            continue;
        }

        let bullet = bullet_re.captures(line).map(|caps| caps[1].trim().to_string());

        match (cursor, bullet) {
            (Cursor::Preamble, _) | (Cursor::Skipping(_), _) => {}
            (Cursor::Card(_, card, CardKind::SkillCategory), Some(name)) => {
                builder.child_tag(card, &name);
            }
            (Cursor::Card(_, card, _), Some(text)) => builder.append_text(card, &text),
            (Cursor::Card(_, card, _), None) => builder.append_text(card, line),
            (Cursor::Section(section), Some(name)) => {
                builder.card(section, CardKind::SkillTag, &name);
            }
            (Cursor::Section(section), None) => builder.body_line(section, line),
        }
    }

    Ok(builder.build())
}
