//! Chapter content: the static record types and the catalog built from them.
//!
//! - `catalog`: immutable chapter table with by-id / by-category indexes
//! - `search`: library search and the free-browse filter/sort

pub mod catalog;
pub mod search;

use serde::Deserialize;

use crate::scene::color::Rgb;

pub use catalog::Catalog;

const KEY_CONCEPT_LIMIT: usize = 5;
const KEY_CONCEPT_CHARS: usize = 100;

/// A source backing a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Citation {
    pub title: String,
    pub author: String,
    pub year: u16,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Citation {
    /// Resolver link for the DOI, if the citation has one.
    pub fn doi_url(&self) -> Option<String> {
        self.doi.as_ref().map(|doi| format!("https://doi.org/{}", doi))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReflectionPrompt {
    pub question: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Nested content unit under a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subtopic {
    /// Unique within the parent chapter.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub content: String,
    #[serde(default)]
    pub examples: Vec<String>,
    /// Inline vector illustration markup.
    #[serde(default)]
    pub svg: Option<String>,
    /// Chapter ids suggested after this subtopic. Unknown ids are dead links.
    #[serde(default)]
    pub recommended_next: Vec<String>,
}

impl Subtopic {
    /// Resolve `recommended_next` against the catalog, skipping dead links.
    pub fn resolve_recommended<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Chapter> {
        self.recommended_next
            .iter()
            .filter_map(|id| {
                let hit = catalog.get(id);
                if hit.is_none() {
                    log::debug!("subtopic `{}` recommends unknown id `{}`", self.id, id);
                }
                hit
            })
            .collect()
    }

    pub fn has_illustration(&self) -> bool {
        self.svg.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// One unit of content: a psychology topic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub teaser: String,
    pub category: String,
    /// Display position; unique across the catalog.
    pub order: u32,
    /// Theme color as `#RRGGBB`.
    pub color: String,
    pub description: String,
    /// Long-form body; paragraphs are separated by a blank line.
    pub long_description: String,
    #[serde(default)]
    pub reflection_prompts: Vec<ReflectionPrompt>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
    #[serde(default)]
    pub audio_reactive: bool,
}

impl Chapter {
    /// Body text split into paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.long_description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Up to five bullet lines from the body, shortened for a summary box.
    pub fn key_concepts(&self) -> Vec<String> {
        self.long_description
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix("- "))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .take(KEY_CONCEPT_LIMIT)
            .map(|item| shorten(item, KEY_CONCEPT_CHARS))
            .collect()
    }

    pub fn subtopic(&self, id: &str) -> Option<&Subtopic> {
        self.subtopics.iter().find(|s| s.id == id)
    }

    /// Theme color as normalized RGB, or the neutral scene color if malformed.
    pub fn rgb(&self) -> Rgb {
        Rgb::from_hex(&self.color).unwrap_or(Rgb::FALLBACK)
    }
}

fn shorten(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
