//! The chapter catalog.
//!
//! Built once from the bundled TOML table and immutable afterwards. The
//! `by_id` and `by_category` indexes are derived at construction and never
//! invalidated.

use std::collections::HashMap;

use serde::Deserialize;

use super::{search, Chapter};
use crate::error::CatalogError;
use crate::scene::color::Rgb;

const BUNDLED: &str = include_str!("chapters.toml");

#[derive(Deserialize)]
struct ContentFile {
    chapters: Vec<Chapter>,
}

/// Immutable chapter table with derived lookup indexes.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Sorted by `order`.
    chapters: Vec<Chapter>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>,
    /// Categories in first-appearance order of the sorted chapter list.
    categories: Vec<String>,
    /// Lowercased search haystack per chapter, aligned with `chapters`.
    search_text: Vec<String>,
}

impl Catalog {
    /// Parse and validate the content shipped with the application.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        Self::from_toml(BUNDLED)
    }

    pub fn from_toml(src: &str) -> Result<Self, CatalogError> {
        let file: ContentFile = toml::from_str(src)?;
        Self::from_chapters(file.chapters)
    }

    /// Validate the records and build the indexes.
    pub fn from_chapters(mut chapters: Vec<Chapter>) -> Result<Self, CatalogError> {
        chapters.sort_by_key(|c| c.order);

        let mut by_id = HashMap::with_capacity(chapters.len());
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut categories = Vec::new();

        for (idx, chapter) in chapters.iter().enumerate() {
            if by_id.insert(chapter.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(chapter.id.clone()));
            }
            if idx > 0 && chapters[idx - 1].order == chapter.order {
                return Err(CatalogError::DuplicateOrder {
                    order: chapter.order,
                    first: chapters[idx - 1].id.clone(),
                    second: chapter.id.clone(),
                });
            }
            if Rgb::from_hex(&chapter.color).is_none() {
                return Err(CatalogError::InvalidColor {
                    id: chapter.id.clone(),
                    color: chapter.color.clone(),
                });
            }
            for (i, sub) in chapter.subtopics.iter().enumerate() {
                if chapter.subtopics[..i].iter().any(|s| s.id == sub.id) {
                    return Err(CatalogError::DuplicateSubtopic {
                        chapter: chapter.id.clone(),
                        subtopic: sub.id.clone(),
                    });
                }
            }

            let slot = by_category.entry(chapter.category.clone()).or_default();
            if slot.is_empty() {
                categories.push(chapter.category.clone());
            }
            slot.push(idx);
        }

        let search_text = chapters.iter().map(search::haystack).collect();

        log::debug!(
            "catalog loaded: {} chapters in {} categories",
            chapters.len(),
            categories.len()
        );

        Ok(Self {
            chapters,
            by_id,
            by_category,
            categories,
            search_text,
        })
    }

    /// Look up a chapter. Absence is a normal "not found" outcome.
    pub fn get(&self, id: &str) -> Option<&Chapter> {
        self.by_id.get(id).map(|&idx| &self.chapters[idx])
    }

    /// All chapters, ordered by `order`.
    pub fn list_all(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Chapters of one category, ordered by `order`. Unknown categories are empty.
    pub fn list_by_category(&self, category: &str) -> Vec<&Chapter> {
        self.by_category
            .get(category)
            .map(|idxs| idxs.iter().map(|&i| &self.chapters[i]).collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub(crate) fn search_text(&self) -> &[String] {
        &self.search_text
    }

    /// Previous and next chapter by `order`.
    pub fn neighbors(&self, id: &str) -> (Option<&Chapter>, Option<&Chapter>) {
        match self.by_id.get(id) {
            Some(&idx) => (
                idx.checked_sub(1).map(|i| &self.chapters[i]),
                self.chapters.get(idx + 1),
            ),
            None => (None, None),
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> Catalog {
        Catalog::load_bundled().expect("bundled content is valid")
    }

    const MINI: &str = r##"
[[chapters]]
id = "b"
title = "B"
teaser = "t"
category = "Two"
order = 2
color = "#000000"
description = "d"
long_description = "l"

[[chapters]]
id = "a"
title = "A"
teaser = "t"
category = "One"
order = 1
color = "#FFFFFF"
description = "d"
long_description = "l"
"##;

    #[test]
    fn bundled_catalog_has_eight_chapters() {
        let cat = bundled();
        assert_eq!(cat.len(), 8);
        assert!(!cat.is_empty());
    }

    #[test]
    fn get_returns_matching_id() {
        let cat = bundled();
        for chapter in cat.list_all() {
            let hit = cat.get(&chapter.id).expect("present id resolves");
            assert_eq!(hit.id, chapter.id);
        }
    }

    #[test]
    fn get_unknown_is_none() {
        let cat = bundled();
        assert!(cat.get("dreams").is_none());
        assert!(cat.get("").is_none());
    }

    #[test]
    fn list_all_strictly_ordered() {
        let cat = bundled();
        let orders: Vec<u32> = cat.list_all().iter().map(|c| c.order).collect();
        assert!(orders.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn from_chapters_sorts_by_order() {
        let cat = Catalog::from_toml(MINI).unwrap();
        let ids: Vec<&str> = cat.list_all().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cat.categories(), &["One".to_string(), "Two".to_string()]);
    }

    #[test]
    fn by_category_is_ordered() {
        let cat = bundled();
        let cognition: Vec<&str> = cat
            .list_by_category("Cognition")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(cognition, vec!["biases", "memory"]);
        assert!(cat.list_by_category("Astrology").is_empty());
    }

    #[test]
    fn categories_in_first_appearance_order() {
        let cat = bundled();
        assert_eq!(cat.categories().len(), 7);
        assert_eq!(cat.categories()[0], "Psychology");
        assert_eq!(cat.categories()[1], "Cognition");
    }

    #[test]
    fn neighbors_follow_order() {
        let cat = bundled();
        let (prev, next) = cat.neighbors("emotions");
        assert!(prev.is_none());
        assert_eq!(next.map(|c| c.id.as_str()), Some("biases"));

        let (prev, next) = cat.neighbors("empathy");
        assert_eq!(prev.map(|c| c.id.as_str()), Some("fear"));
        assert!(next.is_none());

        assert_eq!(cat.neighbors("nope"), (None, None));
    }

    #[test]
    fn rejects_duplicate_id() {
        let src = MINI.replace("id = \"b\"", "id = \"a\"");
        assert!(matches!(
            Catalog::from_toml(&src),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn rejects_duplicate_order() {
        let src = MINI.replace("order = 2", "order = 1");
        assert!(matches!(
            Catalog::from_toml(&src),
            Err(CatalogError::DuplicateOrder { order: 1, .. })
        ));
    }

    #[test]
    fn rejects_invalid_color() {
        let src = MINI.replace("#000000", "black");
        assert!(matches!(
            Catalog::from_toml(&src),
            Err(CatalogError::InvalidColor { .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Catalog::from_toml("[[chapters]\nid ="),
            Err(CatalogError::Parse(_))
        ));
    }
}
