//! Chapter search.
//!
//! Every searchable field is lowercased once, when the catalog is built, so
//! `LibraryIndex` only borrows those haystacks and each keystroke in the
//! library view is a plain substring scan. `wander` is the lighter
//! title/teaser/description filter used by the free-browse view, combined
//! with a sort mode.

use super::{Catalog, Chapter};

/// Lowercased title, teaser, description and every subtopic's title, summary
/// and content, newline separated.
pub(crate) fn haystack(chapter: &Chapter) -> String {
    let mut hay = String::new();
    for field in [&chapter.title, &chapter.teaser, &chapter.description] {
        hay.push_str(&field.to_lowercase());
        hay.push('\n');
    }
    for sub in &chapter.subtopics {
        hay.push_str(&sub.title.to_lowercase());
        hay.push('\n');
        if let Some(summary) = &sub.summary {
            hay.push_str(&summary.to_lowercase());
            hay.push('\n');
        }
        hay.push_str(&sub.content.to_lowercase());
        hay.push('\n');
    }
    hay
}

/// Case-insensitive full-text-ish search over chapters and their subtopics.
pub struct LibraryIndex<'a> {
    entries: Vec<(&'a Chapter, &'a str)>,
}

impl<'a> LibraryIndex<'a> {
    /// Pair each chapter with the haystack the catalog cached for it.
    pub fn build(catalog: &'a Catalog) -> Self {
        let entries = catalog
            .list_all()
            .iter()
            .zip(catalog.search_text())
            .map(|(chapter, hay)| (chapter, hay.as_str()))
            .collect();
        Self { entries }
    }

    /// Chapters matching `query`, optionally restricted to one category.
    ///
    /// An empty (or whitespace-only) query matches every chapter.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&'a Chapter> {
        let q = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|(chapter, _)| category.map_or(true, |c| chapter.category == c))
            .filter(|(_, hay)| q.is_empty() || hay.contains(&q))
            .map(|(chapter, _)| *chapter)
            .collect()
    }

    /// Number of chapters matching `query` across all categories.
    pub fn count(&self, query: &str) -> usize {
        self.search(query, None).len()
    }
}

/// Ordering modes of the free-browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog display order.
    #[default]
    Order,
    /// By title, A-Z.
    Alphabetical,
    /// By category label; ties keep display order.
    Category,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Order, SortOrder::Alphabetical, SortOrder::Category];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Order => "Default Order",
            SortOrder::Alphabetical => "A-Z",
            SortOrder::Category => "Category",
        }
    }
}

/// Filter by title, description or teaser, then sort.
pub fn wander<'a>(catalog: &'a Catalog, query: &str, sort: SortOrder) -> Vec<&'a Chapter> {
    let q = query.trim().to_lowercase();
    let mut result: Vec<&Chapter> = catalog
        .list_all()
        .iter()
        .filter(|c| {
            q.is_empty()
                || c.title.to_lowercase().contains(&q)
                || c.description.to_lowercase().contains(&q)
                || c.teaser.to_lowercase().contains(&q)
        })
        .collect();

    match sort {
        SortOrder::Order => {}
        SortOrder::Alphabetical => result.sort_by_key(|c| c.title.to_lowercase()),
        SortOrder::Category => result.sort_by(|a, b| a.category.cmp(&b.category)),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load_bundled().unwrap()
    }

    fn ids(chapters: &[&Chapter]) -> Vec<String> {
        chapters.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn library_finds_subtopic_phrase() {
        let cat = catalog();
        let index = LibraryIndex::build(&cat);
        let hits = ids(&index.search("mirror neuron", None));
        // Subtopic content of "Emotional Contagion"
        assert!(hits.contains(&"emotions".to_string()));
        // Title
        assert!(hits.contains(&"empathy".to_string()));
        // Neither title, teaser, description nor any subtopic mentions it
        assert!(!hits.contains(&"fear".to_string()));
        assert!(!hits.contains(&"memory".to_string()));
    }

    #[test]
    fn library_is_case_insensitive_and_trims() {
        let cat = catalog();
        let index = LibraryIndex::build(&cat);
        assert_eq!(index.count("  HABIT LOOP "), 1);
        assert_eq!(index.count("xyzzy"), 0);
    }

    #[test]
    fn library_empty_query_matches_all() {
        let cat = catalog();
        let index = LibraryIndex::build(&cat);
        assert_eq!(index.count(""), 8);
        assert_eq!(index.count("   "), 8);
    }

    #[test]
    fn library_category_filter() {
        let cat = catalog();
        let index = LibraryIndex::build(&cat);
        let hits = ids(&index.search("", Some("Cognition")));
        assert_eq!(hits, vec!["biases", "memory"]);
        assert!(index.search("mirror neuron", Some("Cognition")).is_empty());
    }

    #[test]
    fn wander_filters_top_level_fields_only() {
        let cat = catalog();
        // Only in subtopic content, so wander does not see it.
        assert!(wander(&cat, "cue-routine-reward", SortOrder::Order).is_empty());
        let hits = ids(&wander(&cat, "amygdala", SortOrder::Order));
        assert_eq!(hits, vec!["emotions", "fear"]);
    }

    #[test]
    fn wander_trims_query() {
        let cat = catalog();
        let hits = ids(&wander(&cat, "  Amygdala \t", SortOrder::Order));
        assert_eq!(hits, vec!["emotions", "fear"]);
        assert_eq!(wander(&cat, "   ", SortOrder::Order).len(), 8);
    }

    #[test]
    fn index_borrows_haystacks_cached_by_catalog() {
        let cat = catalog();
        let first = LibraryIndex::build(&cat);
        let second = LibraryIndex::build(&cat);
        for ((_, a), (_, b)) in first.entries.iter().zip(&second.entries) {
            assert!(std::ptr::eq(*a, *b));
        }
        assert_eq!(first.entries.len(), cat.len());
        assert_eq!(first.entries[0].1, haystack(&cat.list_all()[0]));
        assert_eq!(first.count("mirror neuron"), second.count("mirror neuron"));
    }

    #[test]
    fn wander_sorts() {
        let cat = catalog();
        let alpha = wander(&cat, "", SortOrder::Alphabetical);
        assert_eq!(alpha.first().map(|c| c.id.as_str()), Some("attachment"));
        assert_eq!(alpha.last().map(|c| c.id.as_str()), Some("social-roles"));

        let by_cat = wander(&cat, "", SortOrder::Category);
        assert_eq!(by_cat[0].category, "Behavior");
        // Stable: Cognition keeps display order
        let cognition: Vec<&str> = by_cat
            .iter()
            .filter(|c| c.category == "Cognition")
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(cognition, vec!["biases", "memory"]);

        let ordered = wander(&cat, "", SortOrder::Order);
        assert_eq!(ordered.len(), 8);
        assert_eq!(ordered[0].id, "emotions");
    }
}
