//! Page composition.
//!
//! `compose` is a pure function of the route, the catalog, a progress
//! snapshot and the browse controls. It returns a view model that borrows
//! everything it shows; the binary only lays it out. Unknown chapters are a
//! `NotFound` page, and the visual of a chapter is either its scene or the
//! flat fallback, decided here from the render capability.

use crate::content::search::{wander, LibraryIndex, SortOrder};
use crate::content::{Catalog, Chapter, Citation, Subtopic};
use crate::progress::{ProgressRecord, SavedPrompt};
use crate::render::Capability;
use crate::scene::color::Rgb;
use crate::scene::{select_scene, PrimitiveDescriptor};

use super::Route;

/// Chapter used for the home page hero.
pub const HERO_CHAPTER: &str = "emotions";

pub const PRACTICAL_IMPLICATIONS: [&str; 3] = [
    "Try journaling for 7 days about instances related to this topic and note patterns.",
    "Practice one focused exercise from the chapter each day for a week.",
    "Observe and record social contexts where this phenomenon is strongest.",
];

pub const CAVEATS: &str = "Psychology is an evolving science. Many findings have boundary \
conditions and context-specific effects. Use the research as a guide, not an absolute \
prescription.";

/// What fills a chapter's visual slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Scene {
        chapter_id: String,
        primitives: Vec<PrimitiveDescriptor>,
    },
    /// Gradient panel in the theme color with the title on it.
    Fallback { color: Rgb, title: String },
}

impl Visual {
    pub fn for_chapter(catalog: &Catalog, chapter: &Chapter, capability: Capability) -> Self {
        if capability.supports_3d() {
            Visual::Scene {
                chapter_id: chapter.id.clone(),
                primitives: select_scene(catalog, &chapter.id),
            }
        } else {
            Visual::Fallback {
                color: chapter.rgb(),
                title: chapter.title.clone(),
            }
        }
    }
}

/// Controls owned by the browse views, kept across navigations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseState {
    pub onboarding_dismissed: bool,
    pub explore_category: Option<String>,
    pub wander_query: String,
    pub wander_sort: SortOrder,
    pub library_query: String,
    pub library_category: Option<String>,
}

/// Inputs shared by every page.
pub struct ComposeContext<'a> {
    pub catalog: &'a Catalog,
    pub index: &'a LibraryIndex<'a>,
    pub progress: &'a ProgressRecord,
    pub browse: &'a BrowseState,
    pub capability: Capability,
}

#[derive(Debug, Clone, Copy)]
pub struct ChapterCard<'a> {
    pub chapter: &'a Chapter,
    pub visited: bool,
}

#[derive(Debug, Clone)]
pub struct HomePage<'a> {
    pub hero: Option<Visual>,
    pub show_onboarding: bool,
    pub chapters: Vec<ChapterCard<'a>>,
    pub visited: usize,
    pub last_visited: Option<&'a Chapter>,
}

#[derive(Debug, Clone)]
pub struct ExplorePage<'a> {
    pub categories: &'a [String],
    /// `None` shows every category.
    pub selected: Option<&'a str>,
    pub chapters: Vec<ChapterCard<'a>>,
}

#[derive(Debug, Clone)]
pub struct WanderPage<'a> {
    pub query: &'a str,
    pub sort: SortOrder,
    pub results: Vec<ChapterCard<'a>>,
    pub total: usize,
}

impl WanderPage<'_> {
    pub fn summary(&self) -> String {
        format!("Showing {} of {} chapters", self.results.len(), self.total)
    }
}

#[derive(Debug, Clone)]
pub struct LibraryHit<'a> {
    pub chapter: &'a Chapter,
    /// Subtopics whose own text matches the query; empty for an empty query.
    pub subtopics: Vec<&'a Subtopic>,
}

#[derive(Debug, Clone)]
pub struct LibraryPage<'a> {
    pub query: &'a str,
    pub category: Option<&'a str>,
    pub categories: &'a [String],
    pub hits: Vec<LibraryHit<'a>>,
}

/// One reflection prompt with the newest stored answer.
#[derive(Debug, Clone)]
pub struct PromptView<'a> {
    pub index: usize,
    pub question: &'a str,
    pub hint: Option<&'a str>,
    pub saved: Option<&'a SavedPrompt>,
}

#[derive(Debug, Clone)]
pub struct ChapterPage<'a> {
    pub chapter: &'a Chapter,
    pub visual: Visual,
    pub paragraphs: Vec<&'a str>,
    pub key_concepts: Vec<String>,
    pub prompts: Vec<PromptView<'a>>,
    pub citations: &'a [Citation],
    pub prev: Option<&'a Chapter>,
    pub next: Option<&'a Chapter>,
}

#[derive(Debug, Clone)]
pub struct DeepSubtopic<'a> {
    pub subtopic: &'a Subtopic,
    pub recommended: Vec<&'a Chapter>,
}

#[derive(Debug, Clone)]
pub struct DeepPage<'a> {
    pub chapter: &'a Chapter,
    pub visual: Visual,
    pub paragraphs: Vec<&'a str>,
    pub subtopics: Vec<DeepSubtopic<'a>>,
    /// Subtopic to scroll to; only set if it exists.
    pub focus_section: Option<&'a str>,
    pub citations: &'a [Citation],
    pub prev: Option<&'a Chapter>,
    pub next: Option<&'a Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundPage {
    pub message: &'static str,
    pub path: String,
}

#[derive(Debug, Clone)]
pub enum Page<'a> {
    Home(HomePage<'a>),
    Explore(ExplorePage<'a>),
    Wander(WanderPage<'a>),
    Library(LibraryPage<'a>),
    Chapter(ChapterPage<'a>),
    Deep(DeepPage<'a>),
    NotFound(NotFoundPage),
}

impl Page<'_> {
    /// Chapter a successful render of this page counts as a visit to.
    pub fn visited_chapter(&self) -> Option<&str> {
        match self {
            Page::Chapter(p) => Some(&p.chapter.id),
            Page::Deep(p) => Some(&p.chapter.id),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Home(_) => "Human Nature Explorer",
            Page::Explore(_) => "Explore",
            Page::Wander(_) => "Wander",
            Page::Library(_) => "Library",
            Page::Chapter(p) => &p.chapter.title,
            Page::Deep(p) => &p.chapter.title,
            Page::NotFound(p) => p.message,
        }
    }
}

fn cards<'a>(chapters: impl IntoIterator<Item = &'a Chapter>, progress: &ProgressRecord) -> Vec<ChapterCard<'a>> {
    chapters
        .into_iter()
        .map(|chapter| ChapterCard {
            chapter,
            visited: progress.has_visited(&chapter.id),
        })
        .collect()
}

fn chapter_not_found(route: &Route) -> Page<'static> {
    Page::NotFound(NotFoundPage {
        message: "Chapter not found",
        path: route.to_path(),
    })
}

/// Compose the page for `route`.
pub fn compose<'a>(route: &'a Route, cx: &ComposeContext<'a>) -> Page<'a> {
    let catalog = cx.catalog;
    match route {
        Route::Home => Page::Home(HomePage {
            hero: catalog
                .get(HERO_CHAPTER)
                .map(|c| Visual::for_chapter(catalog, c, cx.capability)),
            show_onboarding: !cx.browse.onboarding_dismissed,
            chapters: cards(catalog.list_all(), cx.progress),
            visited: cx.progress.visited_count(),
            last_visited: cx
                .progress
                .last_visited
                .as_deref()
                .and_then(|id| catalog.get(id)),
        }),

        Route::Explore => {
            let selected = cx
                .browse
                .explore_category
                .as_deref()
                .filter(|c| catalog.categories().iter().any(|k| k.as_str() == *c));
            let chapters = match selected {
                Some(category) => cards(catalog.list_by_category(category), cx.progress),
                None => cards(catalog.list_all(), cx.progress),
            };
            Page::Explore(ExplorePage {
                categories: catalog.categories(),
                selected,
                chapters,
            })
        }

        Route::Wander => {
            let results = wander(catalog, &cx.browse.wander_query, cx.browse.wander_sort);
            Page::Wander(WanderPage {
                query: &cx.browse.wander_query,
                sort: cx.browse.wander_sort,
                results: cards(results, cx.progress),
                total: catalog.len(),
            })
        }

        Route::Library => {
            let query = cx.browse.library_query.as_str();
            let category = cx.browse.library_category.as_deref();
            let needle = query.trim().to_lowercase();
            let hits = cx
                .index
                .search(query, category)
                .into_iter()
                .map(|chapter| LibraryHit {
                    chapter,
                    subtopics: if needle.is_empty() {
                        Vec::new()
                    } else {
                        chapter
                            .subtopics
                            .iter()
                            .filter(|s| subtopic_matches(s, &needle))
                            .collect()
                    },
                })
                .collect();
            Page::Library(LibraryPage {
                query,
                category,
                categories: catalog.categories(),
                hits,
            })
        }

        Route::Chapter { id } => {
            let Some(chapter) = catalog.get(id) else {
                return chapter_not_found(route);
            };
            let (prev, next) = catalog.neighbors(id);
            let prompts = chapter
                .reflection_prompts
                .iter()
                .enumerate()
                .map(|(index, p)| PromptView {
                    index,
                    question: &p.question,
                    hint: p.hint.as_deref(),
                    saved: cx.progress.latest_response(id, index),
                })
                .collect();
            Page::Chapter(ChapterPage {
                chapter,
                visual: Visual::for_chapter(catalog, chapter, cx.capability),
                paragraphs: chapter.paragraphs().collect(),
                key_concepts: chapter.key_concepts(),
                prompts,
                citations: &chapter.citations,
                prev,
                next,
            })
        }

        Route::Deep { id, section } => {
            let Some(chapter) = catalog.get(id) else {
                return chapter_not_found(route);
            };
            let (prev, next) = catalog.neighbors(id);
            let focus_section = section
                .as_deref()
                .and_then(|s| chapter.subtopic(s))
                .map(|s| s.id.as_str());
            Page::Deep(DeepPage {
                chapter,
                visual: Visual::for_chapter(catalog, chapter, cx.capability),
                paragraphs: chapter.paragraphs().collect(),
                subtopics: chapter
                    .subtopics
                    .iter()
                    .map(|subtopic| DeepSubtopic {
                        subtopic,
                        recommended: subtopic.resolve_recommended(catalog),
                    })
                    .collect(),
                focus_section,
                citations: &chapter.citations,
                prev,
                next,
            })
        }

        Route::NotFound { path } => Page::NotFound(NotFoundPage {
            message: "Page not found",
            path: path.clone(),
        }),
    }
}

fn subtopic_matches(sub: &Subtopic, needle: &str) -> bool {
    sub.title.to_lowercase().contains(needle)
        || sub.content.to_lowercase().contains(needle)
        || sub
            .summary
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(needle))
}
