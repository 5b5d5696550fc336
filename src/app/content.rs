//! Page rendering for `ExplorerApp`.
//!
//! `PageUi` lays out a composed `Page` view model. It only borrows the
//! mutable view state it owns (browse controls, prompt drafts, the
//! deep-dive overlay); anything that changes the store or the route is
//! queued as an [`Action`] and applied after the frame.

use eframe::egui;

use human_nature_explorer::content::search::SortOrder;
use human_nature_explorer::content::{Chapter, Citation};
use human_nature_explorer::render::fallback::paint_fallback;
use human_nature_explorer::render::palette::Palette;
use human_nature_explorer::render::scene_paint::{paint_scene, ScenePose};
use human_nature_explorer::view::pages::{
    ChapterCard, ChapterPage, DeepPage, ExplorePage, HomePage, LibraryPage, NotFoundPage, WanderPage, CAVEATS,
    PRACTICAL_IMPLICATIONS,
};
use human_nature_explorer::view::{BrowseState, DeepDiveModal, ModalKey, Page, PromptPanel, Route, Visual};

use super::{Action, SceneMount};
use crate::ui;

/// OrbitControls at speed 2: one turn every 30 seconds.
const AUTO_ROTATE_RAD_PER_SEC: f64 = std::f64::consts::TAU / 30.0;

const HERO_HEIGHT: f32 = 320.0;
const CHAPTER_VISUAL_HEIGHT: f32 = 360.0;
const DEEP_VISUAL_HEIGHT: f32 = 240.0;
const READING_WIDTH: f32 = 760.0;

const WHY_EXPLORE: [(&str, &str); 3] = [
    (
        "Understand yourself",
        "Recognize the patterns behind your reactions, habits and choices.",
    ),
    (
        "Understand others",
        "See the shared machinery behind behavior that seems strange or hostile.",
    ),
    (
        "Grounded in research",
        "Every chapter points to the studies it draws on, so you can read further.",
    ),
];

/// Chapter id and auto-rotate flag of the scene a page shows, if any.
pub fn scene_request(page: &Page<'_>) -> Option<(String, bool)> {
    let (visual, auto_rotate) = match page {
        Page::Home(p) => (p.hero.as_ref()?, true),
        Page::Chapter(p) => (&p.visual, true),
        Page::Deep(p) => (&p.visual, false),
        _ => return None,
    };
    match visual {
        Visual::Scene { chapter_id, .. } => Some((chapter_id.clone(), auto_rotate)),
        Visual::Fallback { .. } => None,
    }
}

/// Advance the mounted reactor for this frame and build the scene pose.
pub fn scene_pose(
    ctx: &egui::Context,
    mount: Option<&SceneMount>,
    auto_rotate: bool,
    reduced_motion: bool,
) -> ScenePose {
    let rotation = mount
        .and_then(|m| m.subscription.advance(ctx.cumulative_pass_nr()))
        .unwrap_or_default();
    let orbit = if auto_rotate && !reduced_motion {
        let t = ctx.input(|i| i.time);
        (t * AUTO_ROTATE_RAD_PER_SEC % std::f64::consts::TAU) as f32
    } else {
        0.0
    };
    ScenePose { rotation, orbit }
}

fn request_focus(ctx: &egui::Context, id: egui::Id) {
    ctx.memory_mut(|m| m.request_focus(id));
}

/// Mutable view state borrowed for one frame.
pub struct PageUi<'u> {
    pub ctx: &'u egui::Context,
    pub palette: &'static Palette,
    pub browse: &'u mut BrowseState,
    pub prompts: &'u mut PromptPanel,
    pub modal: &'u mut DeepDiveModal<egui::Id>,
    pub actions: &'u mut Vec<Action>,
    pub pose: ScenePose,
    pub scroll_to_section: &'u mut bool,
}

impl PageUi<'_> {
    fn go(&mut self, route: Route) {
        self.actions.push(Action::Navigate(route));
    }

    pub fn draw(&mut self, ui: &mut egui::Ui, page: &Page<'_>) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(READING_WIDTH.max(ui.available_width() * 0.9));
            ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                match page {
                    Page::Home(p) => self.draw_home(ui, p),
                    Page::Explore(p) => self.draw_explore(ui, p),
                    Page::Wander(p) => self.draw_wander(ui, p),
                    Page::Library(p) => self.draw_library(ui, p),
                    Page::Chapter(p) => self.draw_chapter(ui, p),
                    Page::Deep(p) => self.draw_deep(ui, p),
                    Page::NotFound(p) => self.draw_not_found(ui, p),
                }
                ui.add_space(32.0);
            });
        });
    }

    fn draw_visual(&self, ui: &mut egui::Ui, visual: &Visual, height: f32) {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), height), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        match visual {
            Visual::Scene { primitives, .. } => {
                paint_scene(&painter, rect, primitives, self.pose, self.palette)
            }
            Visual::Fallback { color, title } => {
                paint_fallback(&painter, rect, *color, title, self.palette)
            }
        }
    }

    fn heading(&self, ui: &mut egui::Ui, text: &str) {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(text)
                .size(32.0)
                .strong()
                .color(self.palette.heading),
        );
        ui.add_space(8.0);
    }

    fn draw_cards(&mut self, ui: &mut egui::Ui, cards: &[ChapterCard<'_>], highlight: Option<&str>) {
        for card in cards {
            if ui::chapter_card(ui, card, self.palette, highlight) {
                self.go(Route::chapter(&card.chapter.id));
            }
            ui.add_space(6.0);
        }
    }

    // ── Home ─────────────────────────────────────────────────────────────────

    fn draw_home(&mut self, ui: &mut egui::Ui, p: &HomePage<'_>) {
        if let Some(hero) = &p.hero {
            self.draw_visual(ui, hero, HERO_HEIGHT);
        }

        if p.show_onboarding {
            ui.add_space(12.0);
            egui::Frame::group(ui.style())
                .fill(self.palette.card_bg)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        egui::RichText::new(
                            "Welcome! Each chapter pairs a short read with an interactive scene. \
                             Move the pointer or scroll to turn it, and save your reflections \
                             as you go.",
                        )
                        .color(self.palette.text),
                    );
                    if ui.button("Got it").clicked() {
                        self.browse.onboarding_dismissed = true;
                    }
                });
        }

        self.heading(ui, "Human Nature Explorer");
        ui.label(
            egui::RichText::new("Interactive chapters on why we feel, think and act the way we do.")
                .size(16.0)
                .color(self.palette.muted),
        );
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Start exploring").clicked() {
                self.go(Route::Explore);
            }
            if ui.button("Wander freely").clicked() {
                self.go(Route::Wander);
            }
            if let Some(last) = p.last_visited {
                if ui.button(format!("Continue: {}", last.title)).clicked() {
                    self.go(Route::chapter(&last.id));
                }
            }
        });
        if p.visited > 0 {
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(format!(
                    "You have visited {} of {} chapters.",
                    p.visited,
                    p.chapters.len()
                ))
                .color(self.palette.muted),
            );
        }

        ui::section_heading(ui, "Why explore human nature?", self.palette);
        for (title, text) in WHY_EXPLORE {
            ui.label(egui::RichText::new(title).strong().color(self.palette.heading));
            ui.label(egui::RichText::new(text).color(self.palette.text));
            ui.add_space(6.0);
        }

        ui::section_heading(ui, "Chapters", self.palette);
        self.draw_cards(ui, &p.chapters, None);
    }

    // ── Browse views ─────────────────────────────────────────────────────────

    fn draw_explore(&mut self, ui: &mut egui::Ui, p: &ExplorePage<'_>) {
        self.heading(ui, "Explore");
        ui.label(egui::RichText::new("Browse chapters by theme.").color(self.palette.muted));
        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            if ui.selectable_label(p.selected.is_none(), "All").clicked() {
                self.browse.explore_category = None;
            }
            for category in p.categories {
                let selected = p.selected == Some(category.as_str());
                if ui.selectable_label(selected, category.as_str()).clicked() {
                    self.browse.explore_category = Some(category.clone());
                }
            }
        });
        ui.add_space(8.0);
        self.draw_cards(ui, &p.chapters, None);
    }

    fn draw_wander(&mut self, ui: &mut egui::Ui, p: &WanderPage<'_>) {
        self.heading(ui, "Wander");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.browse.wander_query)
                    .hint_text("Filter chapters...")
                    .desired_width(320.0),
            );
            egui::ComboBox::from_id_salt("wander_sort")
                .selected_text(self.browse.wander_sort.label())
                .show_ui(ui, |ui| {
                    for sort in SortOrder::ALL {
                        ui.selectable_value(&mut self.browse.wander_sort, sort, sort.label());
                    }
                });
        });
        ui.add_space(4.0);
        ui.label(egui::RichText::new(p.summary()).color(self.palette.muted));
        ui.add_space(8.0);
        if p.results.is_empty() {
            ui.label("No chapters match this filter.");
        }
        let highlight = Some(p.query);
        self.draw_cards(ui, &p.results, highlight);
    }

    fn draw_library(&mut self, ui: &mut egui::Ui, p: &LibraryPage<'_>) {
        self.heading(ui, "Library");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.browse.library_query)
                    .hint_text("Search chapters and topics...")
                    .desired_width(320.0),
            );
            egui::ComboBox::from_id_salt("library_category")
                .selected_text(self.browse.library_category.as_deref().unwrap_or("All categories"))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.browse.library_category, None, "All categories");
                    for category in p.categories {
                        ui.selectable_value(
                            &mut self.browse.library_category,
                            Some(category.clone()),
                            category.as_str(),
                        );
                    }
                });
        });
        ui.add_space(8.0);

        if p.hits.is_empty() {
            ui.label(egui::RichText::new("No results found").color(self.palette.muted));
            return;
        }
        let highlight = Some(p.query);
        for hit in &p.hits {
            let chapter = hit.chapter;
            egui::Frame::group(ui.style())
                .fill(self.palette.card_bg)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let title = ui::maybe_highlight(
                            egui::RichText::new(&chapter.title).size(18.0).strong(),
                            &chapter.title,
                            highlight,
                        );
                        if ui.link(title).clicked() {
                            self.go(Route::chapter(&chapter.id));
                        }
                        ui::category_badge(ui, &chapter.category, chapter.rgb());
                    });
                    ui.label(ui::maybe_highlight(
                        egui::RichText::new(&chapter.teaser),
                        &chapter.teaser,
                        highlight,
                    ));
                    for sub in &hit.subtopics {
                        ui.horizontal_wrapped(|ui| {
                            ui.label("  \u{21B3}");
                            let text = ui::maybe_highlight(egui::RichText::new(&sub.title), &sub.title, highlight);
                            if ui.link(text).clicked() {
                                self.go(Route::Deep {
                                    id: chapter.id.clone(),
                                    section: Some(sub.id.clone()),
                                });
                            }
                            if let Some(summary) = &sub.summary {
                                ui.label(
                                    egui::RichText::new(ui::truncate_str(summary, 90))
                                        .color(self.palette.muted),
                                );
                            }
                        });
                    }
                });
            ui.add_space(6.0);
        }
    }

    // ── Chapter detail ───────────────────────────────────────────────────────

    fn draw_chapter(&mut self, ui: &mut egui::Ui, p: &ChapterPage<'_>) {
        let chapter = p.chapter;
        self.draw_visual(ui, &p.visual, CHAPTER_VISUAL_HEIGHT);
        ui.add_space(12.0);
        ui::category_badge(ui, &chapter.category, chapter.rgb());
        self.heading(ui, &chapter.title);
        ui.label(
            egui::RichText::new(&chapter.teaser)
                .size(17.0)
                .italics()
                .color(self.palette.muted),
        );
        ui.add_space(8.0);
        ui.label(egui::RichText::new(&chapter.description).color(self.palette.text));
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let trigger = ui.button("Read in depth");
            if trigger.clicked() {
                self.modal
                    .open(Some(trigger.id), egui::Id::new("deep_dive_close"), Vec::new());
            }
            if ui.button("Open the deep page").clicked() {
                self.go(Route::deep(&chapter.id));
            }
        });

        ui::section_heading(ui, "Overview", self.palette);
        for para in &p.paragraphs {
            ui.label(egui::RichText::new(*para).color(self.palette.text));
            ui.add_space(6.0);
        }

        if !p.key_concepts.is_empty() {
            ui::section_heading(ui, "Key concepts", self.palette);
            for concept in &p.key_concepts {
                ui::bullet(ui, concept, None);
            }
        }

        if !p.prompts.is_empty() {
            ui::section_heading(ui, "Reflect", self.palette);
            self.draw_prompts(ui, p);
        }

        self.draw_citations(ui, p.citations);
        self.draw_chapter_nav(ui, p.prev, p.next);
    }

    fn draw_prompts(&mut self, ui: &mut egui::Ui, p: &ChapterPage<'_>) {
        for prompt in &p.prompts {
            let i = prompt.index;
            egui::Frame::group(ui.style())
                .fill(self.palette.card_bg)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let expanded = self.prompts.is_expanded(i);
                    let arrow = if expanded { "\u{25BE}" } else { "\u{25B8}" };
                    ui.horizontal_wrapped(|ui| {
                        if ui.button(format!("{} {}", arrow, prompt.question)).clicked() {
                            self.prompts.toggle(i);
                        }
                        if prompt.saved.is_some() {
                            ui.label(egui::RichText::new("\u{2713} saved").small().color(self.palette.muted));
                        }
                    });
                    if !expanded {
                        return;
                    }
                    if let Some(hint) = prompt.hint {
                        ui.label(egui::RichText::new(hint).italics().color(self.palette.muted));
                    }
                    ui.add(
                        egui::TextEdit::multiline(self.prompts.draft_mut(i))
                            .hint_text("Write your reflection...")
                            .desired_rows(4)
                            .desired_width(f32::INFINITY),
                    );
                    let can_save = !self.prompts.draft(i).trim().is_empty();
                    if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                        if let Some(request) = self.prompts.save(i) {
                            self.actions.push(Action::SavePrompt {
                                chapter_id: p.chapter.id.clone(),
                                request,
                            });
                        }
                    }
                    if let Some(saved) = prompt.saved {
                        ui.add_space(4.0);
                        ui.label(
                            egui::RichText::new(format!("Last saved {}", saved.timestamp))
                                .small()
                                .color(self.palette.muted),
                        );
                        ui.label(egui::RichText::new(&saved.response).color(self.palette.text));
                    }
                });
            ui.add_space(4.0);
        }
    }

    fn draw_citations(&self, ui: &mut egui::Ui, citations: &[Citation]) {
        if citations.is_empty() {
            return;
        }
        ui::section_heading(ui, "Further Reading & Context", self.palette);
        for c in citations {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(format!("{} ({}). {}.", c.author, c.year, c.title))
                        .color(self.palette.text),
                );
                if let Some(url) = c.doi_url() {
                    ui.hyperlink_to("DOI", url);
                } else if let Some(url) = &c.url {
                    ui.hyperlink_to("Link", url);
                }
            });
        }
    }

    fn draw_chapter_nav(
        &mut self,
        ui: &mut egui::Ui,
        prev: Option<&Chapter>,
        next: Option<&Chapter>,
    ) {
        ui.add_space(20.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Back to Explorer").clicked() {
                self.go(Route::Explore);
            }
            if let Some(prev) = prev {
                if ui.button(format!("\u{25C0} {}", prev.title)).clicked() {
                    self.go(Route::chapter(&prev.id));
                }
            }
            if let Some(next) = next {
                if ui.button(format!("{} \u{25B6}", next.title)).clicked() {
                    self.go(Route::chapter(&next.id));
                }
            }
        });
    }

    // ── Deep view ────────────────────────────────────────────────────────────

    fn draw_deep(&mut self, ui: &mut egui::Ui, p: &DeepPage<'_>) {
        let chapter = p.chapter;
        self.draw_visual(ui, &p.visual, DEEP_VISUAL_HEIGHT);
        ui.add_space(12.0);
        ui::category_badge(ui, &chapter.category, chapter.rgb());
        self.heading(ui, &chapter.title);

        // Section navigation
        ui.horizontal_wrapped(|ui| {
            if ui.selectable_label(p.focus_section.is_none(), "Overview").clicked() {
                self.go(Route::deep(&chapter.id));
            }
            for s in &p.subtopics {
                let id = s.subtopic.id.as_str();
                if ui.selectable_label(p.focus_section == Some(id), s.subtopic.title.as_str()).clicked() {
                    self.go(Route::Deep {
                        id: chapter.id.clone(),
                        section: Some(id.to_string()),
                    });
                }
            }
        });

        ui::section_heading(ui, "Deep Exploration", self.palette);
        for para in &p.paragraphs {
            ui.label(egui::RichText::new(*para).color(self.palette.text));
            ui.add_space(6.0);
        }

        for s in &p.subtopics {
            let sub = s.subtopic;
            let heading = ui::section_heading(ui, &sub.title, self.palette);
            if *self.scroll_to_section && p.focus_section == Some(sub.id.as_str()) {
                heading.scroll_to_me(Some(egui::Align::TOP));
                *self.scroll_to_section = false;
            }
            if let Some(summary) = &sub.summary {
                ui.label(egui::RichText::new(summary).italics().color(self.palette.muted));
            }
            if sub.has_illustration() {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 120.0), egui::Sense::hover());
                ui.painter().rect_stroke(rect, 6.0, egui::Stroke::new(1.0, self.palette.border));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("Illustration: {}", sub.title),
                    egui::FontId::proportional(13.0),
                    self.palette.muted,
                );
            }
            ui.add_space(4.0);
            ui.label(egui::RichText::new(&sub.content).color(self.palette.text));
            if !sub.examples.is_empty() {
                ui.add_space(4.0);
                ui.label(egui::RichText::new("Examples").strong().color(self.palette.heading));
                for example in &sub.examples {
                    ui::bullet(ui, example, None);
                }
            }
            if !s.recommended.is_empty() {
                ui.add_space(4.0);
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new("Recommended next:").color(self.palette.muted));
                    for next in &s.recommended {
                        if ui.button(next.title.as_str()).clicked() {
                            self.go(Route::deep(&next.id));
                        }
                    }
                });
            }
        }
        *self.scroll_to_section = false;

        self.draw_citations(ui, p.citations);

        ui::section_heading(ui, "Practical Implications", self.palette);
        for item in PRACTICAL_IMPLICATIONS {
            ui::bullet(ui, item, None);
        }
        ui::section_heading(ui, "Caveats & Open Questions", self.palette);
        ui.label(egui::RichText::new(CAVEATS).color(self.palette.text));

        ui.add_space(20.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Back to chapter").clicked() {
                self.go(Route::chapter(&chapter.id));
            }
            if let Some(prev) = p.prev {
                if ui.button(format!("\u{25C0} {}", prev.title)).clicked() {
                    self.go(Route::deep(&prev.id));
                }
            }
            if let Some(next) = p.next {
                if ui.button(format!("{} \u{25B6}", next.title)).clicked() {
                    self.go(Route::deep(&next.id));
                }
            }
        });
    }

    fn draw_not_found(&mut self, ui: &mut egui::Ui, p: &NotFoundPage) {
        ui.add_space(80.0);
        self.heading(ui, p.message);
        ui.label(egui::RichText::new(&p.path).monospace().color(self.palette.muted));
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Go home").clicked() {
                self.go(Route::Home);
            }
            if ui.button("Browse chapters").clicked() {
                self.go(Route::Explore);
            }
        });
    }

    // ── Deep-dive overlay ────────────────────────────────────────────────────

    /// Draw the "read in depth" overlay over a chapter page, if open.
    ///
    /// Tab and Shift-Tab are consumed so egui's own focus traversal cannot
    /// leave the dialog.
    pub fn draw_modal(&mut self, page: &Page<'_>) {
        let Page::Chapter(p) = page else { return };
        if !self.modal.is_open() {
            return;
        }
        let ctx = self.ctx;
        let palette = self.palette;
        let chapter = p.chapter;

        let (shift_tab, tab, escape) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::SHIFT, egui::Key::Tab),
                i.consume_key(egui::Modifiers::NONE, egui::Key::Tab),
                i.consume_key(egui::Modifiers::NONE, egui::Key::Escape),
            )
        });
        if escape {
            if let Some(trigger) = self.modal.key(ModalKey::Escape) {
                request_focus(ctx, trigger);
            }
            return;
        }
        let moved = shift_tab || tab;
        if shift_tab {
            self.modal.key(ModalKey::ShiftTab);
        }
        if tab {
            self.modal.key(ModalKey::Tab);
        }
        if moved {
            if let Some(id) = self.modal.focused() {
                request_focus(ctx, *id);
            }
        }

        let screen = ctx.screen_rect();
        let backdrop = egui::Area::new(egui::Id::new("deep_dive_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let response = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(screen, 0.0, palette.scrim);
                response
            })
            .inner;

        let expanded: Vec<bool> = chapter
            .subtopics
            .iter()
            .map(|s| self.modal.is_expanded(&s.id))
            .collect();
        let mut close_id = None;
        let mut inner_ids = Vec::new();
        let mut close_clicked = false;
        let mut toggled = Vec::new();
        let mut open_page = false;

        egui::Window::new(format!("In depth: {}", chapter.title))
            .id(egui::Id::new("deep_dive"))
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(640.0)
            .max_height(screen.height() * 0.8)
            .show(ctx, |ui| {
                let close = ui.button("\u{2715} Close");
                close_id = Some(close.id);
                close_clicked = close.clicked();
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("deep_dive_scroll")
                    .max_height(screen.height() * 0.6)
                    .show(ui, |ui| {
                        for para in &p.paragraphs {
                            ui.label(egui::RichText::new(*para).color(palette.text));
                            ui.add_space(6.0);
                        }
                        for (sub, &open) in chapter.subtopics.iter().zip(&expanded) {
                            let arrow = if open { "\u{25BE}" } else { "\u{25B8}" };
                            let toggle = ui.button(format!("{} {}", arrow, sub.title));
                            inner_ids.push(toggle.id);
                            if toggle.clicked() {
                                toggled.push(sub.id.clone());
                            }
                            if open {
                                if let Some(summary) = &sub.summary {
                                    ui.label(egui::RichText::new(summary).italics().color(palette.muted));
                                }
                                ui.label(egui::RichText::new(&sub.content).color(palette.text));
                                for example in &sub.examples {
                                    ui::bullet(ui, example, None);
                                }
                                ui.add_space(6.0);
                            }
                        }
                    });
                ui.separator();
                let full = ui.button("Open the deep page");
                inner_ids.push(full.id);
                open_page = full.clicked();
            });

        for id in &toggled {
            self.modal.toggle_subtopic(id);
        }
        if let Some(close) = close_id {
            self.modal.set_focusables(close, inner_ids);
        }

        if close_clicked || backdrop.clicked() {
            let trigger = if close_clicked {
                self.modal.close()
            } else {
                self.modal.backdrop_click()
            };
            if let Some(trigger) = trigger {
                request_focus(ctx, trigger);
            }
            return;
        }
        if open_page {
            self.go(Route::deep(&chapter.id));
            return;
        }

        // Keep keyboard focus inside the dialog; follow pointer focus.
        let focused = ctx.memory(|m| m.focused());
        let adopted = focused.is_some_and(|f| self.modal.focus(&f));
        if !adopted {
            if let Some(id) = self.modal.focused() {
                request_focus(ctx, *id);
            }
        }
    }
}
