//! `ExplorerApp`: the top-level egui application state.
//!
//! This module holds the struct, its constructor and the `eframe::App`
//! frame loop. Methods are split across the sibling sub-modules:
//!
//! - `navigation`: history, route changes, scene mounting
//! - `toolbar`: header and footer
//! - `content`: page rendering and the deep-dive overlay

pub mod content;
pub mod navigation;
pub mod toolbar;

use std::sync::mpsc::Receiver;

use eframe::egui;

use human_nature_explorer::config::EnvSignals;
use human_nature_explorer::content::search::LibraryIndex;
use human_nature_explorer::content::Catalog;
use human_nature_explorer::input::{InputEvent, InputHub, Subscription};
use human_nature_explorer::progress::{ProgressRecord, ProgressStore, ThemeChange};
use human_nature_explorer::render::palette::Palette;
use human_nature_explorer::render::Capability;
use human_nature_explorer::view::{
    compose, BrowseState, ComposeContext, DeepDiveModal, History, PromptPanel, Route, SaveRequest,
};

use content::PageUi;

/// Something a page asked for while it was being drawn. Applied after the
/// frame's view model is released.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(Route),
    SavePrompt { chapter_id: String, request: SaveRequest },
    Visit(String),
}

/// Input listener of the currently mounted scene.
pub struct SceneMount {
    /// Route and chapter the scene was mounted for.
    pub key: (Route, String),
    pub subscription: Subscription,
}

// ─── Application state ───────────────────────────────────────────────────────

pub struct ExplorerApp {
    pub catalog: Catalog,
    pub store: ProgressStore,
    /// Snapshot of the store, refreshed after each write.
    pub progress: ProgressRecord,
    pub history: History,
    pub browse: BrowseState,
    pub prompts: PromptPanel,
    pub modal: DeepDiveModal<egui::Id>,
    pub capability: Capability,
    pub signals: EnvSignals,
    pub input: InputHub,
    pub mount: Option<SceneMount>,
    pub viewport: [f32; 2],
    pub dark_mode: bool,
    pub theme_rx: Receiver<ThemeChange>,
    /// Set by navigation: the next page to render counts as a visit.
    pub visit_pending: bool,
    /// Set by navigation: jump back to the top of the page.
    pub reset_scroll: bool,
    /// Page scroll offset last forwarded to the input hub.
    pub last_scroll: [f32; 2],
    /// Set by navigation to a deep section: scroll it into view once.
    pub scroll_to_section: bool,
}

impl ExplorerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        catalog: Catalog,
        store: ProgressStore,
        capability: Capability,
        signals: EnvSignals,
    ) -> Self {
        let progress = store.load();
        let theme_rx = store.theme().subscribe();
        let dark_mode = store.theme().is_dark();
        let reduced = signals.prefers_reduced_motion || progress.preferences.reduced_motion;
        let screen = cc.egui_ctx.screen_rect();
        let viewport = [screen.width(), screen.height()];

        Self {
            catalog,
            store,
            progress,
            history: History::default(),
            browse: BrowseState::default(),
            prompts: PromptPanel::new(),
            modal: DeepDiveModal::new(),
            capability,
            signals,
            input: InputHub::new(viewport, reduced),
            mount: None,
            viewport,
            dark_mode,
            theme_rx,
            visit_pending: false,
            reset_scroll: false,
            last_scroll: [0.0, 0.0],
            scroll_to_section: false,
        }
    }

    /// System signal or stored preference.
    pub fn reduced_motion(&self) -> bool {
        self.signals.prefers_reduced_motion || self.progress.preferences.reduced_motion
    }

    /// Re-read the record after a write.
    pub fn refresh_progress(&mut self) {
        self.progress = self.store.load();
        self.input.set_reduced_motion(self.reduced_motion());
    }

    fn poll_theme(&mut self) {
        while let Ok(change) = self.theme_rx.try_recv() {
            self.dark_mode = change.dark;
        }
    }

    /// Forward pointer, touch and resize events to the input hub.
    fn forward_input(&mut self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        let size = [screen.width(), screen.height()];
        let mut events = Vec::new();
        if size != self.viewport {
            self.viewport = size;
            events.push(InputEvent::Resized {
                width: size[0],
                height: size[1],
            });
        }
        ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::PointerMoved(pos) => {
                        events.push(InputEvent::PointerMoved { x: pos.x, y: pos.y });
                    }
                    egui::Event::Touch { phase, pos, .. } => {
                        let points = match phase {
                            egui::TouchPhase::Start | egui::TouchPhase::Move => vec![[pos.x, pos.y]],
                            egui::TouchPhase::End | egui::TouchPhase::Cancel => Vec::new(),
                        };
                        events.push(InputEvent::Touch { points });
                    }
                    _ => {}
                }
            }
        });
        for event in &events {
            self.input.dispatch(event);
        }
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Navigate(route) => self.navigate(route),
                Action::SavePrompt { chapter_id, request } => {
                    self.store
                        .append_saved_prompt(&chapter_id, request.prompt_index, &request.response);
                    self.refresh_progress();
                }
                Action::Visit(chapter_id) => {
                    self.store.mark_visited(&chapter_id);
                    self.refresh_progress();
                }
            }
        }
    }

    fn draw_page(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> Vec<Action> {
        let route = self.history.current().clone();
        let browse = self.browse.clone();
        let index = LibraryIndex::build(&self.catalog);
        let cx = ComposeContext {
            catalog: &self.catalog,
            index: &index,
            progress: &self.progress,
            browse: &browse,
            capability: self.capability,
        };
        let page = compose(&route, &cx);

        let mut actions = Vec::new();
        if std::mem::take(&mut self.visit_pending) {
            if let Some(id) = page.visited_chapter() {
                actions.push(Action::Visit(id.to_string()));
            }
        }

        let scene = content::scene_request(&page);
        navigation::sync_mount(
            &mut self.mount,
            &self.input,
            &route,
            scene.as_ref().map(|(id, _)| id.as_str()),
        );
        let pose = content::scene_pose(
            ctx,
            self.mount.as_ref(),
            scene.is_some_and(|(_, auto_rotate)| auto_rotate),
            self.signals.prefers_reduced_motion || self.progress.preferences.reduced_motion,
        );
        if self.mount.is_some() {
            ctx.request_repaint();
        }

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("page_scroll")
            .auto_shrink([false, false]);
        if std::mem::take(&mut self.reset_scroll) {
            scroll = scroll.vertical_scroll_offset(0.0);
        }
        let mut page_ui = PageUi {
            ctx,
            palette: Palette::for_theme(self.dark_mode),
            browse: &mut self.browse,
            prompts: &mut self.prompts,
            modal: &mut self.modal,
            actions: &mut actions,
            pose,
            scroll_to_section: &mut self.scroll_to_section,
        };
        let output = scroll.show(ui, |ui| page_ui.draw(ui, &page));
        page_ui.draw_modal(&page);

        let offset = output.state.offset;
        if scroll_moved(&mut self.last_scroll, [offset.x, offset.y]) {
            self.input.dispatch(&InputEvent::Scrolled {
                x: offset.x,
                y: offset.y,
            });
        }

        if self.browse != browse {
            ctx.request_repaint();
        }
        actions
    }
}

/// Record `offset` and report whether it differs from the previous one.
fn scroll_moved(last: &mut [f32; 2], offset: [f32; 2]) -> bool {
    if *last == offset {
        return false;
    }
    *last = offset;
    true
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_theme();

        // Apply dark/light visuals
        ctx.set_visuals(Palette::for_theme(self.dark_mode).egui_visuals(self.dark_mode));

        self.forward_input(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui);
        });
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.draw_footer(ui);
        });

        let mut actions = Vec::new();
        let ctx_clone = ctx.clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            actions = self.draw_page(ui, &ctx_clone);
        });
        self.apply(actions);
    }
}
