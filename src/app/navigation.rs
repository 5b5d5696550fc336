//! Navigation methods for `ExplorerApp`.
//!
//! Covers history management (`go_back`, `go_forward`, `navigate`) and the
//! per-view teardown that runs on every route change, plus mounting the
//! input listener of the scene a page shows.

use human_nature_explorer::input::{InputEvent, InputHub};
use human_nature_explorer::view::{PromptPanel, Route};

use super::{ExplorerApp, SceneMount};

impl ExplorerApp {
    /// Navigate one step back in history.
    pub fn go_back(&mut self) {
        if let Some(route) = self.history.back().cloned() {
            self.enter(&route);
        }
    }

    /// Navigate one step forward in history.
    pub fn go_forward(&mut self) {
        if let Some(route) = self.history.forward().cloned() {
            self.enter(&route);
        }
    }

    /// Push `route` to history and show it.
    pub fn navigate(&mut self, route: Route) {
        if *self.history.current() == route {
            return;
        }
        self.history.push(route.clone());
        self.enter(&route);
    }

    /// Tear down the old view's state and prepare the new one.
    fn enter(&mut self, route: &Route) {
        log::debug!("route {}", route);
        self.mount = None;
        if let Some(trigger) = self.modal.close() {
            log::debug!("deep-dive closed by navigation (trigger {:?})", trigger);
        }
        self.prompts = PromptPanel::new();
        self.visit_pending = true;
        self.scroll_to_section = matches!(route, Route::Deep { section: Some(_), .. });
        self.reset_scroll = !self.scroll_to_section;
        if self.reset_scroll {
            self.input.dispatch(&InputEvent::Scrolled { x: 0.0, y: 0.0 });
            self.last_scroll = [0.0, 0.0];
        }
    }
}

/// Keep exactly one listener attached while a scene is on screen.
///
/// A page without a scene drops the listener; a different route or chapter
/// replaces it with a fresh one.
pub fn sync_mount(mount: &mut Option<SceneMount>, hub: &InputHub, route: &Route, scene: Option<&str>) {
    let Some(chapter_id) = scene else {
        *mount = None;
        return;
    };
    let current = mount
        .as_ref()
        .is_some_and(|m| m.key.0 == *route && m.key.1 == chapter_id);
    if !current {
        *mount = None;
        *mount = Some(SceneMount {
            key: (route.clone(), chapter_id.to_string()),
            subscription: hub.attach(),
        });
    }
}
