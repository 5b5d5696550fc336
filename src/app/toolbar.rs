//! Header and footer for `ExplorerApp`.
//!
//! The header carries back/forward, the section links and the theme and
//! motion toggles; the footer shows reading progress.

use eframe::egui;

use human_nature_explorer::progress::Preference;
use human_nature_explorer::view::Route;

use super::ExplorerApp;

const SECTIONS: [(&str, Route); 4] = [
    ("Home", Route::Home),
    ("Explore", Route::Explore),
    ("Wander", Route::Wander),
    ("Library", Route::Library),
];

impl ExplorerApp {
    /// Render the top header strip.
    pub fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Back / Forward
            if ui
                .add_enabled(
                    self.history.can_go_back(),
                    egui::Button::new("\u{25C0}").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Back")
                .clicked()
            {
                self.go_back();
            }
            if ui
                .add_enabled(
                    self.history.can_go_forward(),
                    egui::Button::new("\u{25B6}").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Forward")
                .clicked()
            {
                self.go_forward();
            }

            ui.add_space(8.0);
            ui.strong("Human Nature Explorer");
            ui.separator();

            let current = self.history.current().clone();
            for (label, route) in SECTIONS {
                let active = match (&current, &route) {
                    (Route::Chapter { .. } | Route::Deep { .. }, Route::Explore) => true,
                    (a, b) => a == b,
                };
                if ui.selectable_label(active, label).clicked() {
                    self.navigate(route);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Dark mode toggle
                let icon = if self.dark_mode { "\u{2600}" } else { "\u{263E}" };
                let hint = if self.dark_mode {
                    "Switch to light mode"
                } else {
                    "Switch to dark mode"
                };
                if ui.button(icon).on_hover_text(hint).clicked() {
                    self.store.set_preference(Preference::DarkMode(!self.dark_mode));
                    self.refresh_progress();
                }

                let mut reduced = self.progress.preferences.reduced_motion;
                let toggle = ui
                    .checkbox(&mut reduced, "Reduce motion")
                    .on_hover_text("Stop scene rotation and drift");
                if toggle.changed() {
                    self.store.set_preference(Preference::ReducedMotion(reduced));
                    self.refresh_progress();
                }
            });
        });
    }

    /// Render the bottom status strip.
    pub fn draw_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Visited {} of {} chapters",
                self.progress.visited_count(),
                self.catalog.len()
            ));
            ui.separator();
            ui.label(format!("{} saved reflections", self.progress.saved_prompts.len()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(self.history.current().to_path());
            });
        });
    }
}
