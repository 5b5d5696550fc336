use eframe::egui;

use human_nature_explorer::config::Config;
use human_nature_explorer::content::Catalog;
use human_nature_explorer::progress::ProgressStore;
use human_nature_explorer::render::Capability;

mod app;
mod ui;

use app::ExplorerApp;

fn main() {
    env_logger::init();

    let config = Config::from_env();
    let catalog = match Catalog::load_bundled() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("bundled chapter table is invalid: {}", e);
            std::process::exit(1);
        }
    };
    let store = ProgressStore::open(&config);
    let capability = Capability::probe(&config.signals);
    log::info!(
        "{} chapters, progress backend: {}, visuals: {:?}",
        catalog.len(),
        store.backend_name(),
        capability
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Human Nature Explorer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ExplorerApp::new(
                cc, catalog, store, capability, config.signals,
            )))
        }),
    );
    if let Err(e) = result {
        log::error!("failed to start Human Nature Explorer: {}", e);
        std::process::exit(1);
    }
}
