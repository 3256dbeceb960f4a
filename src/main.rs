#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use roi_editor::{EditorConfig, JsonFileRoiStore, RoiApp};

const CONFIG_ENV: &str = "ROI_EDITOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "roi_editor.json";

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = EditorConfig::load(&config_path).unwrap_or_else(|err| {
        log::error!("Ignoring {}: {}", config_path, err);
        EditorConfig::default()
    });

    let store = match JsonFileRoiStore::open(&config.store_path) {
        Ok(store) => store.with_cameras(config.cameras.iter().map(|camera| camera.id)),
        Err(err) => {
            log::error!("Cannot open ROI store {}: {}", config.store_path.display(), err);
            std::process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "ROI Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(RoiApp::new(cc, config, store)))),
    )
}
