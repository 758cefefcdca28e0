//! Main application for the TubeFetch downloader GUI

// Application window and frame loop
mod app;
// Saved configuration handling
mod config;
// External tool discovery (ffmpeg, yt-dlp, JS runtimes)
mod detect;
// External downloader spawning logic (yt-dlp)
mod downloader;
// Output template and format selection helpers
mod format;
// Message catalogs for the display languages
mod i18n;
// Data models for download tasks and form fields
mod model;
// Form field to yt-dlp option translation
mod options;
// Command line preview rendering
mod preview;
// Worker output parsing utilities
mod relay;
// Settings window state
mod settings;
// Option tab forms
mod tabs;

use std::sync::Arc;

// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;

use app::{window_title, AppShell};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging and the runtime, then
/// launches the GUI
fn main() -> Result<(), eframe::Error> {
    init_logging();

    // Create a new Tokio runtime and store it globally
    let rt = Arc::new(Runtime::new().unwrap());
    RUNTIME.set(rt).unwrap();

    let config = config::load_config(&config::config_path());
    let title = window_title(&i18n::Translator::new(&config.language));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1000.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(AppShell::new(cc, config))),
    )
}

/// Timestamped console logging
fn init_logging() {
    let result = fern::Dispatch::new()
        .level(log::LevelFilter::Info)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply();
    if let Err(error) = result {
        eprintln!("Logging setup failed: {error}");
    }
}
