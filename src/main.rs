//! Toddler Counting Game
//!
//! Counts from 1 to 10 with a picture, a sound and a twirl for every
//! number, then congratulates the player and offers another round.

mod app;
mod assets;
mod audio;
mod config;
mod domain;
mod platform;
mod ui;

use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use app::{AppError, GameController};
use assets::AssetResolver;
use config::GameSettings;
use ui::{SceneRenderer, TextPainter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn load_settings() -> GameSettings {
    match GameSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{e}; using default settings");
            GameSettings::defaults()
        }
    }
}

fn run(settings: GameSettings) -> Result<(), AppError> {
    info!(asset_root = %settings.asset_root.display(), "Starting counting game");

    let resolver = AssetResolver::new(&settings.asset_root);
    let controller = GameController::new(resolver, audio::open_default_output());

    let mut renderer = SceneRenderer::new(TextPainter::load(settings.font_path.as_deref()));
    renderer.set_background(controller.background_image().as_deref());

    launch(controller, renderer, &settings.window_title)
}

#[cfg(windows)]
fn launch(controller: GameController, renderer: SceneRenderer, title: &str) -> Result<(), AppError> {
    ui::window::run(controller, renderer, title).map_err(|e| AppError::Window(e.to_string()))
}

#[cfg(not(windows))]
fn launch(_controller: GameController, _renderer: SceneRenderer, _title: &str) -> Result<(), AppError> {
    Err(AppError::UnsupportedPlatform(std::env::consts::OS))
}

fn main() -> ExitCode {
    init_tracing();

    match run(load_settings()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
