//! RETRO_OS desktop entry point.
//!
//! Power-off screen, boot text, a 4-wide menu grid of game cartridges plus
//! the A.I. terminal and 8-bit radio, and a looping chiptune.
//! F1 (or clicking the power button) powers on, arrows navigate, Enter
//! launches, F2 toggles music, PgUp/PgDn change volume, Escape backs out.
//! Closing the window quits. Set `RETRO_SKIN=amber` for the amber skin.

mod app_state;
mod input;
mod launch;
mod layout;
mod render;
mod workers;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use app_state::AppState;
use retro_backend_sdl::SdlBackend;
use retro_core::backend::{InputBackend, RenderBackend};
use retro_core::config::RetroConfig;
use retro_core::console::Console;
use retro_core::net::{GenAiClient, RustlsTlsProvider};
use retro_core::skin;
use workers::Workers;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RetroConfig::from_env();
    log::info!(
        "Starting RETRO_OS ({}x{})",
        config.screen_width,
        config.screen_height,
    );

    let mut backend = SdlBackend::new(
        &config.window_title,
        config.screen_width,
        config.screen_height,
    )?;

    // A missing audio device only costs the music.
    let mut audio = match backend.open_audio() {
        Ok(audio) => Some(audio),
        Err(e) => {
            log::warn!("Audio unavailable: {e}");
            None
        },
    };

    let skin = skin::load_builtin(&config.skin).or_else(|e| {
        log::warn!("{e}; falling back to the retro skin");
        skin::load_builtin("retro")
    })?;
    log::info!(
        "Loaded skin: {} v{}",
        skin.manifest.name,
        skin.manifest.version
    );

    let client = GenAiClient::from_config(&config, Arc::new(RustlsTlsProvider::new()));
    let online = client.is_online();
    let workers = Workers::new(Arc::new(client));

    let mut rng = rand::thread_rng();
    let console = Console::new(&config, skin, &mut rng);
    let mut state = AppState::new(&config, console, workers, online);

    let mut last_frame = Instant::now();
    'running: loop {
        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;

        for event in backend.poll_events() {
            if input::handle_input(&event, &mut state) == input::InputResult::Quit {
                break 'running;
            }
        }

        for completion in state.workers.drain() {
            state.console.complete(completion);
        }

        state.console.tick(dt);
        state.animate(dt, &mut rng);

        if let Some(device) = audio.as_mut() {
            if let Err(e) = state.console.sync_audio(device) {
                log::warn!("Audio sync failed: {e}");
            }
        }

        render::draw(&mut backend, &state)?;
        backend.swap_buffers()?;
    }

    if state.workers.in_flight() > 0 {
        log::info!(
            "Abandoning {} in-flight request(s)",
            state.workers.in_flight()
        );
    }
    backend.shutdown()?;
    log::info!("RETRO_OS shut down cleanly");
    Ok(())
}
