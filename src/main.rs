use biotope::simulation::params::Params;
use biotope::simulation::universe::Universe;
use chrono::Local;
use macroquad::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod graphics;
mod ui;

fn window_conf() -> Conf {
    Conf {
        window_title: "Biotope".to_owned(),
        window_width: 1140,
        window_height: 620,
        ..Default::default()
    }
}

/// Loads parameters from the JSON file given as first argument, if any.
fn load_params() -> Params {
    let Some(path) = std::env::args().nth(1) else {
        return Params::default();
    };

    match Params::load_from_file(&path) {
        Ok(params) => {
            info!(path = %path, "loaded configuration");
            params
        }
        Err(e) => {
            error!(path = %path, "invalid configuration: {e}");
            std::process::exit(1);
        }
    }
}

fn snapshot_path() -> PathBuf {
    PathBuf::from(format!(
        "biotope-{}.json",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = load_params();

    let mut universe = match Universe::new(&params) {
        Ok(universe) => universe,
        Err(e) => {
            error!("cannot create universe: {e}");
            std::process::exit(1);
        }
    };

    let mut ui_state = ui::UIState::new();

    loop {
        clear_background(BLACK);

        if !ui_state.paused {
            for _ in 0..ui_state.ticks_per_frame {
                let report = universe.tick(&params);
                ui_state.record_tick(&universe, report);
            }
        }

        if ui_state.rendering_enabled {
            graphics::draw_world(&params);
            graphics::draw_creatures(&universe, &params);
        }

        let genomes = universe.top_genomes(&params, params.stats_top_n);
        ui::draw_ui(&mut ui_state, &universe, &genomes, &params);
        ui::process_egui();

        if ui_state.save_requested {
            ui_state.save_requested = false;
            let path = snapshot_path();
            match universe.save_to_file(&path) {
                Ok(()) => {
                    ui_state.status_message = Some(format!("Saved to {}", path.display()));
                    ui_state.last_snapshot = Some(path);
                }
                Err(e) => {
                    warn!("save failed: {e}");
                    ui_state.status_message = Some(format!("Save failed: {e}"));
                }
            }
        }

        if ui_state.load_requested {
            ui_state.load_requested = false;
            match ui_state.last_snapshot.clone() {
                Some(path) => match Universe::load_from_file(&path) {
                    Ok(loaded) => {
                        universe = loaded;
                        ui_state.clear_history();
                        ui_state.status_message = Some(format!("Loaded {}", path.display()));
                    }
                    Err(e) => {
                        warn!("load failed: {e}");
                        ui_state.status_message = Some(format!("Load failed: {e}"));
                    }
                },
                None => {
                    ui_state.status_message = Some("Nothing saved yet".to_owned());
                }
            }
        }

        if ui_state.reset_requested {
            ui_state.reset_requested = false;
            match Universe::new(&params) {
                Ok(fresh) => {
                    universe = fresh;
                    ui_state.clear_history();
                    ui_state.status_message = Some("Universe reset".to_owned());
                }
                Err(e) => error!("cannot reset universe: {e}"),
            }
        }

        next_frame().await
    }
}
