use biotope::simulation::params::Params;
use biotope::simulation::stats::GenomeStat;
use biotope::simulation::universe::{TickReport, Universe};
use egui_macroquad::egui;
use std::collections::VecDeque;
use std::path::PathBuf;

const MAX_HISTORY_POINTS: usize = 500;

#[allow(clippy::struct_excessive_bools)]
pub struct UIState {
    pub stats_panel_width: f32,
    pub population_history: VecDeque<(f64, f64)>,
    pub living_history: VecDeque<(f64, f64)>,
    pub genome_count_history: VecDeque<(f64, f64)>,
    /// Ticks between two history samples.
    history_interval: u64,
    pub births: usize,
    pub removals: usize,
    pub extinctions: usize,
    pub save_requested: bool,
    pub load_requested: bool,
    pub reset_requested: bool,
    pub status_message: Option<String>,
    pub ticks_per_frame: usize,
    pub paused: bool,
    pub rendering_enabled: bool,
    pub last_snapshot: Option<PathBuf>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 320.0,
            population_history: VecDeque::new(),
            living_history: VecDeque::new(),
            genome_count_history: VecDeque::new(),
            history_interval: 10,
            births: 0,
            removals: 0,
            extinctions: 0,
            save_requested: false,
            load_requested: false,
            reset_requested: false,
            status_message: None,
            ticks_per_frame: 1,
            paused: false,
            rendering_enabled: true,
            last_snapshot: None,
        }
    }

    pub fn clear_history(&mut self) {
        self.population_history.clear();
        self.living_history.clear();
        self.genome_count_history.clear();
        self.births = 0;
        self.removals = 0;
        self.extinctions = 0;
    }

    pub fn record_tick(&mut self, universe: &Universe, report: TickReport) {
        self.births += report.births;
        self.removals += report.removed;
        if report.extinct > 0 {
            self.extinctions += 1;
        }

        if universe.time % self.history_interval != 0 {
            return;
        }

        let time = universe.time as f64;
        push_bounded(
            &mut self.population_history,
            (time, report.population as f64),
        );
        push_bounded(&mut self.living_history, (time, universe.living() as f64));
        push_bounded(
            &mut self.genome_count_history,
            (time, universe.census().len() as f64),
        );
    }
}

fn push_bounded(history: &mut VecDeque<(f64, f64)>, point: (f64, f64)) {
    history.push_back(point);
    if history.len() > MAX_HISTORY_POINTS {
        history.pop_front();
    }
}

pub fn draw_ui(state: &mut UIState, universe: &Universe, genomes: &[GenomeStat], params: &Params) {
    egui_macroquad::ui(|egui_ctx| {
        // Configure brighter text and UI
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, universe, genomes, params);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
