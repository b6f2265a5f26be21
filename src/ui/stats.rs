use biotope::simulation::genome::GenomeColors;
use biotope::simulation::params::Params;
use biotope::simulation::stats::GenomeStat;
use biotope::simulation::universe::Universe;
use egui_macroquad::egui;
use egui_plot::{Line, Plot, PlotPoints};
use std::collections::VecDeque;

use super::ui::UIState;

const SWATCH_SIZE: f32 = 16.0;

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    universe: &Universe,
    genomes: &[GenomeStat],
    params: &Params,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.heading("Biotope");
            ui.separator();

            // Save/Load/Reset buttons
            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    state.save_requested = true;
                }
                if ui.button("📂 Load").clicked() {
                    state.load_requested = true;
                }
                if ui.button("🔄 Reset").clicked() {
                    state.reset_requested = true;
                }
            });

            ui.horizontal(|ui| {
                let pause_text = if state.paused { "▶ Resume" } else { "⏸ Pause" };
                if ui.button(pause_text).clicked() {
                    state.paused = !state.paused;
                }
                let render_text = if state.rendering_enabled {
                    "🎨 Rendering: ON"
                } else {
                    "🎨 Rendering: OFF"
                };
                if ui.button(render_text).clicked() {
                    state.rendering_enabled = !state.rendering_enabled;
                }
            });

            if let Some(ref msg) = state.status_message {
                ui.label(msg.as_str());
            }

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(egui::Slider::new(&mut state.ticks_per_frame, 1..=50).text("ticks/frame"));

            ui.separator();

            ui.label(format!("Tick: {}", universe.time));
            ui.label(format!(
                "Creatures: {} ({} alive)",
                universe.creatures.len(),
                universe.living()
            ));
            ui.label(format!("Next extinction in: {:.0}", universe.extinction));
            ui.label(format!(
                "Births: {}  Removals: {}  Extinctions: {}",
                state.births, state.removals, state.extinctions
            ));

            ui.separator();
            ui.heading("Population");
            draw_population_plot(ui, &state.population_history, &state.living_history);

            ui.collapsing("Distinct genomes", |ui| {
                draw_time_series_plot(
                    ui,
                    "genome_count_plot",
                    &state.genome_count_history,
                    "Tick",
                    "Genomes",
                );
            });

            ui.separator();
            ui.heading(format!("Top {} genomes", params.stats_top_n));
            draw_genome_table(ui, genomes);
        });
}

fn draw_genome_table(ui: &mut egui::Ui, genomes: &[GenomeStat]) {
    if genomes.is_empty() {
        ui.label("Nothing alive.");
        return;
    }

    egui::Grid::new("genome_table")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui| {
            for stat in genomes {
                draw_swatch(ui, stat.colors);
                ui.label(stat.name.as_str());
                ui.label(egui::RichText::new(format!("× {}", stat.count)).strong());
                ui.end_row();
            }
        });
}

/// Small square filled with the inner color and framed with the outer one.
fn draw_swatch(ui: &mut egui::Ui, colors: GenomeColors) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::hover());
    let painter = ui.painter();
    let [r, g, b] = colors.outer;
    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(r, g, b));
    let [r, g, b] = colors.inner;
    painter.rect_filled(rect.shrink(2.0), 0.0, egui::Color32::from_rgb(r, g, b));
}

fn draw_time_series_plot(
    ui: &mut egui::Ui,
    id: &str,
    data: &VecDeque<(f64, f64)>,
    x_label: &str,
    y_label: &str,
) {
    if data.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let points: PlotPoints = data.iter().map(|&(x, y)| [x, y]).collect();
    let line = Line::new(points);

    Plot::new(id)
        .height(150.0)
        .show_axes([true, true])
        .label_formatter(|_name, value| {
            format!("{}: {:.0}\n{}: {:.0}", x_label, value.x, y_label, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}

fn draw_population_plot(
    ui: &mut egui::Ui,
    population_data: &VecDeque<(f64, f64)>,
    living_data: &VecDeque<(f64, f64)>,
) {
    if population_data.is_empty() && living_data.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    Plot::new("population_plot")
        .height(150.0)
        .show_axes([true, true])
        .legend(egui_plot::Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nTick: {:.0}\nCount: {:.0}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            if !population_data.is_empty() {
                let points: PlotPoints = population_data.iter().map(|&(x, y)| [x, y]).collect();
                let line = Line::new(points)
                    .color(egui::Color32::from_rgb(180, 180, 180))
                    .name("Creatures");
                plot_ui.line(line);
            }

            if !living_data.is_empty() {
                let points: PlotPoints = living_data.iter().map(|&(x, y)| [x, y]).collect();
                let line = Line::new(points)
                    .color(egui::Color32::from_rgb(100, 200, 100))
                    .name("Alive");
                plot_ui.line(line);
            }
        });
}
