use biotope::simulation::creature::Creature;
use biotope::simulation::params::Params;
use biotope::simulation::universe::Universe;
use geo::Point;
use macroquad::prelude::*;

/// Creatures drawn smaller than this are skipped.
const MIN_RADIUS: f32 = 1.0;

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

fn screen_scale(params: &Params) -> f32 {
    let scale_x = screen_width() / params.world_width;
    let scale_y = screen_height() / params.world_height;
    scale_x.min(scale_y)
}

impl ToScreen for Point<f32> {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        let scale = screen_scale(params);
        vec2(self.x() * scale, self.y() * scale)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        self * screen_scale(params)
    }
}

fn rgb(channels: [u8; 3]) -> Color {
    Color::from_rgba(channels[0], channels[1], channels[2], 255)
}

/// Outlines the world so its bounds stay visible next to the side panel.
pub fn draw_world(params: &Params) {
    let corner = Point::new(params.world_width, params.world_height).to_screen(params);
    draw_rectangle_lines(0.0, 0.0, corner.x, corner.y, 1.0, DARKGRAY);
}

pub fn draw_creatures(universe: &Universe, params: &Params) {
    universe
        .creatures
        .iter()
        .for_each(|creature| draw_creature(creature, params));
}

fn draw_creature(creature: &Creature, params: &Params) {
    let radius = creature.render_radius(params);
    if radius < MIN_RADIUS {
        return;
    }

    let screen_pos = creature.pos.to_screen(params);
    let screen_radius = radius.to_screen(params);

    draw_circle(
        screen_pos.x,
        screen_pos.y,
        screen_radius,
        rgb(creature.colors.inner),
    );
    draw_circle_lines(
        screen_pos.x,
        screen_pos.y,
        screen_radius,
        1.0,
        rgb(creature.colors.outer),
    );
}
