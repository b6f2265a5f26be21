//! Geometric helpers for positions inside the bounded world.

use std::f32::consts::TAU;

use geo::{Distance, Euclidean, Point};
use rand::Rng;

use super::params::Params;

/// Euclidean distance between two points.
pub fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    Euclidean.distance(a, b)
}

/// Clamps a position so that a creature centered on it stays inside the world.
///
/// A NaN coordinate is pulled to the lower bound.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn fit(pos: &mut Point<f32>, params: &Params) {
    let r = params.radius;
    let (mut x, mut y) = pos.x_y();

    if !(x >= r) {
        x = r;
    }
    if !(y >= r) {
        y = r;
    }
    if x > params.world_width - r {
        x = params.world_width - r;
    }
    if y > params.world_height - r {
        y = params.world_height - r;
    }

    *pos = Point::new(x, y);
}

/// Moves `pos` towards `target` by `speed`.
///
/// A speed larger than the remaining distance lands exactly on the target. A
/// negative speed moves directly away from the target. The result is always
/// clamped to the world.
pub fn move_towards(pos: &mut Point<f32>, target: Point<f32>, speed: f32, params: &Params) {
    let d = distance(*pos, target);
    if d <= 0.0 {
        return;
    }

    if speed > d {
        *pos = target;
    } else {
        *pos = *pos + (target - *pos) * (speed / d);
    }

    fit(pos, params);
}

/// Returns `n` evenly spaced points on a circle of `radius` around `center`.
///
/// The whole ring is rotated by a random angle.
pub fn around(center: Point<f32>, n: usize, radius: f32, rng: &mut impl Rng) -> Vec<Point<f32>> {
    if n == 0 {
        return Vec::new();
    }

    let offset = rng.random::<f32>() * TAU;
    (0..n)
        .map(|i| {
            let angle = offset + TAU * i as f32 / n as f32;
            center + Point::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
