//! Spatial indexing for efficient neighbor queries.
//!
//! The index is rebuilt every tick from the creatures flagged collidable and
//! keeps their indices sorted by x. A query binary searches the left edge of
//! the search box and scans right until the box is left behind.

use std::cmp::Ordering;

use geo::Point;

use super::creature::Creature;
use super::geometric_utils::distance;

/// Read access to positions and collidability, by creature index.
pub trait Population {
    /// Current position of the creature at `idx`.
    fn position(&self, idx: usize) -> Point<f32>;

    /// Whether the creature at `idx` may be returned by a query.
    fn is_collidable(&self, idx: usize) -> bool;
}

impl Population for [Creature] {
    fn position(&self, idx: usize) -> Point<f32> {
        self[idx].pos
    }

    fn is_collidable(&self, idx: usize) -> bool {
        self[idx].collidable
    }
}

/// Mutable view of every creature except the one currently being stepped.
///
/// The stepped creature is handed out separately, so it can never show up
/// in its own neighbor queries.
pub struct Neighbors<'a> {
    before: &'a mut [Creature],
    after: &'a mut [Creature],
    current: usize,
    current_pos: Point<f32>,
}

impl<'a> Neighbors<'a> {
    /// Splits `creatures` into the creature at `current` and everyone else.
    ///
    /// Returns `None` if `current` is out of bounds.
    pub fn split(
        creatures: &'a mut [Creature],
        current: usize,
    ) -> Option<(&'a mut Creature, Neighbors<'a>)> {
        if current >= creatures.len() {
            return None;
        }
        let (before, rest) = creatures.split_at_mut(current);
        let (me, after) = rest.split_first_mut()?;
        let current_pos = me.pos;
        Some((
            me,
            Neighbors {
                before,
                after,
                current,
                current_pos,
            },
        ))
    }

    /// Returns the creature at `idx`, or `None` for the stepped creature.
    pub fn get(&self, idx: usize) -> Option<&Creature> {
        match idx.cmp(&self.current) {
            Ordering::Less => self.before.get(idx),
            Ordering::Equal => None,
            Ordering::Greater => self.after.get(idx - self.current - 1),
        }
    }

    /// Mutable variant of [`Neighbors::get`].
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Creature> {
        match idx.cmp(&self.current) {
            Ordering::Less => self.before.get_mut(idx),
            Ordering::Equal => None,
            Ordering::Greater => self.after.get_mut(idx - self.current - 1),
        }
    }
}

impl Population for Neighbors<'_> {
    fn position(&self, idx: usize) -> Point<f32> {
        self.get(idx).map_or(self.current_pos, |c| c.pos)
    }

    fn is_collidable(&self, idx: usize) -> bool {
        self.get(idx).is_some_and(|c| c.collidable)
    }
}

/// Collidable creature indices, sorted by x at rebuild time.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    order: Vec<usize>,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index over `creatures`.
    pub fn build(creatures: &[Creature]) -> Self {
        let mut index = Self::new();
        index.rebuild(creatures);
        index
    }

    /// Replaces the content of the index with the currently collidable creatures.
    pub fn rebuild(&mut self, creatures: &[Creature]) {
        self.order.clear();
        self.order.extend(
            creatures
                .iter()
                .enumerate()
                .filter(|(_, c)| c.collidable)
                .map(|(i, _)| i),
        );
        self.order
            .sort_by(|&a, &b| creatures[a].pos.x().total_cmp(&creatures[b].pos.x()));
    }

    /// Number of indexed creatures.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no creature is indexed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Finds every collidable creature within `radius` of `center`.
    ///
    /// Positions are read from `population` at query time, so creatures that
    /// moved since the last rebuild are reported where they are now.
    ///
    /// # Returns
    ///
    /// `(index, distance)` pairs, in scan order.
    pub fn neighbors<P: Population + ?Sized>(
        &self,
        population: &P,
        center: Point<f32>,
        radius: f32,
    ) -> Vec<(usize, f32)> {
        let mut found = Vec::new();
        if self.order.is_empty() {
            return found;
        }

        let (cx, cy) = center.x_y();
        let (min_x, max_x) = (cx - radius, cx + radius);
        let (min_y, max_y) = (cy - radius, cy + radius);
        let radius_sq = radius * radius;

        for &idx in &self.order[self.lower_bound(population, min_x)..] {
            let pos = population.position(idx);
            let (x, y) = pos.x_y();

            if !population.is_collidable(idx) || x < min_x || y < min_y || y > max_y {
                continue;
            }

            // Sorted by x: nothing further right can be in range.
            if x > max_x {
                break;
            }

            let (dx, dy) = (cx - x, cy - y);
            if dx * dx + dy * dy <= radius_sq {
                found.push((idx, distance(center, pos)));
            }
        }

        found
    }

    /// Narrows down the first entry whose x may reach `min_x`.
    ///
    /// Stops once two or fewer entries remain in the bracket; the scan skips
    /// the few entries left of `min_x`.
    fn lower_bound<P: Population + ?Sized>(&self, population: &P, min_x: f32) -> usize {
        let (mut lo, mut hi) = (0, self.order.len() - 1);
        while hi - lo > 2 {
            let mid = (lo + hi) / 2;
            if population.position(self.order[mid]).x() < min_x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}
