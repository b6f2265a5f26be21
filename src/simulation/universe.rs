//! The universe: owns every creature and drives the simulation tick by tick.
//!
//! Each tick:
//! - counts down to the next extinction, and kills half the population when
//!   it fires
//! - rebuilds the spatial index from the collidable creatures
//! - steps every creature exactly once, newborns included, in list order
//! - drops the creatures that asked to be removed

use std::collections::HashMap;
use std::path::Path;

use geo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use super::creature::{Creature, StepOutcome, Surroundings};
use super::gene::Gene;
use super::genome::{Fingerprint, Genome, GenomeCache};
use super::params::{ConfigError, Params};
use super::spatial::{Neighbors, SpatialIndex};
use super::stats::{self, GenomeStat};

/// Errors raised while saving or loading a universe snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The snapshot is not a valid universe.
    #[error("snapshot is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Creatures born this tick.
    pub births: usize,
    /// Creatures removed this tick.
    pub removed: usize,
    /// Living creatures killed by an extinction this tick.
    pub extinct: usize,
    /// Population at the end of the tick.
    pub population: usize,
}

/// The simulated world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    /// All creatures, alive or dead, in stepping order.
    pub creatures: Vec<Creature>,
    /// Ticks until the next extinction.
    pub extinction: f32,
    /// Ticks elapsed.
    pub time: u64,
    next_id: usize,
    /// Index of the creature being stepped.
    #[serde(skip)]
    current: usize,
    #[serde(skip)]
    index: SpatialIndex,
    /// Creatures removed during the current tick, compacted at its end.
    #[serde(skip)]
    tombstones: Vec<bool>,
    #[serde(skip)]
    genomes: GenomeCache,
    #[serde(skip, default = "StdRng::from_os_rng")]
    rng: StdRng,
}

impl Universe {
    /// Creates a universe seeded with autotrophs at random positions.
    pub fn new(params: &Params) -> Result<Self, ConfigError> {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Like [`Universe::new`], with a reproducible random sequence.
    pub fn with_seed(params: &Params, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: &Params, rng: StdRng) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut universe = Self {
            creatures: Vec::with_capacity(params.initial_population),
            extinction: params.first_extinction,
            time: 0,
            next_id: 0,
            current: 0,
            index: SpatialIndex::new(),
            tombstones: Vec::new(),
            genomes: GenomeCache::new(),
            rng,
        };

        let seed = Genome::single(Gene::Autotrophy);
        for _ in 0..params.initial_population {
            let pos = Point::new(
                universe.rng.random::<f32>() * params.world_width,
                universe.rng.random::<f32>() * params.world_height,
            );
            let creature = Creature::new(&seed, pos, params, &mut universe.rng);
            universe.add(creature);
        }

        info!(
            population = universe.creatures.len(),
            width = params.world_width,
            height = params.world_height,
            "universe created"
        );
        Ok(universe)
    }

    /// Appends a creature and assigns it a fresh id.
    ///
    /// # Returns
    ///
    /// The id of the added creature.
    pub fn add(&mut self, mut creature: Creature) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        creature.id = id;
        self.creatures.push(creature);
        id
    }

    /// Finds a creature by id.
    pub fn get(&self, id: usize) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    /// Mutable variant of [`Universe::get`].
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    /// The spatial index built at the start of the last tick.
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self, params: &Params) -> TickReport {
        let mut report = TickReport::default();
        self.time += 1;

        self.extinction -= 1.0;
        if self.extinction <= 0.0 {
            report.extinct = self.extinguish(params);
        }

        self.index.rebuild(&self.creatures);
        self.tombstones.clear();
        self.tombstones.resize(self.creatures.len(), false);

        let mut births = Vec::new();
        self.current = 0;

        // Newborns are appended behind the cursor's path and get stepped in
        // this same tick.
        while self.current < self.creatures.len() {
            let Some((creature, neighbors)) = Neighbors::split(&mut self.creatures, self.current)
            else {
                break;
            };
            let mut surroundings = Surroundings {
                index: &self.index,
                neighbors,
                rng: &mut self.rng,
                births: &mut births,
            };

            if let StepOutcome::Remove(reason) = creature.step(&mut surroundings, params) {
                trace!(id = creature.id, ?reason, "removed");
                self.tombstones[self.current] = true;
                report.removed += 1;
            }

            for kid in births.drain(..) {
                self.tombstones.push(false);
                self.add(kid);
                report.births += 1;
            }

            self.current += 1;
        }

        let mut tombstones = self.tombstones.iter();
        self.creatures
            .retain(|_| !tombstones.next().copied().unwrap_or(false));

        report.population = self.creatures.len();
        debug!(
            time = self.time,
            population = report.population,
            births = report.births,
            removed = report.removed,
            "tick"
        );
        report
    }

    /// Kills every creature with the extinction probability and schedules
    /// the next extinction.
    ///
    /// Returns how many living creatures died. Carrion rolls the dice too
    /// but is not counted.
    fn extinguish(&mut self, params: &Params) -> usize {
        let mut killed = 0;
        for creature in &mut self.creatures {
            if self.rng.random_bool(params.extinction_death_chance) {
                if creature.is_alive() {
                    killed += 1;
                }
                creature.die();
            }
        }

        self.extinction =
            params.extinction_interval + self.rng.random::<f32>() * params.extinction_jitter;

        info!(
            time = self.time,
            killed,
            next_in = self.extinction,
            "extinction"
        );
        killed
    }

    /// Counts living creatures per genome fingerprint.
    pub fn census(&self) -> HashMap<Fingerprint, usize> {
        stats::census(&self.creatures)
    }

    /// Most common living genomes, most common first.
    pub fn top_genomes(&mut self, params: &Params, n: usize) -> Vec<GenomeStat> {
        let census = self.census();
        stats::top_genomes(&census, &mut self.genomes, &params.genes, n)
    }

    /// Number of creatures that are not carrion.
    pub fn living(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_alive()).count()
    }

    /// Saves the universe state to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), time = self.time, "universe saved");
        Ok(())
    }

    /// Loads a universe state from a JSON file.
    ///
    /// The spatial index is rebuilt on the next tick and the random sequence
    /// starts afresh.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut universe: Self = serde_json::from_str(&json)?;
        universe.next_id = universe
            .next_id
            .max(universe.creatures.iter().map(|c| c.id + 1).max().unwrap_or(0));
        info!(path = %path.display(), time = universe.time, "universe loaded");
        Ok(universe)
    }
}
