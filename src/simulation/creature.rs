//! Creatures: genome-derived traits, life cycle and per-tick behavior.
//!
//! A creature hatches from an egg, forages, hunts or flees depending on the
//! creatures around it, reproduces once it has stored enough energy, and
//! eventually dies and decays as carrion.

use geo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::gene::Gene;
use super::genome::{self, Fingerprint, Genome, GenomeColors};
use super::geometric_utils::{around, fit, move_towards};
use super::params::Params;
use super::spatial::{Neighbors, SpatialIndex};

/// Life-cycle stage of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    /// Not hatched yet. `remaining` counts down to zero.
    Egg {
        /// Ticks left, for a creature of creation cost 1.
        remaining: f32,
    },
    /// Active.
    Alive,
    /// Carrion. The creature's energy is what is left to decay.
    Dead,
}

/// Why a creature asks to be removed from the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Suffocation went over the limit.
    Asphyxiated,
    /// Carrion fully decayed.
    Decomposed,
}

/// Result of stepping a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StepOutcome {
    /// The creature stays in the universe.
    Keep,
    /// The creature must be removed.
    Remove(Removal),
}

/// What a creature can reach while it is being stepped.
pub struct Surroundings<'a, R: Rng> {
    /// Collidable creatures, sorted for range queries.
    pub index: &'a SpatialIndex,
    /// Every other creature of the universe.
    pub neighbors: Neighbors<'a>,
    /// Source of randomness for mutations and birth placement.
    pub rng: &'a mut R,
    /// Newborns, to be added to the universe after the step.
    pub births: &'a mut Vec<Creature>,
}

/// A simulated creature.
///
/// Everything below `genome` is derived from it at construction, except
/// offense and defense which drop to zero on death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Identifier assigned by the universe.
    pub id: usize,
    /// Position, always inside the world.
    pub pos: Point<f32>,
    /// Stored energy. The creature starves once it goes negative.
    pub energy: f32,
    /// Life-cycle stage.
    pub stage: Stage,
    /// Current suffocation level.
    pub suffocation: u32,
    /// Whether the creature shows up in next tick's spatial index.
    pub collidable: bool,
    genome: Genome,
    /// Creation cost of the genome.
    pub cost: f32,
    /// Energy consumed every tick.
    pub upkeep: f32,
    /// Attack strength.
    pub offense: f32,
    /// Resistance to attacks.
    pub defense: f32,
    /// Distance covered per tick.
    pub speed: f32,
    /// Range at which prey is noticed.
    pub hunt_radius: f32,
    /// Range at which threats are noticed.
    pub flee_radius: f32,
    /// Subtracted from the range at which others notice this creature.
    pub camouflage: f32,
    /// Fraction of bitten energy that is actually gained.
    pub digestion: f32,
    /// Largest of the hunt and flee ranges.
    pub sight: f32,
    /// Kids per birth.
    pub kids: usize,
    /// Stored energy needed to give birth.
    pub reproduction_threshold: f32,
    /// Display colors.
    pub colors: GenomeColors,
}

impl Creature {
    /// Conceives a creature from a parent genome.
    ///
    /// The newborn is endowed with the energy the parent genome calls for,
    /// then the genome mutates and the newborn pays for whatever genome it
    /// ended up with.
    pub fn new(parent: &Genome, pos: Point<f32>, params: &Params, rng: &mut impl Rng) -> Self {
        let endowment = genome::reproduction_threshold(parent, params);
        let genome = genome::mutate(parent, params, rng);
        Self::from_genome(genome, pos, endowment, params)
    }

    /// Builds a creature from an exact genome, without mutation.
    ///
    /// # Arguments
    ///
    /// * `genome` - The genome of the newborn
    /// * `pos` - Birth position, clamped to the world
    /// * `endowment` - Energy received at birth, before paying for the genome
    /// * `params` - Simulation parameters
    pub fn from_genome(genome: Genome, mut pos: Point<f32>, endowment: f32, params: &Params) -> Self {
        fit(&mut pos, params);

        let n = |gene| genome.count(gene) as f32;
        let r = params.radius;

        let cost = genome::creation_cost(&genome, params);
        let hunt_radius = 20.0 + r + 50.0 * n(Gene::Hunting);
        let flee_radius = 3.0 * r + 50.0 * n(Gene::Flight);

        let mut creature = Self {
            id: 0,
            pos,
            energy: endowment - cost,
            stage: Stage::Egg {
                remaining: params.maturity,
            },
            suffocation: 0,
            collidable: false,
            cost,
            upkeep: genome::upkeep_cost(&genome, params),
            offense: n(Gene::Offense) * (1.0 + n(Gene::Strength)),
            defense: n(Gene::Defense) * (1.0 + n(Gene::Strength)),
            // Everyone crawls. Strength helps most, then hunting and flight,
            // then offense.
            speed: (n(Gene::Strength)
                + 0.75 * n(Gene::Hunting)
                + 0.75 * n(Gene::Flight)
                + 0.5 * n(Gene::Offense)
                + 0.25)
                * (r / 8.0),
            hunt_radius,
            flee_radius,
            camouflage: 40.0 * n(Gene::Camouflage),
            // Autotrophy harms digestion.
            digestion: 1.0 - 0.6f32.powf(1.0 + n(Gene::Digestion) - 0.5 * n(Gene::Autotrophy)),
            sight: hunt_radius.max(flee_radius),
            kids: 1 + genome.count(Gene::Fertility),
            reproduction_threshold: genome::reproduction_threshold(&genome, params),
            colors: genome::colors(&genome, &params.genes),
            genome,
        };

        if creature.genome.is_empty() {
            creature.die();
        }

        creature
    }

    /// The genome, fixed for life.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Shortcut for the genome fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.genome.fingerprint()
    }

    /// Whether the creature is not carrion. Eggs count as alive.
    pub fn is_alive(&self) -> bool {
        self.stage != Stage::Dead
    }

    /// Whether the creature has not hatched yet.
    pub fn is_egg(&self) -> bool {
        matches!(self.stage, Stage::Egg { .. })
    }

    /// Key used when counting genomes: the fingerprint of living creatures.
    pub fn census_key(&self) -> Option<Fingerprint> {
        self.is_alive().then(|| self.fingerprint())
    }

    /// Turns the creature into grey, defenseless carrion.
    pub fn die(&mut self) {
        self.stage = Stage::Dead;
        self.offense = 0.0;
        self.defense = 0.0;
        self.colors = GenomeColors::DEAD;
    }

    /// Radius to draw the creature with.
    ///
    /// Eggs grow as they mature, suffocating creatures shrink, carrion
    /// shrinks as it decays. Anything below 1 is not worth drawing.
    pub fn render_radius(&self, params: &Params) -> f32 {
        let r = params.radius;
        let mut radius = r;

        if let Stage::Egg { remaining } = self.stage {
            radius = r * (params.maturity - remaining) / params.maturity;
        }

        if self.suffocation > 0 {
            let limit = params.suffocation_limit as f32;
            radius = 1.0 + (r - 1.0) * (limit - self.suffocation as f32) / limit;
        }

        if self.stage == Stage::Dead {
            radius = r.min(r * (self.cost + self.energy) / self.cost);
        }

        radius
    }

    /// Runs one tick of the creature's behavior.
    ///
    /// In order: recover from suffocation, mature, decay, starve, then deal
    /// with the neighbors (hunt, flee or evade, bite whatever is in reach),
    /// move, suffocate in crowds and give birth.
    pub fn step<R: Rng>(&mut self, env: &mut Surroundings<'_, R>, params: &Params) -> StepOutcome {
        self.collidable = false;

        if self.suffocation > 0 {
            let level = self.suffocation;
            self.suffocation -= 1;
            if level >= params.suffocation_limit {
                trace!(id = self.id, "asphyxiated");
                return StepOutcome::Remove(Removal::Asphyxiated);
            }
        }

        if let Stage::Egg { remaining } = self.stage {
            // Cheap genomes hatch faster.
            let remaining = (remaining - 1.0 / self.cost).max(0.0);
            self.stage = if remaining > 0.0 {
                Stage::Egg { remaining }
            } else {
                Stage::Alive
            };
            return StepOutcome::Keep;
        }

        if self.stage == Stage::Dead {
            self.energy -= params.carrion_decay;
            if self.energy + self.cost < 0.0 {
                trace!(id = self.id, "decomposed");
                return StepOutcome::Remove(Removal::Decomposed);
            }
            self.collidable = true;
            return StepOutcome::Keep;
        }

        self.energy -= self.upkeep;
        if self.energy < 0.0 {
            trace!(id = self.id, "starved");
            self.die();
            return StepOutcome::Keep;
        }

        let fingerprint = self.fingerprint();
        let mut flee = true;
        let mut best_distance = f32::INFINITY;
        let mut target: Option<Point<f32>> = None;
        let mut eating = false;
        let mut evade = Point::new(0.0f32, 0.0);
        let mut crowd = 0usize;

        for (idx, distance) in env.index.neighbors(&env.neighbors, self.pos, self.sight) {
            let Some(other) = env.neighbors.get_mut(idx) else {
                continue;
            };
            if other.is_egg() {
                continue;
            }

            let same_species = fingerprint == other.fingerprint() && other.is_alive();

            // Ticks needed to kill them, or to be killed by them, ignoring
            // whatever either side gains from eating.
            let kill_in = if self.offense > other.defense {
                other.energy / (self.offense - other.defense)
            } else {
                f32::INFINITY
            };
            let killed_in = if other.offense > self.defense {
                self.energy / (other.offense - self.defense)
            } else {
                f32::INFINITY
            };

            let can_hunt =
                kill_in < killed_in && !same_species && distance < self.hunt_radius - other.camouflage;
            let can_flee =
                kill_in > killed_in && !same_species && distance < self.flee_radius - other.camouflage;

            if (can_hunt || can_flee) && best_distance > distance {
                flee = can_flee;
                best_distance = distance;
                target = Some(other.pos);
            }

            // Without a target, keep away from anyone visible, own species
            // included: crowds suffocate.
            let should_evade = target.is_none()
                && distance < self.flee_radius - other.camouflage
                && distance > 0.0
                && other.is_alive();
            if should_evade {
                evade = evade + (self.pos - other.pos) / (distance * distance);
            }

            if distance <= params.radius * 2.0 {
                if self.offense > other.defense && !same_species {
                    let bite = params.bitesize * (self.offense - other.defense);
                    self.energy += self.digestion * bite;
                    other.energy -= bite;
                    eating = true;
                }

                if other.is_alive() {
                    crowd += 1;
                }
            }
        }

        let (target, speed) = match target {
            Some(target) if flee => (target, -self.speed),
            Some(target) => (target, self.speed),
            None => {
                evade = evade + self.edge_push(params);
                let mut d = evade.x().hypot(evade.y());
                if d < 0.01 {
                    d = 1.0;
                }
                (self.pos + evade * (self.speed / d), self.speed)
            }
        };

        if !eating {
            move_towards(&mut self.pos, target, speed, params);

            if crowd > 1 {
                self.suffocation += params.suffocation_increment;
            }
        }

        if self.energy > self.reproduction_threshold {
            self.energy -= self.reproduction_threshold;
            for pos in around(self.pos, self.kids, params.radius, &mut *env.rng) {
                let kid = Creature::new(&self.genome, pos, params, &mut *env.rng);
                trace!(parent = self.id, fingerprint = %kid.fingerprint(), "birth");
                env.births.push(kid);
            }
        }

        self.collidable = true;
        StepOutcome::Keep
    }

    /// Push away from the world edges, growing with the square of the
    /// distance travelled into the edge margin.
    fn edge_push(&self, params: &Params) -> Point<f32> {
        let (x, y) = self.pos.x_y();
        let (w, h) = (params.world_width, params.world_height);
        let margin = params.edge_margin;

        let too_left = w * margin - x;
        let too_right = x - w * (1.0 - margin);
        let too_up = h * margin - y;
        let too_down = y - h * (1.0 - margin);

        let push = |depth: f32| {
            if depth > 0.0 {
                params.edge_push * depth * depth
            } else {
                0.0
            }
        };

        Point::new(push(too_left) - push(too_right), push(too_up) - push(too_down))
    }
}
