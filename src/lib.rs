//! # Biotope - Evolving Creatures on a Bounded Plane
//!
//! A population of simple creatures competes for energy. Each creature
//! carries a genome, a multiset of genes that decides how fast it moves, how
//! hard it bites, how far it sees and how much it costs to keep alive.
//! Creatures forage, hunt, flee, reproduce with mutation, suffocate in crowds
//! and die, and every so often an extinction wipes out half the population.
//!
//! ## Features
//!
//! - Nine genes fingerprinted by prime products for O(1) species checks
//! - Add/remove mutations on every birth
//! - Hunting, flight and crowd evasion driven by nearby creatures
//! - Eggs, starvation, suffocation and decaying carrion
//! - Periodic mass extinctions
//! - JSON configuration and save/load of the simulation state
//!
//! ## Core Modules
//!
//! - [`simulation::genome`] - Genomes, mutation and derived costs
//! - [`simulation::creature`] - Creature state and per-tick behavior
//! - [`simulation::spatial`] - X-sorted index for neighbor queries
//! - [`simulation::universe`] - Tick scheduler and extinctions
//! - [`simulation::stats`] - Genome population ranking

/// Core simulation logic and data structures.
pub mod simulation {
    /// Creature state, traits and behavior.
    pub mod creature;
    /// The closed set of genes.
    pub mod gene;
    /// Genomes, mutation and derived costs.
    pub mod genome;
    /// Geometric utility functions for positions inside the world.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// X-sorted spatial index over collidable creatures.
    pub mod spatial;
    /// Population statistics per genome.
    pub mod stats;
    /// The universe and its tick scheduler.
    pub mod universe;
}
