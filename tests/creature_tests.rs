#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use biotope::simulation::creature::{Creature, Removal, Stage, StepOutcome, Surroundings};
use biotope::simulation::gene::Gene;
use biotope::simulation::genome::{self, Genome, GenomeColors};
use biotope::simulation::geometric_utils::distance;
use biotope::simulation::params::Params;
use biotope::simulation::spatial::{Neighbors, SpatialIndex};
use geo::Point;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn test_params() -> Params {
    Params {
        p_add: 0.0,
        p_remove: 0.0,
        ..Params::default()
    }
}

/// An adult creature, ready to act, with exactly `energy` stored.
fn adult(genes: Vec<Gene>, x: f32, y: f32, energy: f32, params: &Params) -> Creature {
    let genome = Genome::new(genes).unwrap();
    let cost = genome::creation_cost(&genome, params);
    let mut creature = Creature::from_genome(genome, Point::new(x, y), energy + cost, params);
    creature.stage = Stage::Alive;
    creature.collidable = true;
    creature
}

/// Steps the creature at `idx` against the rest of `creatures`.
fn step_at(
    creatures: &mut [Creature],
    idx: usize,
    params: &Params,
    rng: &mut StdRng,
) -> (StepOutcome, Vec<Creature>) {
    let index = SpatialIndex::build(creatures);
    let (creature, neighbors) = Neighbors::split(creatures, idx).unwrap();
    let mut births = Vec::new();
    let mut env = Surroundings {
        index: &index,
        neighbors,
        rng,
        births: &mut births,
    };
    let outcome = creature.step(&mut env, params);
    (outcome, births)
}

#[test]
fn test_empty_genome_is_stillborn() {
    let params = test_params();
    let creature =
        Creature::from_genome(Genome::empty(), Point::new(100.0, 100.0), 10.0, &params);

    assert_eq!(creature.stage, Stage::Dead);
    assert_eq!(creature.offense, 0.0);
    assert_eq!(creature.defense, 0.0);
    assert_eq!(creature.colors, GenomeColors::DEAD);
    assert!(creature.census_key().is_none());
}

#[test]
fn test_mutation_to_empty_genome_is_stillborn() {
    let params = Params {
        p_remove: 1.0,
        p_add: 0.0,
        ..Params::default()
    };
    let mut rng = StdRng::seed_from_u64(10);
    let parent = Genome::single(Gene::Offense);

    let creature = Creature::new(&parent, Point::new(100.0, 100.0), &params, &mut rng);
    assert!(creature.genome().is_empty());
    assert_eq!(creature.stage, Stage::Dead);
    // Endowed for the parent genome, charged for the empty one.
    let expected = genome::reproduction_threshold(&parent, &params) - params.base_creation_cost;
    assert!((creature.energy - expected).abs() < 1e-5);
}

#[test]
fn test_derived_traits() {
    let params = test_params();
    let genes = vec![
        Gene::Offense,
        Gene::Strength,
        Gene::Hunting,
        Gene::Fertility,
        Gene::Fertility,
    ];
    let creature = adult(genes, 400.0, 300.0, 1.0, &params);
    let r = params.radius;

    assert_eq!(creature.offense, 2.0);
    assert_eq!(creature.defense, 0.0);
    assert!((creature.speed - (1.0 + 0.75 + 0.5 + 0.25) * r / 8.0).abs() < 1e-6);
    assert_eq!(creature.hunt_radius, 20.0 + r + 50.0);
    assert_eq!(creature.flee_radius, 3.0 * r);
    assert_eq!(creature.sight, creature.hunt_radius);
    assert_eq!(creature.kids, 3);
    assert!((creature.digestion - 0.4).abs() < 1e-6);
}

#[test]
fn test_egg_hatches_after_maturity() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(11);
    let egg = Creature::from_genome(
        Genome::single(Gene::Autotrophy),
        Point::new(400.0, 300.0),
        5.0,
        &params,
    );
    assert!(egg.is_egg());
    assert_eq!(egg.render_radius(&params), 0.0);
    let energy = egg.energy;

    let mut creatures = vec![egg];
    let ticks = params.maturity as usize;
    for _ in 1..ticks {
        let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
        assert_eq!(outcome, StepOutcome::Keep);
        assert!(creatures[0].is_egg());
    }

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(creatures[0].stage, Stage::Alive);
    assert_eq!(creatures[0].energy, energy);
}

#[test]
fn test_starvation_is_permanent() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(12);
    let mut creatures = vec![adult(vec![Gene::Offense], 400.0, 300.0, 0.001, &params)];

    let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Keep);
    assert_eq!(creatures[0].stage, Stage::Dead);
    assert_eq!(creatures[0].offense, 0.0);

    for _ in 0..10 {
        let _ = step_at(&mut creatures, 0, &params, &mut rng);
        assert_eq!(creatures[0].stage, Stage::Dead);
    }
}

#[test]
fn test_carrion_decomposes() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(13);
    let mut corpse = adult(vec![Gene::Autotrophy], 400.0, 300.0, 0.0, &params);
    corpse.die();
    let mut creatures = vec![corpse];

    // Cost 1 at 0.05 per tick: gone after about 20 ticks.
    for _ in 0..19 {
        let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
        assert_eq!(outcome, StepOutcome::Keep);
        assert!(creatures[0].collidable);
    }

    let mut removed = false;
    for _ in 0..2 {
        if step_at(&mut creatures, 0, &params, &mut rng).0
            == StepOutcome::Remove(Removal::Decomposed)
        {
            removed = true;
            break;
        }
    }
    assert!(removed);
}

#[test]
fn test_suffocation_over_limit_removes() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(14);
    let mut creature = adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params);
    creature.suffocation = params.suffocation_limit;
    let mut creatures = vec![creature];

    let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Remove(Removal::Asphyxiated));
}

#[test]
fn test_suffocation_recovers_below_limit() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(15);
    let mut creature = adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params);
    creature.suffocation = params.suffocation_limit - 1;
    let mut creatures = vec![creature];

    let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Keep);
    assert_eq!(creatures[0].suffocation, params.suffocation_limit - 2);
}

#[test]
fn test_crowd_suffocates() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(16);
    let mut creatures = vec![
        adult(vec![Gene::Autotrophy], 397.0, 300.0, 1.0, &params),
        adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params),
        adult(vec![Gene::Autotrophy], 403.0, 300.0, 1.0, &params),
    ];

    let _ = step_at(&mut creatures, 1, &params, &mut rng);
    assert_eq!(creatures[1].suffocation, params.suffocation_increment);
}

#[test]
fn test_reproduction_with_one_kid() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(17);
    let mut creatures = vec![adult(vec![Gene::Autotrophy], 400.0, 300.0, 10.0, &params)];
    let parent = creatures[0].clone();

    let (outcome, births) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Keep);
    assert_eq!(births.len(), 1);

    let expected = 10.0 - parent.upkeep - parent.reproduction_threshold;
    assert!((creatures[0].energy - expected).abs() < 1e-4);

    let kid = &births[0];
    assert!((distance(kid.pos, creatures[0].pos) - params.radius).abs() < 1e-3);
    assert_eq!(kid.genome(), parent.genome());
    assert!(kid.is_egg());
    assert!((kid.energy - (parent.reproduction_threshold - parent.cost)).abs() < 1e-5);
}

#[test]
fn test_fertile_creature_lays_several_kids() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(18);
    let genes = vec![Gene::Autotrophy, Gene::Fertility, Gene::Fertility];
    let mut creatures = vec![adult(genes, 400.0, 300.0, 100.0, &params)];

    let (_, births) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(births.len(), 3);
}

#[test]
fn test_no_birth_below_threshold() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(19);
    let mut creatures = vec![adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params)];

    let (_, births) = step_at(&mut creatures, 0, &params, &mut rng);
    assert!(births.is_empty());
}

#[test]
fn test_bite_transfers_energy() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(20);
    let mut creatures = vec![
        adult(vec![Gene::Offense], 400.0, 300.0, 3.0, &params),
        adult(vec![Gene::Autotrophy], 400.0 + params.radius, 300.0, 4.0, &params),
    ];
    let hunter = creatures[0].clone();
    let prey = creatures[1].clone();
    let bite = params.bitesize * (hunter.offense - prey.defense);

    let (outcome, births) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Keep);
    assert!(births.is_empty());

    assert!((creatures[1].energy - (4.0 - bite)).abs() < 1e-5);
    let expected = 3.0 - hunter.upkeep + hunter.digestion * bite;
    assert!((creatures[0].energy - expected).abs() < 1e-5);
    // Eating keeps the hunter in place.
    assert_eq!(creatures[0].pos, hunter.pos);
}

#[test]
fn test_same_species_does_not_bite() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(21);
    let mut creatures = vec![
        adult(vec![Gene::Offense], 400.0, 300.0, 3.0, &params),
        adult(vec![Gene::Offense], 404.0, 300.0, 3.0, &params),
    ];

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(creatures[1].energy, 3.0);
}

#[test]
fn test_carrion_is_eaten() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(22);
    let mut corpse = adult(vec![Gene::Offense], 404.0, 300.0, 3.0, &params);
    corpse.die();
    let mut creatures = vec![adult(vec![Gene::Offense], 400.0, 300.0, 3.0, &params), corpse];

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    assert!(creatures[1].energy < 3.0);
}

#[test]
fn test_prey_flees() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(23);
    let mut creatures = vec![
        adult(vec![Gene::Autotrophy], 400.0, 300.0, 3.0, &params),
        adult(vec![Gene::Offense], 412.0, 300.0, 3.0, &params),
    ];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    let d = distance(creatures[0].pos, creatures[1].pos);
    assert!((d - (12.0 + speed)).abs() < 1e-4);
}

#[test]
fn test_hunter_chases() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(24);
    let mut creatures = vec![
        adult(vec![Gene::Offense], 400.0, 300.0, 3.0, &params),
        adult(vec![Gene::Autotrophy], 420.0, 300.0, 3.0, &params),
    ];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    let d = distance(creatures[0].pos, creatures[1].pos);
    assert!((d - (20.0 - speed)).abs() < 1e-4);
}

#[test]
fn test_camouflage_hides_prey() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(25);
    let mut creatures = vec![
        adult(vec![Gene::Offense], 400.0, 300.0, 3.0, &params),
        adult(vec![Gene::Autotrophy, Gene::Camouflage], 420.0, 300.0, 3.0, &params),
    ];
    let start = creatures[0].pos;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    // Out of sight, nothing to chase or evade: the hunter stays put.
    assert_eq!(creatures[0].pos, start);
}

#[test]
fn test_render_radius_of_adult() {
    let params = test_params();
    let creature = adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params);
    assert_eq!(creature.render_radius(&params), params.radius);
}

#[test]
fn test_closer_threat_beats_farther_prey() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(26);
    let threat = vec![Gene::Offense, Gene::Offense, Gene::Defense];
    let mut creatures = vec![
        adult(vec![Gene::Offense, Gene::Flight], 400.0, 300.0, 3.0, &params),
        adult(threat, 412.0, 300.0, 3.0, &params),
        adult(vec![Gene::Autotrophy], 380.0, 300.0, 3.0, &params),
    ];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    let from_threat = distance(creatures[0].pos, creatures[1].pos);
    assert!((from_threat - (12.0 + speed)).abs() < 1e-4);
}

#[test]
fn test_closer_prey_beats_farther_threat() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(27);
    let threat = vec![Gene::Offense, Gene::Offense, Gene::Defense];
    let mut creatures = vec![
        adult(vec![Gene::Offense, Gene::Flight], 400.0, 300.0, 3.0, &params),
        adult(threat, 370.0, 300.0, 3.0, &params),
        adult(vec![Gene::Autotrophy], 412.0, 300.0, 3.0, &params),
    ];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    let from_prey = distance(creatures[0].pos, creatures[2].pos);
    assert!((from_prey - (12.0 - speed)).abs() < 1e-4);
}

#[test]
fn test_edge_pushes_inwards() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(28);
    let mut creatures = vec![adult(vec![Gene::Autotrophy], 20.0, 300.0, 1.0, &params)];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    assert!((creatures[0].pos.x() - (20.0 + speed)).abs() < 1e-4);
    assert_eq!(creatures[0].pos.y(), 300.0);
}

#[test]
fn test_same_species_keep_apart() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(29);
    let mut creatures = vec![
        adult(vec![Gene::Autotrophy], 400.0, 300.0, 1.0, &params),
        adult(vec![Gene::Autotrophy], 412.0, 300.0, 1.0, &params),
    ];
    let speed = creatures[0].speed;

    let _ = step_at(&mut creatures, 0, &params, &mut rng);
    assert!(creatures[0].pos.x() < 400.0);
    let apart = distance(creatures[0].pos, creatures[1].pos);
    assert!((apart - (12.0 + speed)).abs() < 1e-4);
}

#[test]
fn test_stillborn_becomes_collidable_carrion() {
    let params = test_params();
    let mut rng = StdRng::seed_from_u64(30);
    let stillborn =
        Creature::from_genome(Genome::empty(), Point::new(400.0, 300.0), 1.0, &params);
    assert!(!stillborn.collidable);
    let energy = stillborn.energy;
    let mut creatures = vec![stillborn];

    let (outcome, _) = step_at(&mut creatures, 0, &params, &mut rng);
    assert_eq!(outcome, StepOutcome::Keep);
    assert_eq!(creatures[0].stage, Stage::Dead);
    assert!(creatures[0].collidable);
    assert!((creatures[0].energy - (energy - params.carrion_decay)).abs() < 1e-6);
}
