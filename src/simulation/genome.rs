//! Genomes: canonical gene multisets and the traits derived from them.
//!
//! A genome is always kept sorted in [`Gene`] order, so two genomes with the
//! same genes compare equal element by element. Mutation never edits a genome
//! in place; it builds a new one.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gene::{GENE_COUNT, Gene};
use super::params::{GeneTable, Params};

/// Longest genome whose fingerprint still fits in a `u128`.
///
/// 23 is the largest gene prime and 23^28 < 2^128 < 23^29.
pub const MAX_GENES: usize = 28;

/// Product of the primes of every gene in a genome.
///
/// Unique factorization makes it a collision-free identifier of the gene
/// multiset, suited for same-species checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u128);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when building a genome from a raw gene list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenomeError {
    /// The gene list is longer than [`MAX_GENES`].
    #[error("genome has {len} genes, at most {MAX_GENES} are supported")]
    TooLong {
        /// Number of genes in the rejected list.
        len: usize,
    },
}

/// Computes the fingerprint of a gene list, or `None` if it overflows.
pub fn fingerprint_of(genes: &[Gene]) -> Option<Fingerprint> {
    genes
        .iter()
        .try_fold(1u128, |acc, gene| acc.checked_mul(gene.prime()))
        .map(Fingerprint)
}

/// A canonical gene multiset together with its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Gene>", into = "Vec<Gene>")]
pub struct Genome {
    genes: Vec<Gene>,
    fingerprint: Fingerprint,
}

impl Genome {
    /// Builds a genome from genes in any order.
    pub fn new(mut genes: Vec<Gene>) -> Result<Self, GenomeError> {
        let len = genes.len();
        let fingerprint = fingerprint_of(&genes)
            .filter(|_| len <= MAX_GENES)
            .ok_or(GenomeError::TooLong { len })?;
        genes.sort_unstable();
        Ok(Self { genes, fingerprint })
    }

    /// The genome without any gene. Creatures carrying it are stillborn.
    pub fn empty() -> Self {
        Self {
            genes: Vec::new(),
            fingerprint: Fingerprint(1),
        }
    }

    /// A genome made of one gene.
    pub fn single(gene: Gene) -> Self {
        Self {
            genes: vec![gene],
            fingerprint: Fingerprint(gene.prime()),
        }
    }

    /// Genes in canonical order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of genes, counting repeats.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no genes at all.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// How many times a gene appears in the genome.
    pub fn count(&self, gene: Gene) -> usize {
        self.genes.iter().filter(|&&g| g == gene).count()
    }

    /// The cached fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Display name such as `"Offense, Defense × 2"`.
    pub fn name(&self) -> String {
        let mut counts = [0usize; GENE_COUNT];
        for gene in &self.genes {
            counts[gene.index()] += 1;
        }
        Gene::ALL
            .iter()
            .zip(counts)
            .filter(|&(_, count)| count > 0)
            .map(|(gene, count)| {
                if count == 1 {
                    gene.name().to_string()
                } else {
                    format!("{} × {}", gene.name(), count)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<Vec<Gene>> for Genome {
    type Error = GenomeError;

    fn try_from(genes: Vec<Gene>) -> Result<Self, Self::Error> {
        Self::new(genes)
    }
}

impl From<Genome> for Vec<Gene> {
    fn from(genome: Genome) -> Self {
        genome.genes
    }
}

/// Returns a mutated copy of `genome`.
///
/// With probability `p_remove` a random gene is dropped, then with
/// probability `p_add` a random gene is appended. Both may happen in the same
/// call. The result is canonical again.
pub fn mutate(genome: &Genome, params: &Params, rng: &mut impl Rng) -> Genome {
    let mut genes = genome.genes.clone();

    if !genes.is_empty() && rng.random_bool(params.p_remove) {
        let n = rng.random_range(0..genes.len());
        genes.remove(n);
    }

    if rng.random_bool(params.p_add) && genes.len() < MAX_GENES {
        genes.push(Gene::ALL[rng.random_range(0..GENE_COUNT)]);
    }

    Genome::new(genes).unwrap_or_else(|_| genome.clone())
}

/// Energy needed to build a creature with this genome.
pub fn creation_cost(genome: &Genome, params: &Params) -> f32 {
    let cost: f32 = genome
        .genes
        .iter()
        .map(|&gene| params.genes.get(gene).creation_cost)
        .sum();
    cost.max(params.base_creation_cost)
}

/// Energy consumed every tick by a creature with this genome.
///
/// Grows quadratically with genome length on top of the per-gene deltas.
pub fn upkeep_cost(genome: &Genome, params: &Params) -> f32 {
    let len = genome.len() as f32;
    let upkeep: f32 = genome
        .genes
        .iter()
        .map(|&gene| params.genes.get(gene).upkeep)
        .sum();
    upkeep + len * len * params.quadratic_upkeep_scale
}

/// Stored energy a parent needs before it gives birth.
pub fn reproduction_threshold(genome: &Genome, params: &Params) -> f32 {
    creation_cost(genome, params) * params.birth_multiplier
}

/// Disc and outline colors of a creature, as RGB bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeColors {
    /// Fill color.
    pub inner: [u8; 3],
    /// Outline color.
    pub outer: [u8; 3],
}

impl GenomeColors {
    /// Colors of carrion.
    pub const DEAD: Self = Self {
        inner: [204, 204, 204],
        outer: [238, 238, 238],
    };
}

/// Averages the colors contributed by the genes of a genome.
///
/// Every average includes half a unit of black, so that genomes with many
/// colored genes come out brighter than genomes with a single one.
pub fn colors(genome: &Genome, table: &GeneTable) -> GenomeColors {
    fn average<'a>(contributions: impl Iterator<Item = &'a [f32; 3]>) -> [u8; 3] {
        let mut sum = [0.0f32; 3];
        let mut weight = 0.5f32;
        for rgb in contributions {
            weight += 1.0;
            for (channel, value) in sum.iter_mut().zip(rgb) {
                *channel += value;
            }
        }
        let scale = (255.0 / weight.max(1.0)).floor();
        sum.map(|channel| (channel * scale).clamp(0.0, 255.0) as u8)
    }

    let specs = || genome.genes.iter().map(|&gene| table.get(gene));
    GenomeColors {
        inner: average(specs().filter_map(|spec| spec.inner_color.as_ref())),
        outer: average(specs().filter_map(|spec| spec.outer_color.as_ref())),
    }
}

/// Memoized reverse lookup from fingerprint to genome.
///
/// Only population statistics need it. The set of fingerprints alive at any
/// time is small and repeats from tick to tick, so entries are never evicted
/// and the cache grows with the number of distinct genomes ever looked up.
#[derive(Debug, Clone, Default)]
pub struct GenomeCache {
    genomes: HashMap<Fingerprint, Genome>,
}

impl GenomeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a fingerprint back into its genome.
    ///
    /// Divides out the largest gene prime first until nothing divides any
    /// more. Factors that belong to no gene are ignored.
    pub fn genome_of(&mut self, fingerprint: Fingerprint) -> &Genome {
        self.genomes
            .entry(fingerprint)
            .or_insert_with(|| decode(fingerprint))
    }

    /// Number of cached genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Whether nothing has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

fn decode(fingerprint: Fingerprint) -> Genome {
    let mut rest = fingerprint.0;
    let mut product = 1u128;
    let mut genes = Vec::new();

    for gene in Gene::ALL.iter().rev() {
        let prime = gene.prime();
        while rest > 1 && rest % prime == 0 {
            rest /= prime;
            product *= prime;
            genes.push(*gene);
        }
    }

    // Pushed from the largest gene down.
    genes.reverse();
    Genome {
        genes,
        fingerprint: Fingerprint(product),
    }
}
