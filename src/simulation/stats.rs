//! Population statistics: how many living creatures carry each genome.

use std::collections::HashMap;

use super::creature::Creature;
use super::genome::{self, Fingerprint, Genome, GenomeCache, GenomeColors};
use super::params::GeneTable;

/// One row of the genome ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeStat {
    /// Number of living creatures with this genome.
    pub count: usize,
    /// Fingerprint shared by these creatures.
    pub fingerprint: Fingerprint,
    /// The genome itself.
    pub genome: Genome,
    /// Display name of the genome.
    pub name: String,
    /// Colors of a living creature with this genome.
    pub colors: GenomeColors,
}

/// Counts living creatures (eggs included) per fingerprint.
pub fn census<'a>(creatures: impl IntoIterator<Item = &'a Creature>) -> HashMap<Fingerprint, usize> {
    let mut counts = HashMap::new();
    for key in creatures.into_iter().filter_map(Creature::census_key) {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Ranks genomes by head count, most common first, and keeps the top `n`.
///
/// Ties are broken by fingerprint so the ranking is stable between frames.
pub fn top_genomes(
    census: &HashMap<Fingerprint, usize>,
    cache: &mut GenomeCache,
    table: &GeneTable,
    n: usize,
) -> Vec<GenomeStat> {
    let mut ranked: Vec<(Fingerprint, usize)> = census.iter().map(|(&k, &v)| (k, v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(n);

    ranked
        .into_iter()
        .map(|(fingerprint, count)| {
            let genome = cache.genome_of(fingerprint).clone();
            GenomeStat {
                count,
                fingerprint,
                name: genome.name(),
                colors: genome::colors(&genome, table),
                genome,
            }
        })
        .collect()
}
