//! The closed set of genes a genome is built from.
//!
//! Every gene owns a distinct prime. A genome's fingerprint is the product of
//! the primes of its genes, so two gene multisets share a fingerprint only if
//! they are equal.

use serde::{Deserialize, Serialize};

/// Number of distinct genes.
pub const GENE_COUNT: usize = 9;

/// A single gene tag.
///
/// The declaration order is the canonical order genomes are sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    /// How strongly the creature attacks.
    Offense,
    /// How well the creature withstands attacks.
    Defense,
    /// Boosts speed, offense and defense.
    Strength,
    /// Feeds the creature just for staying around.
    Autotrophy,
    /// Radius of detection of potential prey.
    Hunting,
    /// Radius of detection of potential threats.
    Flight,
    /// More kids per birth.
    Fertility,
    /// Foils detection by hunters and fleers.
    Camouflage,
    /// Better food-to-energy conversion when eating others.
    Digestion,
}

impl Gene {
    /// All genes, in canonical order.
    pub const ALL: [Gene; GENE_COUNT] = [
        Gene::Offense,
        Gene::Defense,
        Gene::Strength,
        Gene::Autotrophy,
        Gene::Hunting,
        Gene::Flight,
        Gene::Fertility,
        Gene::Camouflage,
        Gene::Digestion,
    ];

    /// Position of the gene in [`Gene::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The prime factor this gene contributes to a fingerprint.
    pub const fn prime(self) -> u128 {
        match self {
            Gene::Offense => 2,
            Gene::Defense => 3,
            Gene::Strength => 5,
            Gene::Autotrophy => 7,
            Gene::Hunting => 11,
            Gene::Flight => 13,
            Gene::Fertility => 17,
            Gene::Camouflage => 19,
            Gene::Digestion => 23,
        }
    }

    /// Human readable name, used in population statistics.
    pub const fn name(self) -> &'static str {
        match self {
            Gene::Offense => "Offense",
            Gene::Defense => "Defense",
            Gene::Strength => "Strength",
            Gene::Autotrophy => "Autotrophy",
            Gene::Hunting => "Hunting",
            Gene::Flight => "Flight",
            Gene::Fertility => "Fertility",
            Gene::Camouflage => "Camouflage",
            Gene::Digestion => "Digestion",
        }
    }
}
