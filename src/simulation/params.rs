use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gene::{GENE_COUNT, Gene};

/// Errors raised while loading or validating simulation parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The gene table has no entry for a gene.
    #[error("gene {0:?} has no entry in the gene table")]
    MissingGene(Gene),
    /// A parameter is outside of its valid range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for [`Params`].
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-gene costs and display colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneSpec {
    /// Energy it takes to build this gene into a newborn.
    pub creation_cost: f32,
    /// Energy consumed (or produced, if negative) every tick.
    pub upkeep: f32,
    /// Contribution to the disc color, channels in [0, 1].
    #[serde(default)]
    pub inner_color: Option<[f32; 3]>,
    /// Contribution to the outline color, channels in [0, 1].
    #[serde(default)]
    pub outer_color: Option<[f32; 3]>,
}

impl GeneSpec {
    fn new(creation_cost: f32, upkeep: f32) -> Self {
        Self {
            creation_cost,
            upkeep,
            inner_color: None,
            outer_color: None,
        }
    }

    fn inner(mut self, rgb: [f32; 3]) -> Self {
        self.inner_color = Some(rgb);
        self
    }

    fn outer(mut self, rgb: [f32; 3]) -> Self {
        self.outer_color = Some(rgb);
        self
    }
}

/// Lookup table with exactly one [`GeneSpec`] per gene.
///
/// Serialized as a map keyed by gene name. Deserializing a map that lacks a
/// gene fails, so a loaded table is always complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Gene, GeneSpec>",
    into = "BTreeMap<Gene, GeneSpec>"
)]
pub struct GeneTable([GeneSpec; GENE_COUNT]);

impl GeneTable {
    /// Returns the spec of a gene.
    pub fn get(&self, gene: Gene) -> &GeneSpec {
        &self.0[gene.index()]
    }

    /// Returns a mutable reference to the spec of a gene.
    pub fn get_mut(&mut self, gene: Gene) -> &mut GeneSpec {
        &mut self.0[gene.index()]
    }
}

impl TryFrom<BTreeMap<Gene, GeneSpec>> for GeneTable {
    type Error = ConfigError;

    fn try_from(mut map: BTreeMap<Gene, GeneSpec>) -> Result<Self, Self::Error> {
        let specs = Gene::ALL
            .iter()
            .map(|&gene| map.remove(&gene).ok_or(ConfigError::MissingGene(gene)))
            .collect::<Result<Vec<_>, _>>()?;
        let specs: [GeneSpec; GENE_COUNT] = specs
            .try_into()
            .map_err(|_| ConfigError::Invalid("gene table has the wrong size"))?;
        Ok(Self(specs))
    }
}

impl From<GeneTable> for BTreeMap<Gene, GeneSpec> {
    fn from(table: GeneTable) -> Self {
        Gene::ALL.into_iter().zip(table.0).collect()
    }
}

impl Default for GeneTable {
    fn default() -> Self {
        const RED: [f32; 3] = [1.0, 0.0, 0.0];
        const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
        const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
        const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];
        const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
        const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

        // Same order as Gene::ALL.
        Self([
            GeneSpec::new(2.0, 0.002).outer(RED),
            GeneSpec::new(4.0, 0.002).outer(GREEN),
            GeneSpec::new(0.5, 0.002).inner(RED),
            // Negative upkeep: autotrophs gain energy just by existing.
            GeneSpec::new(1.0, -0.008).inner(GREEN),
            GeneSpec::new(0.5, 0.0).inner(MAGENTA),
            GeneSpec::new(0.5, 0.0).inner(CYAN),
            GeneSpec::new(2.0, 0.002).inner(BLUE),
            GeneSpec::new(1.0, 0.0).inner(WHITE).outer(WHITE),
            GeneSpec::new(1.0, 0.0).outer(BLUE),
        ])
    }
}

/// Simulation parameters, fixed for the lifetime of a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Width of the world.
    pub world_width: f32,
    /// Height of the world.
    pub world_height: f32,
    /// Creature radius, used for both collisions and rendering.
    pub radius: f32,
    /// Ticks a creature with creation cost 1 spends as an egg.
    pub maturity: f32,
    /// Suffocation level above which a creature is removed.
    pub suffocation_limit: u32,
    /// Suffocation gained per tick spent in a crowd without eating.
    pub suffocation_increment: u32,
    /// Energy taken from a victim per point of offense over its defense.
    pub bitesize: f32,
    /// Energy lost by carrion every tick.
    pub carrion_decay: f32,
    /// Probability that a mutation removes a gene.
    pub p_remove: f64,
    /// Probability that a mutation adds a gene.
    pub p_add: f64,
    /// Newborns receive their creation cost times this much energy.
    pub birth_multiplier: f32,
    /// Creation cost of an empty genome.
    pub base_creation_cost: f32,
    /// Upkeep added per squared gene count.
    pub quadratic_upkeep_scale: f32,
    /// Fraction of the world, along each edge, that pushes creatures back.
    pub edge_margin: f32,
    /// Strength of the push away from the edges.
    pub edge_push: f32,
    /// Ticks until the first extinction.
    pub first_extinction: f32,
    /// Minimum number of ticks between two extinctions.
    pub extinction_interval: f32,
    /// Uniform random extra ticks added to the extinction interval.
    pub extinction_jitter: f32,
    /// Probability that a creature dies during an extinction.
    pub extinction_death_chance: f64,
    /// Number of autotrophs seeded into a new universe.
    pub initial_population: usize,
    /// Number of genomes listed in population statistics.
    pub stats_top_n: usize,
    /// Costs and colors of every gene.
    pub genes: GeneTable,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            radius: 5.0,
            maturity: 50.0,
            suffocation_limit: 80,
            suffocation_increment: 2,
            bitesize: 1.0,
            carrion_decay: 0.05,
            p_remove: 0.05,
            p_add: 0.025,
            birth_multiplier: 6.0,
            base_creation_cost: 0.1,
            quadratic_upkeep_scale: 0.0001,
            edge_margin: 0.1,
            edge_push: 0.000_01,
            first_extinction: 1000.0,
            extinction_interval: 500.0,
            extinction_jitter: 500.0,
            extinction_death_chance: 0.5,
            initial_population: 50,
            stats_top_n: 10,
            genes: GeneTable::default(),
        }
    }
}

impl Params {
    /// Checks that every parameter is usable.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::Invalid("radius must be positive"));
        }
        if !(self.world_width > 2.0 * self.radius && self.world_height > 2.0 * self.radius) {
            return Err(ConfigError::Invalid(
                "world must be larger than a single creature",
            ));
        }
        if !(self.maturity > 0.0) {
            return Err(ConfigError::Invalid("maturity must be positive"));
        }
        if !(self.base_creation_cost > 0.0) {
            return Err(ConfigError::Invalid("base_creation_cost must be positive"));
        }
        if !(self.birth_multiplier > 0.0) {
            return Err(ConfigError::Invalid("birth_multiplier must be positive"));
        }
        if !(self.bitesize >= 0.0 && self.carrion_decay >= 0.0) {
            return Err(ConfigError::Invalid(
                "bitesize and carrion_decay must not be negative",
            ));
        }
        for p in [self.p_remove, self.p_add, self.extinction_death_chance] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid("probabilities must lie in [0, 1]"));
            }
        }
        if !(self.extinction_interval >= 1.0 && self.extinction_jitter >= 0.0) {
            return Err(ConfigError::Invalid(
                "extinction interval must be at least one tick",
            ));
        }
        if !(0.0..0.5).contains(&self.edge_margin) {
            return Err(ConfigError::Invalid("edge_margin must lie in [0, 0.5)"));
        }
        for gene in Gene::ALL {
            let spec = self.genes.get(gene);
            if !spec.creation_cost.is_finite() || spec.creation_cost < 0.0 {
                return Err(ConfigError::Invalid(
                    "gene creation costs must be finite and non-negative",
                ));
            }
            if !spec.upkeep.is_finite() {
                return Err(ConfigError::Invalid("gene upkeep must be finite"));
            }
        }
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Writes the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
