//! Search configuration.
//!
//! [`GaConfig`] holds every parameter of one run. It is fixed before the
//! run starts and never changes during it.

use serde::{Deserialize, Serialize};

use super::operators::RepresentationMode;
use crate::models::RatingTable;
use crate::validation::{validate_config, ValidationResult};

/// Tournament size used by parent selection.
pub const TOURNAMENT_SIZE: usize = 3;

/// Configuration for the lineup genetic search.
///
/// # Defaults
///
/// ```
/// use u_lineup::ga::{GaConfig, RepresentationMode};
///
/// let config = GaConfig::default();
/// assert_eq!(config.generations, 200);
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.elitism_count, 2);
/// assert_eq!(config.representation_mode, RepresentationMode::RepetitionAllowed);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_lineup::ga::{GaConfig, RepresentationMode};
///
/// let config = GaConfig::default()
///     .with_generations(500)
///     .with_population_size(100)
///     .with_mutation_rate(0.05)
///     .with_representation_mode(RepresentationMode::Permutation)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of generations evaluated before termination (`G`).
    pub generations: usize,

    /// Number of schedules per generation (`P`).
    pub population_size: usize,

    /// Probability of applying crossover to a parent pair (0.0–1.0).
    pub crossover_rate: f64,

    /// Per-slot mutation probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Top members copied unchanged into the next generation (`E`).
    pub elitism_count: usize,

    /// Schedule representation; selects the crossover and mutation operators.
    pub representation_mode: RepresentationMode,

    /// Random seed for reproducibility. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generations: 200,
            population_size: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            elitism_count: 2,
            representation_mode: RepresentationMode::RepetitionAllowed,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the generation count.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate. Out-of-range values are rejected by validation.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the per-slot mutation rate. Out-of-range values are rejected by validation.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elitism count.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Sets the representation mode.
    pub fn with_representation_mode(mut self, mode: RepresentationMode) -> Self {
        self.representation_mode = mode;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration against the table it will run on.
    ///
    /// Returns every detected issue, see [`validate_config`].
    pub fn validate(&self, table: &RatingTable) -> ValidationResult {
        validate_config(self, table)
    }
}
