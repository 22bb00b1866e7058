//! GA-based lineup optimization.
//!
//! Searches for a program-to-slot assignment maximizing the summed
//! audience rating.
//!
//! # Encoding
//!
//! A chromosome is a slot vector of program ids. Two representations
//! are supported and each comes with its own operator pair:
//!
//! - **Repetition-allowed**: programs may repeat across slots.
//! - **Permutation**: each program fills exactly one slot.
//!
//! # Submodules
//!
//! - [`operators`]: Representation-keyed crossover and mutation
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection, and the Effects of Noise"

mod chromosome;
mod config;
mod fitness;
pub mod operators;
mod population;
mod runner;
mod selection;

pub use chromosome::ScheduleChromosome;
pub use config::{GaConfig, TOURNAMENT_SIZE};
pub use fitness::{evaluate, evaluate_population};
pub use operators::{
    cut_point, pmx_crossover, random_reset_mutation, single_point_crossover, swap_mutation,
    CrossoverType, GeneticOperators, MutationType, RepresentationMode,
};
pub use population::initialize_population;
pub use runner::{GenerationStats, GeneticSearch, SearchResult, SearchState};
pub use selection::tournament_select;
