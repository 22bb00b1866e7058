//! Broadcast lineup planning for the U-Engine ecosystem.
//!
//! Finds a high-rating assignment of programs to daily time slots using
//! a generational genetic search.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `RatingTable`, `Lineup`
//! - **`ga`**: Chromosome, fitness, selection, operators, and the evolution loop
//! - **`validation`**: Run configuration checks against a rating table
//! - **`error`**: `LineupError` taxonomy
//!
//! # Example
//!
//! ```
//! use u_lineup::ga::{GaConfig, GeneticSearch};
//! use u_lineup::models::RatingTable;
//!
//! let csv = "Program,Hour 6,Hour 7,Hour 8\n\
//!            news,0.9,0.1,0.1\n\
//!            sports,0.1,0.9,0.1\n\
//!            movie,0.1,0.1,0.9\n";
//! let table = RatingTable::from_csv_reader(csv.as_bytes()).unwrap();
//! let config = GaConfig::default().with_generations(100).with_seed(1);
//!
//! let result = GeneticSearch::new(&table, config).unwrap().run().unwrap();
//! println!("{}", result.lineup(6));
//! ```
//!
//! # References
//!
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;

pub use error::{LineupError, Result};
