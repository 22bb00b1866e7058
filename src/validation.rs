//! Run validation for lineup search.
//!
//! Checks a search configuration against the rating table before any
//! population is created. Detects:
//! - Zero generations or an empty population
//! - Rates outside `[0, 1]` (including NaN)
//! - Elitism larger than the population
//! - Fewer than two slots
//! - Permutation mode on a non-square table
//!
//! All issues are collected and reported together.

use std::fmt;

use crate::ga::{GaConfig, RepresentationMode};
use crate::models::RatingTable;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `generations` is zero.
    ZeroGenerations,
    /// `population_size` is zero.
    ZeroPopulation,
    /// A rate lies outside `[0, 1]` or is NaN.
    RateOutOfRange,
    /// `elitism_count` exceeds `population_size`.
    ElitismExceedsPopulation,
    /// The table has fewer than two slots; crossover has no cut point.
    TooFewSlots,
    /// Permutation mode with program count != slot count.
    PermutationShapeMismatch,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a search configuration against a rating table.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &GaConfig, table: &RatingTable) -> ValidationResult {
    let mut errors = Vec::new();

    if config.generations == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroGenerations,
            "generations must be at least 1",
        ));
    }

    if config.population_size == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroPopulation,
            "population_size must be at least 1",
        ));
    }

    for (name, rate) in [
        ("crossover_rate", config.crossover_rate),
        ("mutation_rate", config.mutation_rate),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            errors.push(ValidationError::new(
                ValidationErrorKind::RateOutOfRange,
                format!("{name} must be within [0, 1], got {rate}"),
            ));
        }
    }

    if config.elitism_count > config.population_size {
        errors.push(ValidationError::new(
            ValidationErrorKind::ElitismExceedsPopulation,
            format!(
                "elitism_count ({}) exceeds population_size ({})",
                config.elitism_count, config.population_size
            ),
        ));
    }

    if table.slot_count() < 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::TooFewSlots,
            format!("at least 2 slots are required, table has {}", table.slot_count()),
        ));
    }

    if config.representation_mode == RepresentationMode::Permutation && !table.is_square() {
        errors.push(ValidationError::new(
            ValidationErrorKind::PermutationShapeMismatch,
            format!(
                "permutation mode needs as many programs as slots ({} programs, {} slots)",
                table.program_count(),
                table.slot_count()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
