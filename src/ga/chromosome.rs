//! Slot-vector chromosome for lineup search.
//!
//! # Encoding
//!
//! A chromosome is a vector of program ids, one per slot: element `i` is
//! the program broadcast in slot `i`. In repetition-allowed mode any
//! program may fill several slots; in permutation mode every program
//! appears exactly once.
//!
//! Chromosomes are values. Operators build new children from borrowed
//! parents and only mutate chromosomes they own.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::operators::RepresentationMode;
use crate::models::RatingTable;

/// Candidate lineup for the GA.
///
/// Higher fitness = better lineup (maximization convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChromosome {
    /// Program id per slot.
    pub slots: Vec<String>,
    /// Fitness value (higher = better). `NEG_INFINITY` until evaluated.
    pub fitness: f64,
}

impl ScheduleChromosome {
    /// Wraps an explicit slot assignment (unevaluated).
    pub fn from_slots(slots: Vec<String>) -> Self {
        Self {
            slots,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Creates a chromosome whose slots are drawn independently, with replacement.
    ///
    /// Returns an empty chromosome when `programs` is empty.
    pub fn random_with_repetition<R: Rng>(programs: &[String], slot_count: usize, rng: &mut R) -> Self {
        let slots = (0..slot_count)
            .filter_map(|_| programs.choose(rng).cloned())
            .collect();
        Self::from_slots(slots)
    }

    /// Creates a chromosome that is a uniformly random permutation of `programs`.
    pub fn random_permutation<R: Rng>(programs: &[String], rng: &mut R) -> Self {
        let mut slots = programs.to_vec();
        slots.shuffle(rng);
        Self::from_slots(slots)
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the chromosome has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Clears the cached fitness after the slots changed.
    #[inline]
    pub(crate) fn reset_fitness(&mut self) {
        self.fitness = f64::NEG_INFINITY;
    }

    /// Whether every slot uses a distinct program.
    pub fn has_unique_programs(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.slots.len());
        self.slots.iter().all(|p| seen.insert(p.as_str()))
    }

    /// Validates the chromosome against a rating table and representation.
    pub fn is_valid(&self, table: &RatingTable, mode: RepresentationMode) -> bool {
        if self.slots.len() != table.slot_count() {
            return false;
        }
        if self.slots.iter().any(|p| table.ratings_for(p).is_none()) {
            return false;
        }
        match mode {
            RepresentationMode::RepetitionAllowed => true,
            RepresentationMode::Permutation => {
                self.slots.len() == table.program_count() && self.has_unique_programs()
            }
        }
    }
}
