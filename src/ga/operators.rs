//! Representation-aware genetic operators for lineups.
//!
//! Provides crossover and mutation operators for slot-vector chromosomes,
//! selected as a pair by [`GeneticOperators::for_mode`] so the evolution
//! loop never branches on the representation itself.
//!
//! | Mode | Crossover | Mutation |
//! |------|-----------|----------|
//! | Repetition-allowed | single-point | per-slot random reset |
//! | Permutation | single-point PMX | per-slot swap |
//!
//! # Usage
//!
//! ```
//! use u_lineup::ga::{GeneticOperators, RepresentationMode, CrossoverType, MutationType};
//!
//! let ops = GeneticOperators::for_mode(RepresentationMode::Permutation);
//! assert_eq!(ops.crossover_type, CrossoverType::PartiallyMapped);
//! assert_eq!(ops.mutation_type, MutationType::Swap);
//! ```
//!
//! # Reference
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::ScheduleChromosome;

/// How a lineup is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepresentationMode {
    /// Any program may fill any number of slots.
    #[default]
    RepetitionAllowed,
    /// Each program fills exactly one slot (programs == slots).
    Permutation,
}

impl fmt::Display for RepresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationMode::RepetitionAllowed => f.write_str("repetition-allowed"),
            RepresentationMode::Permutation => f.write_str("permutation"),
        }
    }
}

impl FromStr for RepresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repetition-allowed" | "repetition" => Ok(RepresentationMode::RepetitionAllowed),
            "permutation" => Ok(RepresentationMode::Permutation),
            other => Err(format!("unknown representation mode '{other}'")),
        }
    }
}

/// Crossover strategy for lineup chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossoverType {
    /// Plain single-point crossover. May duplicate programs.
    SinglePoint,
    /// Single-point Partially Mapped Crossover. Preserves permutations.
    PartiallyMapped,
}

/// Mutation strategy for lineup chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    /// Replace a slot's program with a uniformly random program.
    RandomReset,
    /// Exchange a slot's program with another slot's program.
    Swap,
}

/// Crossover and mutation pair for one representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Mutation strategy.
    pub mutation_type: MutationType,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::for_mode(RepresentationMode::default())
    }
}

impl GeneticOperators {
    /// Operators that keep chromosomes valid under `mode`.
    pub fn for_mode(mode: RepresentationMode) -> Self {
        match mode {
            RepresentationMode::RepetitionAllowed => Self {
                crossover_type: CrossoverType::SinglePoint,
                mutation_type: MutationType::RandomReset,
            },
            RepresentationMode::Permutation => Self {
                crossover_type: CrossoverType::PartiallyMapped,
                mutation_type: MutationType::Swap,
            },
        }
    }

    /// Produces two children from two parents.
    ///
    /// With probability `rate` the configured crossover is applied;
    /// otherwise the children are copies of the parents. `rate` must lie
    /// in `[0, 1]`.
    pub fn crossover<R: Rng>(
        &self,
        p1: &ScheduleChromosome,
        p2: &ScheduleChromosome,
        rate: f64,
        rng: &mut R,
    ) -> (ScheduleChromosome, ScheduleChromosome) {
        if !rng.random_bool(rate) {
            return (p1.clone(), p2.clone());
        }
        match self.crossover_type {
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
            CrossoverType::PartiallyMapped => pmx_crossover(p1, p2, rng),
        }
    }

    /// Mutates each slot independently with probability `rate`.
    pub fn mutate<R: Rng>(
        &self,
        chromosome: &mut ScheduleChromosome,
        rate: f64,
        programs: &[String],
        rng: &mut R,
    ) {
        match self.mutation_type {
            MutationType::RandomReset => random_reset_mutation(chromosome, rate, programs, rng),
            MutationType::Swap => swap_mutation(chromosome, rate, rng),
        }
    }
}

// ======================== Crossover operators ========================

/// Picks a cut point in `1..=len-2`, or `1` when `len == 2`.
///
/// Requires `len >= 2`.
pub fn cut_point<R: Rng>(len: usize, rng: &mut R) -> usize {
    let upper = len.saturating_sub(2).max(1);
    rng.random_range(1..=upper)
}

/// Single-point crossover.
///
/// Child A = `p1[..point] + p2[point..]`, child B = `p2[..point] + p1[point..]`.
/// Parents shorter than 2 slots or of unequal length are copied unchanged.
pub fn single_point_crossover<R: Rng>(
    p1: &ScheduleChromosome,
    p2: &ScheduleChromosome,
    rng: &mut R,
) -> (ScheduleChromosome, ScheduleChromosome) {
    let len = p1.len();
    if len < 2 || len != p2.len() {
        return (p1.clone(), p2.clone());
    }
    let point = cut_point(len, rng);

    let splice = |head: &[String], tail: &[String]| -> ScheduleChromosome {
        let slots = head[..point].iter().chain(&tail[point..]).cloned().collect();
        ScheduleChromosome::from_slots(slots)
    };
    (
        splice(p1.slots.as_slice(), p2.slots.as_slice()),
        splice(p2.slots.as_slice(), p1.slots.as_slice()),
    )
}

/// Single-point Partially Mapped Crossover (PMX).
///
/// Child A keeps `p1[..point]`; every other slot is taken from `p2`,
/// following the PMX mapping so no program is duplicated or lost.
/// Child B is built symmetrically. Both parents must be permutations of
/// the same program set.
///
/// # Reference
/// Goldberg & Lingle (1985)
pub fn pmx_crossover<R: Rng>(
    p1: &ScheduleChromosome,
    p2: &ScheduleChromosome,
    rng: &mut R,
) -> (ScheduleChromosome, ScheduleChromosome) {
    let len = p1.len();
    if len < 2 || len != p2.len() {
        return (p1.clone(), p2.clone());
    }
    let point = cut_point(len, rng);

    let child1 = pmx_build_child(&p1.slots, &p2.slots, point);
    let child2 = pmx_build_child(&p2.slots, &p1.slots, point);
    (
        ScheduleChromosome::from_slots(child1),
        ScheduleChromosome::from_slots(child2),
    )
}

/// Builds one PMX child: `template[..point]` is kept, `donor` fills the rest.
fn pmx_build_child(template: &[String], donor: &[String], point: usize) -> Vec<String> {
    let n = template.len();
    let donor_pos: HashMap<&str, usize> = donor
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let mut child: Vec<Option<&str>> = vec![None; n];
    let mut placed: HashSet<&str> = HashSet::with_capacity(n);
    for i in 0..point {
        child[i] = Some(template[i].as_str());
        placed.insert(template[i].as_str());
    }

    // Donor values displaced from the kept head follow the mapping chain
    // to the first position outside the head.
    for i in 0..point {
        let value = donor[i].as_str();
        if placed.contains(value) {
            continue;
        }
        let mut pos = i;
        for _ in 0..n {
            match donor_pos.get(template[pos].as_str()) {
                Some(&p) if p < point => pos = p,
                Some(&p) => {
                    child[p] = Some(value);
                    placed.insert(value);
                    break;
                }
                None => break,
            }
        }
    }

    child
        .into_iter()
        .enumerate()
        .map(|(i, slot)| slot.unwrap_or(donor[i].as_str()).to_string())
        .collect()
}

// ======================== Mutation operators ========================

/// Per-slot random reset: each slot is redrawn from `programs` with
/// probability `rate`.
pub fn random_reset_mutation<R: Rng>(
    chromosome: &mut ScheduleChromosome,
    rate: f64,
    programs: &[String],
    rng: &mut R,
) {
    if programs.is_empty() {
        return;
    }
    let mut changed = false;
    for slot in chromosome.slots.iter_mut() {
        if rng.random_bool(rate) {
            if let Some(program) = programs.choose(rng) {
                slot.clone_from(program);
                changed = true;
            }
        }
    }
    if changed {
        chromosome.reset_fitness();
    }
}

/// Per-slot swap: each slot trades places with a uniformly random slot
/// with probability `rate`. Keeps a permutation a permutation.
pub fn swap_mutation<R: Rng>(chromosome: &mut ScheduleChromosome, rate: f64, rng: &mut R) {
    let len = chromosome.len();
    if len < 2 {
        return;
    }
    let mut changed = false;
    for i in 0..len {
        if rng.random_bool(rate) {
            let j = rng.random_range(0..len);
            chromosome.slots.swap(i, j);
            changed = true;
        }
    }
    if changed {
        chromosome.reset_fitness();
    }
}
