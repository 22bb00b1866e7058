//! Initial population construction.

use rand::Rng;

use super::chromosome::ScheduleChromosome;
use super::operators::RepresentationMode;
use crate::error::{LineupError, Result};
use crate::models::RatingTable;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Builds `size` random chromosomes for the given representation.
///
/// - Repetition-allowed: every slot is drawn uniformly from the program set.
/// - Permutation: every member is a uniformly random permutation of the
///   program set; requires as many programs as slots.
///
/// # Errors
/// `Configuration` when permutation mode is requested for a table whose
/// program count differs from its slot count.
pub fn initialize_population<R: Rng>(
    table: &RatingTable,
    size: usize,
    mode: RepresentationMode,
    rng: &mut R,
) -> Result<Vec<ScheduleChromosome>> {
    let programs = table.programs();
    match mode {
        RepresentationMode::RepetitionAllowed => Ok((0..size)
            .map(|_| ScheduleChromosome::random_with_repetition(programs, table.slot_count(), rng))
            .collect()),
        RepresentationMode::Permutation => {
            if !table.is_square() {
                return Err(LineupError::Configuration(vec![ValidationError::new(
                    ValidationErrorKind::PermutationShapeMismatch,
                    format!(
                        "permutation mode needs as many programs as slots ({} programs, {} slots)",
                        table.program_count(),
                        table.slot_count()
                    ),
                )]));
            }
            Ok((0..size)
                .map(|_| ScheduleChromosome::random_permutation(programs, rng))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn square_table() -> RatingTable {
        RatingTable::new(vec![
            ("a".into(), vec![1.0, 2.0, 3.0]),
            ("b".into(), vec![3.0, 2.0, 1.0]),
            ("c".into(), vec![2.0, 2.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_repetition_population() {
        let table = square_table();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop =
            initialize_population(&table, 10, RepresentationMode::RepetitionAllowed, &mut rng)
                .unwrap();
        assert_eq!(pop.len(), 10);
        assert!(pop
            .iter()
            .all(|ch| ch.is_valid(&table, RepresentationMode::RepetitionAllowed)));
    }

    #[test]
    fn test_permutation_population() {
        let table = square_table();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop =
            initialize_population(&table, 10, RepresentationMode::Permutation, &mut rng).unwrap();
        assert_eq!(pop.len(), 10);
        assert!(pop
            .iter()
            .all(|ch| ch.is_valid(&table, RepresentationMode::Permutation)));
    }

    #[test]
    fn test_permutation_requires_square_table() {
        let table = RatingTable::new(vec![
            ("a".into(), vec![1.0, 2.0, 3.0]),
            ("b".into(), vec![3.0, 2.0, 1.0]),
        ])
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let err = initialize_population(&table, 4, RepresentationMode::Permutation, &mut rng)
            .unwrap_err();
        assert_eq!(
            err.validation_errors()[0].kind,
            ValidationErrorKind::PermutationShapeMismatch
        );
    }

    #[test]
    fn test_same_seed_same_population() {
        let table = square_table();
        let mut rng1 = SmallRng::seed_from_u64(9);
        let mut rng2 = SmallRng::seed_from_u64(9);
        let p1 = initialize_population(&table, 5, RepresentationMode::RepetitionAllowed, &mut rng1)
            .unwrap();
        let p2 = initialize_population(&table, 5, RepresentationMode::RepetitionAllowed, &mut rng2)
            .unwrap();
        assert_eq!(p1, p2);
    }
}
