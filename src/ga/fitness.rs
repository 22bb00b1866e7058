//! Lineup fitness: total rating over all slots.
//!
//! `fitness(s) = Σ_i ratings[s[i]][i]` for `i` in `0..S`. No normalization,
//! higher is better. A missing program or slot is an error, never zero.

use super::chromosome::ScheduleChromosome;
use crate::error::{LineupError, Result};
use crate::models::RatingTable;

/// Scores a slot assignment against the rating table.
///
/// # Errors
/// - `ScheduleLength` if the assignment does not cover exactly `S` slots.
/// - `InvalidSchedule` if a slot holds a program the table does not rate.
///
/// # Example
///
/// ```
/// use u_lineup::ga::evaluate;
/// use u_lineup::models::RatingTable;
///
/// let table = RatingTable::new(vec![
///     ("A".to_string(), vec![5.0, 1.0]),
///     ("B".to_string(), vec![1.0, 5.0]),
/// ]).unwrap();
/// let total = evaluate(&["A".to_string(), "B".to_string()], &table).unwrap();
/// assert_eq!(total, 10.0);
/// ```
pub fn evaluate(slots: &[String], table: &RatingTable) -> Result<f64> {
    if slots.len() != table.slot_count() {
        return Err(LineupError::ScheduleLength {
            expected: table.slot_count(),
            actual: slots.len(),
        });
    }
    slots
        .iter()
        .enumerate()
        .try_fold(0.0, |total, (slot, program)| {
            table
                .rating(program, slot)
                .map(|rating| total + rating)
                .ok_or_else(|| LineupError::InvalidSchedule {
                    program: program.clone(),
                    slot,
                })
        })
}

/// Scores every member in population order and stores the result on it.
///
/// Sequential on purpose: selection and elitism break ties by this order.
pub fn evaluate_population(
    population: &mut [ScheduleChromosome],
    table: &RatingTable,
) -> Result<()> {
    for member in population.iter_mut() {
        member.fitness = evaluate(&member.slots, table)?;
    }
    Ok(())
}
