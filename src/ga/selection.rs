//! Parent selection.

use rand::Rng;

use super::chromosome::ScheduleChromosome;

/// Tournament selection over an evaluated population.
///
/// Draws `size` distinct members uniformly at random (fewer if the
/// population is smaller) and returns the index of the fittest one.
/// Ties go to the member drawn first. Returns `None` for an empty
/// population.
pub fn tournament_select<R: Rng>(
    population: &[ScheduleChromosome],
    size: usize,
    rng: &mut R,
) -> Option<usize> {
    if population.is_empty() {
        return None;
    }
    let amount = size.clamp(1, population.len());
    let mut best: Option<usize> = None;
    for idx in rand::seq::index::sample(rng, population.len(), amount) {
        match best {
            Some(b) if population[idx].fitness <= population[b].fitness => {}
            _ => best = Some(idx),
        }
    }
    best
}
