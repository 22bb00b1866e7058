//! Generational evolution loop.
//!
//! # Algorithm
//!
//! 1. Build a random population.
//! 2. Evaluate every member; keep the best-so-far lineup (strict
//!    improvement only, first found wins ties).
//! 3. Rank by fitness, copy the top `E` members unchanged, and fill the
//!    rest with tournament-selected parents passed through crossover and
//!    mutation.
//! 4. Repeat from 2 until `G` generations have been evaluated.
//!
//! There is no stagnation-based stopping rule; the generation budget is
//! the only termination criterion.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::chromosome::ScheduleChromosome;
use super::config::{GaConfig, TOURNAMENT_SIZE};
use super::fitness::evaluate_population;
use super::operators::GeneticOperators;
use super::population::initialize_population;
use super::selection::tournament_select;
use crate::error::{LineupError, Result};
use crate::models::{Lineup, RatingTable};
use crate::validation::validate_config;

/// Lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No population exists yet.
    Initializing,
    /// The current population is waiting to be scored.
    Evaluating,
    /// The current population is scored; the next one must be bred.
    BuildingNextGeneration,
    /// The generation budget is spent.
    Terminated,
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best fitness within this generation.
    pub best_fitness: f64,
    /// Mean fitness of this generation.
    pub mean_fitness: f64,
    /// Best fitness observed up to and including this generation.
    pub best_so_far: f64,
}

/// Outcome of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best lineup observed across all generations.
    pub best: ScheduleChromosome,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Number of generations evaluated.
    pub generations: usize,
    /// Per-generation statistics, in order.
    pub history: Vec<GenerationStats>,
}

impl SearchResult {
    /// Labels the best lineup with wall-clock slots starting at `start_hour`.
    pub fn lineup(&self, start_hour: u32) -> Lineup {
        Lineup::new(&self.best.slots, self.best_fitness, start_hour)
    }
}

/// Genetic search over lineups for one rating table.
///
/// The search can be driven to completion with [`run`](Self::run) or
/// advanced one state at a time with [`step`](Self::step). Between
/// generations the population and best-so-far record are consistent, so
/// a caller may stop early and read [`result`](Self::result).
///
/// # Example
///
/// ```
/// use u_lineup::ga::{GaConfig, GeneticSearch};
/// use u_lineup::models::RatingTable;
///
/// let table = RatingTable::new(vec![
///     ("A".to_string(), vec![5.0, 1.0]),
///     ("B".to_string(), vec![1.0, 5.0]),
/// ]).unwrap();
/// let config = GaConfig::default()
///     .with_generations(50)
///     .with_population_size(10)
///     .with_seed(42);
///
/// let result = GeneticSearch::new(&table, config).unwrap().run().unwrap();
/// assert!(result.best_fitness <= 10.0);
/// assert_eq!(result.best.slots.len(), 2);
/// ```
pub struct GeneticSearch<'a, R: Rng = StdRng> {
    table: &'a RatingTable,
    config: GaConfig,
    operators: GeneticOperators,
    rng: R,
    state: SearchState,
    population: Vec<ScheduleChromosome>,
    generation: usize,
    best: Option<ScheduleChromosome>,
    best_fitness: f64,
    history: Vec<GenerationStats>,
}

impl<'a> GeneticSearch<'a, StdRng> {
    /// Creates a search seeded from `config.seed`, or from OS entropy.
    ///
    /// # Errors
    /// `Configuration` if the configuration does not fit the table.
    pub fn new(table: &'a RatingTable, config: GaConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(table, config, rng)
    }
}

impl<'a, R: Rng> GeneticSearch<'a, R> {
    /// Creates a search drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored; the caller owns seeding.
    pub fn with_rng(table: &'a RatingTable, config: GaConfig, rng: R) -> Result<Self> {
        validate_config(&config, table).map_err(LineupError::Configuration)?;
        let operators = GeneticOperators::for_mode(config.representation_mode);
        Ok(Self {
            table,
            config,
            operators,
            rng,
            state: SearchState::Initializing,
            population: Vec::new(),
            generation: 0,
            best: None,
            best_fitness: f64::NEG_INFINITY,
            history: Vec::new(),
        })
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of generations evaluated so far.
    pub fn generations_evaluated(&self) -> usize {
        self.history.len()
    }

    /// Current population.
    pub fn population(&self) -> &[ScheduleChromosome] {
        &self.population
    }

    /// Best-so-far lineup and its fitness, once a generation was evaluated.
    pub fn best(&self) -> Option<(&ScheduleChromosome, f64)> {
        self.best.as_ref().map(|b| (b, self.best_fitness))
    }

    /// Per-generation statistics recorded so far.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Performs one state transition and returns the new state.
    ///
    /// Calling `step` on a terminated search is a no-op.
    pub fn step(&mut self) -> Result<SearchState> {
        self.state = match self.state {
            SearchState::Initializing => {
                self.initialize()?;
                SearchState::Evaluating
            }
            SearchState::Evaluating => {
                self.evaluate()?;
                if self.generation + 1 >= self.config.generations {
                    SearchState::Terminated
                } else {
                    SearchState::BuildingNextGeneration
                }
            }
            SearchState::BuildingNextGeneration => {
                self.build_next_generation()?;
                self.generation += 1;
                SearchState::Evaluating
            }
            SearchState::Terminated => SearchState::Terminated,
        };
        Ok(self.state)
    }

    /// Runs until the generation budget is spent.
    pub fn run(mut self) -> Result<SearchResult> {
        tracing::info!(
            generations = self.config.generations,
            population = self.config.population_size,
            mode = %self.config.representation_mode,
            programs = self.table.program_count(),
            slots = self.table.slot_count(),
            "starting lineup search"
        );
        while self.step()? != SearchState::Terminated {}

        let result = self.result().ok_or_else(|| {
            LineupError::EmptyData("search terminated without evaluating a generation".into())
        })?;
        tracing::info!(
            best_fitness = result.best_fitness,
            generations = result.generations,
            "lineup search finished"
        );
        Ok(result)
    }

    /// Snapshot of the best-so-far record, once a generation was evaluated.
    pub fn result(&self) -> Option<SearchResult> {
        self.best.as_ref().map(|best| SearchResult {
            best: best.clone(),
            best_fitness: self.best_fitness,
            generations: self.history.len(),
            history: self.history.clone(),
        })
    }

    fn initialize(&mut self) -> Result<()> {
        self.population = initialize_population(
            self.table,
            self.config.population_size,
            self.config.representation_mode,
            &mut self.rng,
        )?;
        self.generation = 0;
        self.best = None;
        self.best_fitness = f64::NEG_INFINITY;
        self.history.clear();
        Ok(())
    }

    fn evaluate(&mut self) -> Result<()> {
        evaluate_population(&mut self.population, self.table)?;

        let mut generation_best = f64::NEG_INFINITY;
        let mut total = 0.0;
        for member in &self.population {
            total += member.fitness;
            generation_best = generation_best.max(member.fitness);
            if member.fitness > self.best_fitness {
                self.best_fitness = member.fitness;
                self.best = Some(member.clone());
                tracing::trace!(
                    generation = self.generation,
                    fitness = member.fitness,
                    "new best lineup"
                );
            }
        }

        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: generation_best,
            mean_fitness: total / self.population.len() as f64,
            best_so_far: self.best_fitness,
        };
        tracing::debug!(
            generation = stats.generation,
            best = stats.best_fitness,
            mean = stats.mean_fitness,
            best_so_far = stats.best_so_far,
            "generation evaluated"
        );
        self.history.push(stats);
        Ok(())
    }

    fn build_next_generation(&mut self) -> Result<()> {
        let size = self.config.population_size;
        let current = &self.population;

        let ranked = rank_by_fitness(current);

        let mut next: Vec<ScheduleChromosome> = Vec::with_capacity(size);
        next.extend(
            ranked
                .iter()
                .take(self.config.elitism_count)
                .map(|&i| current[i].clone()),
        );

        let programs = self.table.programs();
        while next.len() < size {
            let (i1, i2) = match (
                tournament_select(current, TOURNAMENT_SIZE, &mut self.rng),
                tournament_select(current, TOURNAMENT_SIZE, &mut self.rng),
            ) {
                (Some(i1), Some(i2)) => (i1, i2),
                _ => {
                    return Err(LineupError::EmptyData(
                        "cannot select parents from an empty population".into(),
                    ))
                }
            };

            let (mut c1, mut c2) = self.operators.crossover(
                &current[i1],
                &current[i2],
                self.config.crossover_rate,
                &mut self.rng,
            );
            self.operators
                .mutate(&mut c1, self.config.mutation_rate, programs, &mut self.rng);
            self.operators
                .mutate(&mut c2, self.config.mutation_rate, programs, &mut self.rng);

            next.push(c1);
            if next.len() < size {
                next.push(c2);
            }
        }

        self.population = next;
        Ok(())
    }
}

/// Population indices, fittest first. Equal fitness keeps population
/// order, so the lowest-index members win elite places on ties.
fn rank_by_fitness(population: &[ScheduleChromosome]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..population.len()).collect();
    ranked.sort_by(|&a, &b| population[b].fitness.total_cmp(&population[a].fitness));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::RepresentationMode;
    use rand::rngs::SmallRng;

    fn two_by_two() -> RatingTable {
        RatingTable::new(vec![
            ("A".into(), vec![5.0, 1.0]),
            ("B".into(), vec![1.0, 5.0]),
        ])
        .unwrap()
    }

    fn broadcast_table(programs: usize, slots: usize) -> RatingTable {
        RatingTable::new(
            (0..programs)
                .map(|p| {
                    let ratings = (0..slots)
                        .map(|s| ((p * 7 + s * 3) % 11) as f64 / 10.0)
                        .collect();
                    (format!("program_{p}"), ratings)
                })
                .collect(),
        )
        .unwrap()
    }

    fn tiny_config() -> GaConfig {
        GaConfig::default()
            .with_generations(5)
            .with_population_size(4)
            .with_elitism_count(1)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.5)
    }

    #[test]
    fn test_rank_by_fitness_keeps_order_on_ties() {
        let population: Vec<ScheduleChromosome> = [3.0, 7.0, 3.0, 7.0, 1.0]
            .iter()
            .map(|&f| {
                let mut ch = ScheduleChromosome::from_slots(vec!["A".into()]);
                ch.fitness = f;
                ch
            })
            .collect();
        assert_eq!(rank_by_fitness(&population), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_elites_on_flat_fitness_are_first_members() {
        let table = RatingTable::new(vec![
            ("A".into(), vec![1.0, 1.0, 1.0]),
            ("B".into(), vec![1.0, 1.0, 1.0]),
            ("C".into(), vec![1.0, 1.0, 1.0]),
        ])
        .unwrap();
        let config = tiny_config()
            .with_population_size(6)
            .with_elitism_count(2)
            .with_generations(3);
        let mut search =
            GeneticSearch::with_rng(&table, config, SmallRng::seed_from_u64(11)).unwrap();

        assert_eq!(search.step().unwrap(), SearchState::Evaluating);
        assert_eq!(search.step().unwrap(), SearchState::BuildingNextGeneration);
        let before: Vec<Vec<String>> = search
            .population()
            .iter()
            .take(2)
            .map(|ch| ch.slots.clone())
            .collect();

        assert_eq!(search.step().unwrap(), SearchState::Evaluating);
        let after: Vec<Vec<String>> = search
            .population()
            .iter()
            .take(2)
            .map(|ch| ch.slots.clone())
            .collect();
        assert_eq!(after, before);
    }

    #[test]
    fn test_state_machine_transitions() {
        let table = two_by_two();
        let config = tiny_config().with_generations(2);
        let mut search =
            GeneticSearch::with_rng(&table, config, SmallRng::seed_from_u64(1)).unwrap();

        assert_eq!(search.state(), SearchState::Initializing);
        assert!(search.best().is_none());
        assert_eq!(search.step().unwrap(), SearchState::Evaluating);
        assert_eq!(search.population().len(), 4);
        assert_eq!(search.step().unwrap(), SearchState::BuildingNextGeneration);
        assert!(search.best().is_some());
        assert_eq!(search.step().unwrap(), SearchState::Evaluating);
        assert_eq!(search.step().unwrap(), SearchState::Terminated);
        assert_eq!(search.step().unwrap(), SearchState::Terminated);
        assert_eq!(search.generations_evaluated(), 2);
    }

    #[test]
    fn test_two_program_optimum_with_fixed_seed() {
        let table = two_by_two();
        let config = tiny_config().with_generations(200).with_seed(42);
        let result = GeneticSearch::new(&table, config).unwrap().run().unwrap();
        assert_eq!(result.best_fitness, 10.0);
        assert_eq!(result.best.slots, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_two_program_optimum_within_five_generations() {
        let table = two_by_two();
        let mut hits = 0;
        for seed in 0..32 {
            let result = GeneticSearch::new(&table, tiny_config().with_seed(seed))
                .unwrap()
                .run()
                .unwrap();
            assert!(result.best_fitness <= 10.0);
            assert_eq!(result.generations, 5);
            if result.best_fitness == 10.0 {
                hits += 1;
            }
        }
        assert!(hits >= 26, "optimum found in only {hits}/32 runs");
    }

    #[test]
    fn test_best_so_far_is_non_decreasing() {
        let table = broadcast_table(10, 18);
        let config = GaConfig::default()
            .with_generations(60)
            .with_population_size(20)
            .with_seed(11);
        let result = GeneticSearch::new(&table, config).unwrap().run().unwrap();

        assert_eq!(result.history.len(), 60);
        for pair in result.history.windows(2) {
            assert!(pair[1].best_so_far >= pair[0].best_so_far);
        }
        // With elitism the generation best never drops either.
        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
        assert_eq!(result.history.last().unwrap().best_so_far, result.best_fitness);
    }

    #[test]
    fn test_best_fitness_matches_evaluator() {
        let table = broadcast_table(6, 18);
        let config = GaConfig::default()
            .with_generations(20)
            .with_population_size(12)
            .with_seed(5);
        let result = GeneticSearch::new(&table, config).unwrap().run().unwrap();
        let rescored = crate::ga::evaluate(&result.best.slots, &table).unwrap();
        assert_eq!(rescored, result.best_fitness);
        assert!(result
            .best
            .is_valid(&table, RepresentationMode::RepetitionAllowed));
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let table = broadcast_table(8, 18);
        let config = GaConfig::default()
            .with_generations(30)
            .with_population_size(16)
            .with_seed(2024);
        let r1 = GeneticSearch::new(&table, config.clone()).unwrap().run().unwrap();
        let r2 = GeneticSearch::new(&table, config).unwrap().run().unwrap();
        assert_eq!(r1.best.slots, r2.best.slots);
        assert_eq!(r1.best_fitness.to_bits(), r2.best_fitness.to_bits());
        assert_eq!(r1.history, r2.history);
    }

    #[test]
    fn test_permutation_mode_keeps_permutations() {
        let table = broadcast_table(18, 18);
        let config = GaConfig::default()
            .with_generations(3)
            .with_population_size(10)
            .with_mutation_rate(0.3)
            .with_representation_mode(RepresentationMode::Permutation);
        let mut search =
            GeneticSearch::with_rng(&table, config, SmallRng::seed_from_u64(8)).unwrap();
        while search.step().unwrap() != SearchState::Terminated {
            assert!(search
                .population()
                .iter()
                .all(|ch| ch.is_valid(&table, RepresentationMode::Permutation)));
        }
        let result = search.result().unwrap();
        assert!(result.best.has_unique_programs());
    }

    #[test]
    fn test_population_size_is_kept_with_odd_size() {
        let table = two_by_two();
        let config = tiny_config().with_population_size(5).with_elitism_count(2);
        let mut search =
            GeneticSearch::with_rng(&table, config, SmallRng::seed_from_u64(3)).unwrap();
        while search.step().unwrap() != SearchState::Terminated {
            assert_eq!(search.population().len(), 5);
        }
    }

    #[test]
    fn test_full_elitism_freezes_population() {
        let table = broadcast_table(5, 6);
        let config = GaConfig::default()
            .with_generations(4)
            .with_population_size(6)
            .with_elitism_count(6);
        let mut search =
            GeneticSearch::with_rng(&table, config, SmallRng::seed_from_u64(4)).unwrap();
        search.step().unwrap();
        search.step().unwrap();
        let mut first: Vec<Vec<String>> =
            search.population().iter().map(|c| c.slots.clone()).collect();
        search.step().unwrap();
        let mut second: Vec<Vec<String>> =
            search.population().iter().map(|c| c.slots.clone()).collect();
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let table = two_by_two();
        let config = tiny_config().with_elitism_count(9);
        match GeneticSearch::new(&table, config) {
            Err(LineupError::Configuration(errors)) => assert_eq!(errors.len(), 1),
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected Configuration error"),
        }
    }

    #[test]
    fn test_lineup_from_result() {
        let table = two_by_two();
        let result = GeneticSearch::new(&table, tiny_config().with_generations(200).with_seed(42))
            .unwrap()
            .run()
            .unwrap();
        let lineup = result.lineup(6);
        assert_eq!(lineup.len(), 2);
        assert_eq!(lineup.entries[0].label, "06:00");
        assert_eq!(lineup.total_rating, result.best_fitness);
    }
}
