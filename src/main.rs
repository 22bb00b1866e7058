use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use u_lineup::ga::{GaConfig, GeneticSearch, RepresentationMode};
use u_lineup::models::{Lineup, RatingTable, DEFAULT_START_HOUR};

fn cli() -> Command {
    Command::new("u-lineup")
        .about("Searches for a high-rating broadcast lineup with a genetic algorithm")
        .arg(
            arg!(<RATINGS> "Path to the ratings CSV (program rows, slot columns)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--config <PATH> "JSON file with search parameters")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--generations <N> "Number of generations").value_parser(value_parser!(usize)))
        .arg(arg!(--population <N> "Population size").value_parser(value_parser!(usize)))
        .arg(
            arg!(--"crossover-rate" <RATE> "Crossover probability in [0, 1]")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--"mutation-rate" <RATE> "Per-slot mutation probability in [0, 1]")
                .value_parser(value_parser!(f64)),
        )
        .arg(arg!(--elitism <N> "Elite lineups kept per generation").value_parser(value_parser!(usize)))
        .arg(
            arg!(--mode <MODE> "Schedule representation")
                .value_parser(["repetition-allowed", "permutation"]),
        )
        .arg(arg!(--seed <SEED> "Seed for reproducible runs").value_parser(value_parser!(u64)))
        .arg(
            arg!(--trials <TRIALS> "Number of independent runs")
                .default_value("3")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--"start-hour" <HOUR> "Wall-clock hour of the first slot")
                .default_value("6")
                .value_parser(value_parser!(u32).range(0..24)),
        )
        .arg(arg!(--json "Print results as JSON"))
}

#[derive(Serialize)]
struct TrialReport {
    trial: usize,
    seed: Option<u64>,
    lineup: Lineup,
    generations: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let path = matches
        .get_one::<PathBuf>("RATINGS")
        .ok_or_else(|| anyhow!("missing ratings file"))?;
    let table = RatingTable::from_csv_path(path)
        .with_context(|| format!("failed to load ratings from {}", path.display()))?;
    let config = build_config(&matches)?;

    let trials = matches.get_one::<usize>("trials").copied().unwrap_or_default();
    let start_hour = matches
        .get_one::<u32>("start-hour")
        .copied()
        .unwrap_or(DEFAULT_START_HOUR);
    let json = matches.get_flag("json");

    let mut reports = Vec::with_capacity(trials);
    for trial in 1..=trials {
        let mut trial_config = config.clone();
        trial_config.seed = trial_seed(config.seed, trial);
        let seed = trial_config.seed;

        let result = GeneticSearch::new(&table, trial_config)
            .and_then(|search| search.run())
            .with_context(|| format!("trial {trial} failed"))?;
        let lineup = result.lineup(start_hour);

        if !json {
            println!("\n=================== TRIAL {trial} ===================");
            println!("{lineup}");
        }
        reports.push(TrialReport {
            trial,
            seed,
            lineup,
            generations: result.generations,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

/// Seed for the 1-based `trial`: the first trial runs with `base` itself.
fn trial_seed(base: Option<u64>, trial: usize) -> Option<u64> {
    base.map(|s| s.wrapping_add(trial.saturating_sub(1) as u64))
}

fn build_config(matches: &ArgMatches) -> Result<GaConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<GaConfig>(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GaConfig::default(),
    };

    if let Some(&n) = matches.get_one::<usize>("generations") {
        config.generations = n;
    }
    if let Some(&n) = matches.get_one::<usize>("population") {
        config.population_size = n;
    }
    if let Some(&rate) = matches.get_one::<f64>("crossover-rate") {
        config.crossover_rate = rate;
    }
    if let Some(&rate) = matches.get_one::<f64>("mutation-rate") {
        config.mutation_rate = rate;
    }
    if let Some(&n) = matches.get_one::<usize>("elitism") {
        config.elitism_count = n;
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        config.representation_mode = mode
            .parse::<RepresentationMode>()
            .map_err(|e| anyhow!(e))?;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(seed);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let matches = cli().get_matches_from([
            "u-lineup",
            "ratings.csv",
            "--generations",
            "10",
            "--mutation-rate",
            "0.05",
            "--mode",
            "permutation",
            "--seed",
            "9",
        ]);
        let config = build_config(&matches).unwrap();
        assert_eq!(config.generations, 10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-12);
        assert_eq!(config.representation_mode, RepresentationMode::Permutation);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.population_size, GaConfig::default().population_size);
        assert_eq!(matches.get_one::<usize>("trials"), Some(&3));
    }

    #[test]
    fn test_trial_seeds_start_at_base() {
        assert_eq!(trial_seed(Some(9), 1), Some(9));
        assert_eq!(trial_seed(Some(9), 3), Some(11));
        assert_eq!(trial_seed(Some(u64::MAX), 2), Some(0));
        assert_eq!(trial_seed(None, 2), None);
    }

    #[test]
    fn test_trials_default_comes_from_cli() {
        let matches = cli().get_matches_from(["u-lineup", "ratings.csv"]);
        let trials = matches.get_one::<usize>("trials").copied().unwrap_or_default();
        assert_eq!(trials, 3);

        let matches = cli().get_matches_from(["u-lineup", "ratings.csv", "--trials", "5"]);
        assert_eq!(matches.get_one::<usize>("trials"), Some(&5));
    }

    #[test]
    fn test_cli_verifies() {
        cli().debug_assert();
    }
}
