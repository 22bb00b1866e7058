//! Rating table: program → per-slot audience ratings.
//!
//! The table is loaded once per run and is read-only during a search.
//! Every program carries exactly `slot_count` ratings.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LineupError, Result};

/// Immutable program × slot rating lookup.
///
/// Programs keep their insertion order, which is also the order used
/// when operators draw a program uniformly at random.
///
/// # Example
///
/// ```
/// use u_lineup::models::RatingTable;
///
/// let table = RatingTable::new(vec![
///     ("A".to_string(), vec![5.0, 1.0]),
///     ("B".to_string(), vec![1.0, 5.0]),
/// ]).unwrap();
/// assert_eq!(table.slot_count(), 2);
/// assert_eq!(table.rating("B", 1), Some(5.0));
/// ```
///
/// Serialized as its `(program, ratings)` rows; deserialization goes
/// through [`RatingTable::new`], so the same shape checks apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, Vec<f64>)>", into = "Vec<(String, Vec<f64>)>")]
pub struct RatingTable {
    programs: Vec<String>,
    ratings: HashMap<String, Vec<f64>>,
    slot_count: usize,
}

impl TryFrom<Vec<(String, Vec<f64>)>> for RatingTable {
    type Error = LineupError;

    fn try_from(rows: Vec<(String, Vec<f64>)>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<RatingTable> for Vec<(String, Vec<f64>)> {
    fn from(mut table: RatingTable) -> Self {
        table
            .programs
            .into_iter()
            .map(|program| {
                let ratings = table.ratings.remove(&program).unwrap_or_default();
                (program, ratings)
            })
            .collect()
    }
}

impl RatingTable {
    /// Builds a table from `(program, ratings)` rows.
    ///
    /// # Errors
    /// - `EmptyData` if there are no rows or the rows carry no ratings.
    /// - `MalformedTable` for duplicate program ids, ragged rows, or
    ///   non-finite ratings.
    pub fn new(rows: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let slot_count = match rows.first() {
            Some((_, first)) => first.len(),
            None => return Err(LineupError::EmptyData("rating table has no programs".into())),
        };
        if slot_count == 0 {
            return Err(LineupError::EmptyData("rating table has no time slots".into()));
        }

        let mut programs = Vec::with_capacity(rows.len());
        let mut ratings = HashMap::with_capacity(rows.len());
        for (program, values) in rows {
            if values.len() != slot_count {
                return Err(LineupError::MalformedTable(format!(
                    "program '{}' has {} ratings, expected {}",
                    program,
                    values.len(),
                    slot_count
                )));
            }
            if let Some(slot) = values.iter().position(|v| !v.is_finite()) {
                return Err(LineupError::MalformedTable(format!(
                    "program '{program}' has a non-finite rating at slot {slot}"
                )));
            }
            if ratings.contains_key(&program) {
                return Err(LineupError::MalformedTable(format!(
                    "duplicate program '{program}'"
                )));
            }
            programs.push(program.clone());
            ratings.insert(program, values);
        }

        Ok(Self {
            programs,
            ratings,
            slot_count,
        })
    }

    /// Loads a table from CSV text.
    ///
    /// The first row is a header and is skipped. Each following row is
    /// `program, rating_0, rating_1, ...`. Rows with an empty program id
    /// or a different number of ratings are `MalformedTable` errors.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut fields = record.iter();
            let program = match fields.next() {
                Some(p) if !p.is_empty() => p.to_string(),
                _ => {
                    return Err(LineupError::MalformedTable(format!(
                        "data row {} has an empty program id",
                        row + 1
                    )))
                }
            };
            let values = fields
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        LineupError::MalformedTable(format!(
                            "program '{program}' has a non-numeric rating '{field}'"
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push((program, values));
        }

        let table = Self::new(rows)?;
        tracing::debug!(
            programs = table.program_count(),
            slots = table.slot_count(),
            "loaded rating table"
        );
        Ok(table)
    }

    /// Loads a table from a CSV file on disk.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Program ids in load order.
    pub fn programs(&self) -> &[String] {
        &self.programs
    }

    /// Number of programs.
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Number of time slots (`S`).
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Rating of `program` at `slot`, if both exist.
    #[inline]
    pub fn rating(&self, program: &str, slot: usize) -> Option<f64> {
        self.ratings.get(program).and_then(|r| r.get(slot)).copied()
    }

    /// All ratings of a program.
    pub fn ratings_for(&self, program: &str) -> Option<&[f64]> {
        self.ratings.get(program).map(|r| r.as_slice())
    }

    /// Whether the program set can be laid out as a permutation of the slots.
    pub fn is_square(&self) -> bool {
        self.programs.len() == self.slot_count
    }
}
