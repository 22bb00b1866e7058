//! Lineup (presentation) model.
//!
//! A lineup pairs a best schedule with wall-clock slot labels. The
//! column → hour mapping lives here, outside the search engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default first broadcast hour (06:00).
pub const DEFAULT_START_HOUR: u32 = 6;

/// One labelled slot of a lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Zero-based slot index.
    pub slot: usize,
    /// Wall-clock label, e.g. `"06:00"`.
    pub label: String,
    /// Program assigned to the slot.
    pub program: String,
}

/// A daily lineup ready for reporting.
///
/// # Example
///
/// ```
/// use u_lineup::models::Lineup;
///
/// let lineup = Lineup::new(&["news".to_string(), "movie".to_string()], 12.5, 6);
/// assert_eq!(lineup.entries[1].label, "07:00");
/// assert!(lineup.to_string().contains("Time Slot 06:00 - news"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    /// Labelled slots in broadcast order.
    pub entries: Vec<SlotEntry>,
    /// Total rating of the lineup.
    pub total_rating: f64,
}

impl Lineup {
    /// Labels `programs` starting at `start_hour`, wrapping past midnight.
    pub fn new(programs: &[String], total_rating: f64, start_hour: u32) -> Self {
        let entries = programs
            .iter()
            .enumerate()
            .map(|(slot, program)| SlotEntry {
                slot,
                label: slot_label(slot, start_hour),
                program: program.clone(),
            })
            .collect();
        Self {
            entries,
            total_rating,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lineup has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `HH:00` label of slot `slot` when the day starts at `start_hour`.
pub fn slot_label(slot: usize, start_hour: u32) -> String {
    let hour = (start_hour as usize + slot) % 24;
    format!("{hour:02}:00")
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "Time Slot {} - {}", entry.label, entry.program)?;
        }
        write!(f, "Total Ratings: {}", round3(self.total_rating))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(0, 6), "06:00");
        assert_eq!(slot_label(17, 6), "23:00");
        assert_eq!(slot_label(18, 6), "00:00");
    }

    #[test]
    fn test_report_format() {
        let programs = vec!["news".to_string(), "sports".to_string()];
        let lineup = Lineup::new(&programs, 1.23456, DEFAULT_START_HOUR);
        assert_eq!(
            lineup.to_string(),
            "Time Slot 06:00 - news\nTime Slot 07:00 - sports\nTotal Ratings: 1.235"
        );
        assert_eq!(lineup.len(), 2);
    }

    #[test]
    fn test_serialize() {
        let lineup = Lineup::new(&["news".to_string()], 0.5, 20);
        let json = serde_json::to_string(&lineup).unwrap();
        assert!(json.contains("\"label\":\"20:00\""));
    }
}
