//! Lineup domain models.
//!
//! Provides the rating data a search runs against and the presentation
//! value a search result is turned into.
//!
//! # Domain Mappings
//!
//! | u-lineup | Broadcast | Meaning |
//! |----------|-----------|---------|
//! | Program | Show / genre | Something that can fill a slot |
//! | Slot | Hour of the day | One position in the lineup |
//! | Rating | Audience share | Score of a program in a slot |
//! | Lineup | Daily schedule | Labelled best assignment |

mod lineup;
mod rating_table;

pub use lineup::{slot_label, Lineup, SlotEntry, DEFAULT_START_HOUR};
pub use rating_table::RatingTable;
