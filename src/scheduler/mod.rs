//! Greedy exam placement and run statistics.
//!
//! # Algorithm
//!
//! The generator runs two passes over the unplaced units, largest
//! roster first. Each unit is handed to `SlotFinder`, which scans a
//! run-shuffled slot list and accepts the first slot offering a free,
//! big-enough room and a professor free at that exact hour with daily
//! capacity left. The retry pass reshuffles the slots and drops the
//! home-department preference. Greedy, no backtracking: units that
//! still fail are reported in the statistics, never raised as errors.
//!
//! # Reference
//!
//! - Carter & Laporte (1996), "Recent Developments in Practical
//!   Examination Timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod finder;
mod generator;
mod recorder;
mod stats;

pub use finder::{SlotFinder, AMPHITHEATER_THRESHOLD, MAX_DAILY_SUPERVISIONS};
pub use generator::{clear, GenerateOutcome, GenerateRequest, Generator, SchedulerError};
pub use recorder::AssignmentRecorder;
pub use stats::GenerationStats;
