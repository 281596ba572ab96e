//! Exam timetable generation and verification for universities.
//!
//! Builds a per-semester exam plan over a catalog of formations,
//! groups, modules, rooms, and professors, then verifies the persisted
//! plan against the same hard constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Exam`, `Slot`, `ExamPeriod`, `Room`,
//!   `Professor`, `Catalog`
//! - **`store`**: `ExamStore` persistence trait and the in-memory backend
//! - **`loader`**: Catalog loading, enrollment indexing, pending-unit derivation
//! - **`validation`**: Catalog integrity checks (duplicate ids, dangling refs)
//! - **`tracker`**: Occupancy state for one generation run
//! - **`scheduler`**: Greedy randomized two-pass placement
//! - **`conflicts`**: Read-only conflict detection and reporting
//!
//! # Hard constraints
//!
//! At most one exam per group per day, professors free at the exact
//! slot and capped at three supervisions a day, rosters never larger
//! than their room, one exam per room per slot.
//!
//! # References
//!
//! - Carter & Laporte (1996), "Recent Developments in Practical
//!   Examination Timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod conflicts;
pub mod loader;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod tracker;
pub mod validation;
