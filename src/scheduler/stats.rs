//! Generation run statistics.
//!
//! Computed once at the end of a run from the recorder batch and the
//! tracker's supervision totals (seeded exams included, so the load
//! figures reflect the whole term, not just this run).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Placement, ProfessorId};

/// Outcome figures for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Semester number (1 or 2).
    pub semester: u8,
    /// Units placed this run.
    pub placed: usize,
    /// Units still unplaced after the retry pass.
    pub failed: usize,
    /// Units the run attempted.
    pub total: usize,
    /// Distinct modules among the attempted units.
    pub modules_total: usize,
    /// Wall-clock run time in seconds.
    pub elapsed_secs: f64,
    /// placed / total, as a percentage. 100 when there was nothing to do.
    pub success_rate: f64,
    /// Distinct rooms used by this run's placements.
    pub rooms_used: usize,
    /// Least-loaded professor's supervision count.
    pub supervision_min: u32,
    /// Most-loaded professor's supervision count.
    pub supervision_max: u32,
    /// Mean supervision count across loaded professors.
    pub supervision_avg: f64,
}

impl GenerationStats {
    /// Stats for a run with nothing to schedule.
    pub fn empty(semester: u8) -> Self {
        Self {
            semester,
            placed: 0,
            failed: 0,
            total: 0,
            modules_total: 0,
            elapsed_secs: 0.0,
            success_rate: 100.0,
            rooms_used: 0,
            supervision_min: 0,
            supervision_max: 0,
            supervision_avg: 0.0,
        }
    }

    /// Computes run statistics.
    pub fn compute(
        semester: u8,
        total: usize,
        modules_total: usize,
        elapsed_secs: f64,
        placements: &[Placement],
        supervision_totals: &std::collections::HashMap<ProfessorId, u32>,
    ) -> Self {
        let placed = placements.len();
        let failed = total.saturating_sub(placed);
        let success_rate = if total > 0 {
            placed as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        let rooms_used = placements
            .iter()
            .map(|p| p.room_id)
            .collect::<HashSet<_>>()
            .len();

        let (supervision_min, supervision_max, supervision_avg) =
            if supervision_totals.is_empty() {
                (0, 0, 0.0)
            } else {
                let min = supervision_totals.values().copied().min().unwrap_or(0);
                let max = supervision_totals.values().copied().max().unwrap_or(0);
                let sum: u32 = supervision_totals.values().sum();
                (min, max, sum as f64 / supervision_totals.len() as f64)
            };

        Self {
            semester,
            placed,
            failed,
            total,
            modules_total,
            elapsed_secs,
            success_rate,
            rooms_used,
            supervision_min,
            supervision_max,
            supervision_avg,
        }
    }
}
