//! Generation orchestrator.
//!
//! One `Generator` value per invocation: it owns its availability
//! tracker and its seeded random source, so two runs never share state
//! implicitly and a fixed seed reproduces a run bit for bit.
//!
//! # Phases
//!
//! Seeding (catalog load, validation, occupancy seeding from persisted
//! exams), primary pass (home-department professor preference), retry
//! pass (reshuffled slots, full professor pool), persisting (atomic
//! batch flush). Runs single-threaded to completion; callers must
//! serialize concurrent runs and `clear` calls for overlapping scope
//! themselves.

use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::loader::{load_catalog, pending_units, EnrollmentIndex};
use crate::models::{DepartmentId, ExamPeriod, ExamUnit, Professor, Semester};
use crate::store::{ClearScope, ExamFilter, ExamStore, StoreError};
use crate::tracker::AvailabilityTracker;
use crate::validation::{validate_catalog, ValidationError};

use super::{AssignmentRecorder, GenerationStats, SlotFinder};

/// Errors that fail a whole scheduling operation.
///
/// Per-unit placement failures are not errors; they surface in the
/// run statistics.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Semester number outside {1, 2}.
    #[error("semester must be 1 or 2, got {0}")]
    InvalidSemester(u8),

    /// `clear` called with no filter at all.
    #[error("clear scope must name at least one of department, semester, or academic year")]
    EmptyScope,

    /// The catalog failed integrity validation.
    #[error("catalog failed validation ({} issue(s))", .0.len())]
    InvalidCatalog(Vec<ValidationError>),

    /// No exam period configured and none derivable for the term.
    #[error("no exam period for semester {semester} in {academic_year}")]
    MissingPeriod {
        /// Semester number.
        semester: u8,
        /// Academic year label.
        academic_year: String,
    },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Target semester.
    pub semester: Semester,
    /// Restrict to modules of one department. `None` = all.
    pub department: Option<DepartmentId>,
    /// Academic year label, e.g. "2024-2025".
    pub academic_year: String,
}

impl GenerateRequest {
    /// Creates a request for a whole-term run.
    pub fn new(semester: Semester, academic_year: impl Into<String>) -> Self {
        Self {
            semester,
            department: None,
            academic_year: academic_year.into(),
        }
    }

    /// Creates a request from an external semester number, rejecting
    /// anything but 1 or 2.
    pub fn for_semester_number(
        semester: u8,
        academic_year: impl Into<String>,
    ) -> Result<Self, SchedulerError> {
        let semester =
            Semester::from_number(semester).ok_or(SchedulerError::InvalidSemester(semester))?;
        Ok(Self::new(semester, academic_year))
    }

    /// Restricts the run to one department.
    pub fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }
}

/// Result of a generation run.
///
/// `success` is false only for configuration or store failures;
/// unplaced units leave it true and show up in `stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    /// Whether the run completed.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Run statistics.
    pub stats: GenerationStats,
}

/// One-shot exam timetable generator.
pub struct Generator {
    rng: StdRng,
    tracker: AvailabilityTracker,
}

impl Generator {
    /// Creates a generator with an explicit random seed.
    ///
    /// The same seed over the same catalog and persisted state yields
    /// an identical placement set.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            tracker: AvailabilityTracker::new(),
        }
    }

    /// Runs the full generation pipeline.
    ///
    /// Consumes the generator: one value, one run.
    pub fn generate<S: ExamStore>(mut self, store: &mut S, request: &GenerateRequest) -> GenerateOutcome {
        match self.run(store, request) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("generation failed: {err}");
                GenerateOutcome {
                    success: false,
                    message: err.to_string(),
                    stats: GenerationStats::empty(request.semester.number()),
                }
            }
        }
    }

    fn run<S: ExamStore>(
        &mut self,
        store: &mut S,
        request: &GenerateRequest,
    ) -> Result<GenerateOutcome, SchedulerError> {
        let semester = request.semester;
        let started = Instant::now();

        // Seeding: load and validate the catalog, then replay persisted
        // exams into the tracker so this run is incremental.
        info!(
            "generating semester {} ({}): seeding",
            semester, request.academic_year
        );
        let catalog = load_catalog(store)?;
        validate_catalog(&catalog).map_err(SchedulerError::InvalidCatalog)?;

        let existing = store.exams(&ExamFilter::planned_term(
            semester,
            request.academic_year.clone(),
        ))?;
        self.tracker.seed(&existing);
        debug!("seeded occupancy from {} persisted exams", existing.len());

        let index = EnrollmentIndex::build(&catalog);
        let units = pending_units(&catalog, &index, &existing, semester, request.department);
        if units.is_empty() {
            info!("nothing to schedule for semester {semester}");
            return Ok(GenerateOutcome {
                success: true,
                message: format!("no new exams to schedule for semester {semester}"),
                stats: GenerationStats::empty(semester.number()),
            });
        }

        let period = match catalog.exam_period(semester, &request.academic_year) {
            Some(period) => period.clone(),
            None => ExamPeriod::default_for(semester, &request.academic_year).ok_or_else(|| {
                SchedulerError::MissingPeriod {
                    semester: semester.number(),
                    academic_year: request.academic_year.clone(),
                }
            })?,
        };
        let mut slots = period.slots();
        slots.shuffle(&mut self.rng);
        info!(
            "{} units over {} slots ({} days, {} → {})",
            units.len(),
            slots.len(),
            period.day_count(),
            period.start,
            period.end
        );

        let scoped: Vec<&Professor> = catalog
            .professors
            .iter()
            .filter(|p| request.department.map_or(true, |d| p.department_id == d))
            .collect();
        let finder = SlotFinder::new(&catalog.rooms);
        let mut recorder = AssignmentRecorder::new();

        // Primary pass: home-department professors first.
        let mut failures: Vec<ExamUnit> = Vec::new();
        for (idx, unit) in units.iter().enumerate() {
            if (idx + 1) % 500 == 0 {
                debug!("primary pass: {}/{} units", idx + 1, units.len());
            }
            let primary: Vec<&Professor> = scoped
                .iter()
                .filter(|p| p.department_id == unit.department_id)
                .copied()
                .collect();
            let secondary: Vec<&Professor> = scoped
                .iter()
                .filter(|p| p.department_id != unit.department_id)
                .copied()
                .collect();

            match finder.find(&self.tracker, unit, &slots, &primary, &secondary) {
                Some(placement) => recorder.record(placement, &mut self.tracker),
                None => failures.push(*unit),
            }
        }
        info!(
            "primary pass placed {}/{} units",
            recorder.len(),
            units.len()
        );

        // Retry pass: reshuffled slots, no department preference.
        if !failures.is_empty() {
            slots.shuffle(&mut self.rng);
            let mut recovered = 0usize;
            for unit in &failures {
                if let Some(placement) = finder.find(&self.tracker, unit, &slots, &scoped, &[]) {
                    recorder.record(placement, &mut self.tracker);
                    recovered += 1;
                }
            }
            info!("retry pass recovered {recovered}/{} units", failures.len());
        }

        // Persisting: one atomic batch.
        recorder.flush(store, semester, &request.academic_year)?;

        let elapsed_secs = started.elapsed().as_secs_f64();
        let modules_total = {
            let mut ids: Vec<_> = units.iter().map(|u| u.module_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        };
        let stats = GenerationStats::compute(
            semester.number(),
            units.len(),
            modules_total,
            elapsed_secs,
            recorder.placements(),
            &self.tracker.supervision_totals(),
        );
        if stats.failed > 0 {
            warn!(
                "{} unit(s) unplaced; consider a longer exam period",
                stats.failed
            );
        }

        Ok(GenerateOutcome {
            success: true,
            message: format!(
                "semester {}: {} exams placed in {:.1}s",
                semester, stats.placed, elapsed_secs
            ),
            stats,
        })
    }
}

/// Deletes persisted exams (and their supervision rows) in scope.
///
/// An empty scope is rejected: wiping every term must be spelled out
/// filter by filter, never reached by accident.
pub fn clear<S: ExamStore>(store: &mut S, scope: &ClearScope) -> Result<usize, SchedulerError> {
    if scope.is_empty() {
        return Err(SchedulerError::EmptyScope);
    }
    let removed = store.delete_exams(scope)?;
    info!("cleared {removed} exams");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Enrollment, ExamPeriod, Formation, Group, Module, Professor, Room, RoomKind, Student,
    };
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    /// One department, one formation, one group of three students
    /// sitting one module, one room, one professor, a one-week period.
    fn tiny_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_formation(Formation {
            id: 1,
            department_id: 10,
            name: "CS".into(),
        });
        store.add_group(Group {
            id: 1,
            formation_id: 1,
            name: "G1".into(),
        });
        store.add_module(Module {
            id: 100,
            formation_id: 1,
            name: "Algo".into(),
            code: "CS101".into(),
            semester: Semester::One,
        });
        for id in 1..=3 {
            store.add_student(Student { id, group_id: 1 });
            store.add_enrollment(Enrollment {
                student_id: id,
                module_id: 100,
            });
        }
        store.add_room(Room::new(1, RoomKind::Standard, 30));
        store.add_professor(Professor::new(1, 10));
        store.add_exam_period(ExamPeriod::new(
            Semester::One,
            "2024-2025",
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
        ));
        store
    }

    #[test]
    fn test_generate_places_single_unit() {
        let mut store = tiny_store();
        let request = GenerateRequest::new(Semester::One, "2024-2025");
        let outcome = Generator::with_seed(42).generate(&mut store, &request);

        assert!(outcome.success);
        assert_eq!(outcome.stats.placed, 1);
        assert_eq!(outcome.stats.failed, 0);
        assert_eq!(store.all_exams().len(), 1);
        assert_eq!(store.all_exams()[0].student_count, 3);
    }

    #[test]
    fn test_invalid_semester_number_rejected() {
        let err = GenerateRequest::for_semester_number(3, "2024-2025").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidSemester(3)));
        assert!(GenerateRequest::for_semester_number(2, "2024-2025").is_ok());
    }

    #[test]
    fn test_nothing_to_schedule_outcome() {
        let mut store = tiny_store();
        let request = GenerateRequest::new(Semester::Two, "2024-2025");
        let outcome = Generator::with_seed(42).generate(&mut store, &request);

        assert!(outcome.success);
        assert_eq!(outcome.stats.total, 0);
        assert_eq!(outcome.stats.success_rate, 100.0);
        assert!(store.all_exams().is_empty());
    }

    #[test]
    fn test_missing_period_uses_year_default() {
        // No configured period; the mid-January window is derived from
        // the year label.
        let mut store = tiny_store_without_period();
        let request = GenerateRequest::new(Semester::One, "2024-2025");
        let outcome = Generator::with_seed(1).generate(&mut store, &request);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.stats.placed, 1);
    }

    fn tiny_store_without_period() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_formation(Formation {
            id: 1,
            department_id: 10,
            name: "CS".into(),
        });
        store.add_group(Group {
            id: 1,
            formation_id: 1,
            name: "G1".into(),
        });
        store.add_module(Module {
            id: 100,
            formation_id: 1,
            name: "Algo".into(),
            code: "CS101".into(),
            semester: Semester::One,
        });
        store.add_student(Student { id: 1, group_id: 1 });
        store.add_enrollment(Enrollment {
            student_id: 1,
            module_id: 100,
        });
        store.add_room(Room::new(1, RoomKind::Standard, 30));
        store.add_professor(Professor::new(1, 10));
        store
    }

    #[test]
    fn test_unparseable_year_without_period_fails() {
        let mut store = tiny_store_without_period();
        let request = GenerateRequest::new(Semester::One, "not-a-year");
        let outcome = Generator::with_seed(1).generate(&mut store, &request);
        assert!(!outcome.success);
        assert!(outcome.message.contains("no exam period"));
        assert!(store.all_exams().is_empty());
    }

    #[test]
    fn test_invalid_catalog_fails_before_placement() {
        let mut store = tiny_store();
        store.add_room(Room::new(99, RoomKind::Standard, 0));
        let request = GenerateRequest::new(Semester::One, "2024-2025");
        let outcome = Generator::with_seed(1).generate(&mut store, &request);
        assert!(!outcome.success);
        assert!(store.all_exams().is_empty());
    }

    #[test]
    fn test_clear_requires_scope() {
        let mut store = tiny_store();
        let err = clear(&mut store, &ClearScope::default()).unwrap_err();
        assert!(matches!(err, SchedulerError::EmptyScope));
    }

    #[test]
    fn test_clear_scoped_by_semester() {
        let mut store = tiny_store();
        let request = GenerateRequest::new(Semester::One, "2024-2025");
        Generator::with_seed(1).generate(&mut store, &request);
        assert_eq!(store.all_exams().len(), 1);

        let scope = ClearScope {
            semester: Some(Semester::One),
            ..ClearScope::default()
        };
        assert_eq!(clear(&mut store, &scope).unwrap(), 1);
        assert!(store.all_exams().is_empty());
        assert!(store.supervisions().unwrap().is_empty());
    }
}
