//! Persistence abstraction for exam schedules.
//!
//! `ExamStore` defines every read and write the scheduler and the
//! conflict detector perform, so backends can be swapped: the bundled
//! `MemoryStore` for tests and single-process deployments, a database
//! adapter elsewhere.
//!
//! # Write Semantics
//!
//! `insert_planned` is atomic: either every exam in the batch lands
//! together with its supervision row, or nothing is persisted and an
//! error is returned. A generation run therefore never leaves a
//! half-written schedule behind.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    DepartmentId, Enrollment, Exam, ExamId, ExamPeriod, ExamStatus, Formation, Group, Module,
    NewExam, Professor, Room, Semester, Student, Supervision,
};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write would violate referential integrity.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The backend itself failed.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Read filter for persisted exams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamFilter {
    /// Restrict to one semester.
    pub semester: Option<Semester>,
    /// Restrict to one academic year.
    pub academic_year: Option<String>,
    /// Restrict to exams of modules owned by one department.
    pub department: Option<DepartmentId>,
    /// Restrict to one lifecycle status.
    pub status: Option<ExamStatus>,
}

impl ExamFilter {
    /// Filter matching every planned exam of a term.
    pub fn planned_term(semester: Semester, academic_year: impl Into<String>) -> Self {
        Self {
            semester: Some(semester),
            academic_year: Some(academic_year.into()),
            department: None,
            status: Some(ExamStatus::Planned),
        }
    }
}

/// Deletion scope for `delete_exams`.
///
/// Every field is optional; the fields that are set are ANDed. The
/// caller-facing `clear` operation rejects an all-`None` scope, the
/// store itself treats it as "match everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClearScope {
    /// Restrict to exams of modules owned by one department.
    pub department: Option<DepartmentId>,
    /// Restrict to one semester.
    pub semester: Option<Semester>,
    /// Restrict to one academic year.
    pub academic_year: Option<String>,
}

impl ClearScope {
    /// Whether no filter is set at all.
    pub fn is_empty(&self) -> bool {
        self.department.is_none() && self.semester.is_none() && self.academic_year.is_none()
    }
}

/// Storage backend for catalog reads and schedule writes.
///
/// Synchronous by design: the scheduler is a single-threaded batch job
/// and callers are expected to serialize concurrent runs externally.
pub trait ExamStore {
    /// All rooms, including unavailable ones.
    fn rooms(&self) -> StoreResult<Vec<Room>>;

    /// All supervision-eligible professors.
    fn professors(&self) -> StoreResult<Vec<Professor>>;

    /// All formations.
    fn formations(&self) -> StoreResult<Vec<Formation>>;

    /// All groups.
    fn groups(&self) -> StoreResult<Vec<Group>>;

    /// All modules.
    fn modules(&self) -> StoreResult<Vec<Module>>;

    /// All students.
    fn students(&self) -> StoreResult<Vec<Student>>;

    /// All enrollments.
    fn enrollments(&self) -> StoreResult<Vec<Enrollment>>;

    /// All configured exam periods.
    fn exam_periods(&self) -> StoreResult<Vec<ExamPeriod>>;

    /// Persisted exams matching the filter.
    fn exams(&self, filter: &ExamFilter) -> StoreResult<Vec<Exam>>;

    /// All supervision links.
    fn supervisions(&self) -> StoreResult<Vec<Supervision>>;

    /// Atomically inserts a batch of planned exams and their primary
    /// supervision rows. Returns the assigned exam ids in batch order.
    fn insert_planned(&mut self, batch: &[NewExam]) -> StoreResult<Vec<ExamId>>;

    /// Deletes exams matching the scope, cascading to their supervision
    /// rows. Returns the number of exams removed.
    fn delete_exams(&mut self, scope: &ClearScope) -> StoreResult<usize>;
}
