//! Exam timetabling domain models.
//!
//! Provides the core data types for representing an exam session:
//! the catalog read side (students, groups, modules, enrollments,
//! professors, rooms, exam periods) and the scheduled write side
//! (exams, supervisions, placements).
//!
//! # Identifier Model
//!
//! All entities carry integer identifiers matching the upstream
//! registrar database keys. Identifiers are opaque: nothing is derived
//! from their numeric value.

mod catalog;
mod exam;
mod resource;
mod slot;

pub use catalog::{Catalog, Enrollment, ExamUnit, Formation, Group, Module, Student};
pub use exam::{
    Exam, ExamPeriod, ExamStatus, NewExam, Placement, Semester, Supervision, SupervisionRole,
    DEFAULT_EXAM_DURATION_MINUTES,
};
pub use resource::{Professor, Room, RoomKind};
pub use slot::{Slot, SLOT_HOURS};

/// Student identifier.
pub type StudentId = u32;
/// Group (cohort) identifier.
pub type GroupId = u32;
/// Formation (degree program) identifier.
pub type FormationId = u32;
/// Module (course) identifier.
pub type ModuleId = u32;
/// Department identifier.
pub type DepartmentId = u32;
/// Professor identifier.
pub type ProfessorId = u32;
/// Room identifier.
pub type RoomId = u32;
/// Exam identifier, assigned by the store on insertion.
pub type ExamId = u64;
