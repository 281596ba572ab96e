//! Exam, supervision, and exam period models.
//!
//! An `Exam` is the central scheduled entity: one (module, group) unit
//! sat at one slot in one room under one primary professor. Exams are
//! created only by the generator; downstream validation workflows
//! advance the status field.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DepartmentId, ExamId, GroupId, ModuleId, ProfessorId, RoomId, Slot, SLOT_HOURS};

/// Default sitting length in minutes.
pub const DEFAULT_EXAM_DURATION_MINUTES: u32 = 90;

/// Academic semester tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    /// First semester (winter session).
    One,
    /// Second semester (summer session).
    Two,
}

impl Semester {
    /// Parses an external semester number. Anything but 1 or 2 is rejected.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// The external semester number.
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Lifecycle status of a scheduled exam.
///
/// The generator only ever writes `Planned`; the later states are set
/// by the out-of-process validation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamStatus {
    /// Placed by the generator, awaiting review.
    Planned,
    /// Validated by the department head.
    Validated,
    /// Approved by the vice-dean.
    Approved,
}

/// Per-(semester, academic year) window bounding when exams may sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamPeriod {
    /// Semester this period belongs to.
    pub semester: Semester,
    /// Academic year label, e.g. "2024-2025".
    pub academic_year: String,
    /// First allowed day (inclusive).
    pub start: NaiveDate,
    /// Last allowed day (inclusive).
    pub end: NaiveDate,
}

impl ExamPeriod {
    /// Creates a period.
    pub fn new(
        semester: Semester,
        academic_year: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            semester,
            academic_year: academic_year.into(),
            start,
            end,
        }
    }

    /// Fallback period when none is configured for a term.
    ///
    /// Derived from the academic year label: semester 1 sits mid-January
    /// to mid-February of the second calendar year, semester 2 the first
    /// month of summer. Returns `None` if the label does not end in a
    /// parseable year.
    pub fn default_for(semester: Semester, academic_year: &str) -> Option<Self> {
        let year: i32 = academic_year.split('-').nth(1)?.trim().parse().ok()?;
        let (start, end) = match semester {
            Semester::One => (
                NaiveDate::from_ymd_opt(year, 1, 15)?,
                NaiveDate::from_ymd_opt(year, 2, 15)?,
            ),
            Semester::Two => (
                NaiveDate::from_ymd_opt(year, 6, 1)?,
                NaiveDate::from_ymd_opt(year, 7, 1)?,
            ),
        };
        Some(Self::new(semester, academic_year, start, end))
    }

    /// All candidate slots in this period: Monday through Saturday,
    /// six sittings per day, in calendar order.
    pub fn slots(&self) -> Vec<Slot> {
        let mut out = Vec::new();
        let mut day = self.start;
        while day <= self.end {
            if day.weekday() != Weekday::Sun {
                for &hour in &SLOT_HOURS {
                    out.push(Slot::new(day, hour));
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        out
    }

    /// Number of usable (non-Sunday) days in the period.
    pub fn day_count(&self) -> usize {
        let mut n = 0;
        let mut day = self.start;
        while day <= self.end {
            if day.weekday() != Weekday::Sun {
                n += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        n
    }
}

/// A persisted exam assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    /// Store-assigned identifier.
    pub id: ExamId,
    /// Examined module.
    pub module_id: ModuleId,
    /// Primary supervising professor.
    pub professor_id: ProfessorId,
    /// Assigned room.
    pub room_id: RoomId,
    /// Examined group.
    pub group_id: GroupId,
    /// Sitting start timestamp.
    pub starts_at: NaiveDateTime,
    /// Sitting length in minutes.
    pub duration_minutes: u32,
    /// Enrolled head count at placement time.
    pub student_count: u32,
    /// Semester tag.
    pub semester: Semester,
    /// Academic year label.
    pub academic_year: String,
    /// Lifecycle status.
    pub status: ExamStatus,
}

impl Exam {
    /// The slot this exam occupies.
    pub fn slot(&self) -> Slot {
        Slot::from_datetime(self.starts_at)
    }

    /// The calendar day this exam sits on.
    pub fn day(&self) -> NaiveDate {
        self.starts_at.date()
    }
}

/// An exam row awaiting insertion (no identifier yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExam {
    /// Examined module.
    pub module_id: ModuleId,
    /// Primary supervising professor.
    pub professor_id: ProfessorId,
    /// Assigned room.
    pub room_id: RoomId,
    /// Examined group.
    pub group_id: GroupId,
    /// Sitting start timestamp.
    pub starts_at: NaiveDateTime,
    /// Sitting length in minutes.
    pub duration_minutes: u32,
    /// Enrolled head count at placement time.
    pub student_count: u32,
    /// Semester tag.
    pub semester: Semester,
    /// Academic year label.
    pub academic_year: String,
}

/// Supervision link between an exam and a professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervision {
    /// Supervised exam.
    pub exam_id: ExamId,
    /// Supervising professor.
    pub professor_id: ProfessorId,
    /// Supervision role.
    pub role: SupervisionRole,
}

/// Role of a supervising professor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupervisionRole {
    /// The professor selected at placement time.
    Primary,
}

/// A successful placement produced by the slot finder.
///
/// Placements accumulate in the recorder batch during a run and become
/// `NewExam` rows at flush time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Examined module.
    pub module_id: ModuleId,
    /// Examined group.
    pub group_id: GroupId,
    /// Home department of the module.
    pub department_id: DepartmentId,
    /// Chosen slot.
    pub slot: Slot,
    /// Chosen room.
    pub room_id: RoomId,
    /// Chosen professor.
    pub professor_id: ProfessorId,
    /// Enrolled head count.
    pub student_count: u32,
}
