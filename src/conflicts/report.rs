//! Conflict report types.
//!
//! Serializable findings produced by the detector, grouped per
//! constraint family, plus the prioritized recommendations derived
//! from them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{ExamId, GroupId, ProfessorId, RoomId, StudentId};

/// Two or more exams of one group on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDayConflict {
    /// Affected group.
    pub group_id: GroupId,
    /// Day carrying more than one exam.
    pub day: NaiveDate,
    /// Exams of the group that day, ascending by id.
    pub exam_ids: Vec<ExamId>,
    /// Students enrolled in at least two of those exams, ascending.
    pub student_ids: Vec<StudentId>,
}

/// Two or more exams of one group starting at the same time.
///
/// Strictly worse than a same-day conflict: the shared students
/// cannot sit both papers at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSlotConflict {
    /// Affected group.
    pub group_id: GroupId,
    /// Common start time.
    pub starts_at: NaiveDateTime,
    /// Colliding exams, ascending by id.
    pub exam_ids: Vec<ExamId>,
    /// Students enrolled in at least two of those exams, ascending.
    pub student_ids: Vec<StudentId>,
}

/// A professor supervising more than the daily cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorOverload {
    /// Overloaded professor.
    pub professor_id: ProfessorId,
    /// Overloaded day.
    pub day: NaiveDate,
    /// Supervised exams that day, ascending by id.
    pub exam_ids: Vec<ExamId>,
}

/// An exam whose roster exceeds its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityExcess {
    /// Offending exam.
    pub exam_id: ExamId,
    /// Assigned room.
    pub room_id: RoomId,
    /// Seats available.
    pub capacity: u32,
    /// Students to seat.
    pub student_count: u32,
    /// Students without a seat.
    pub excess: u32,
}

/// Two exams booked into one room at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOverlap {
    /// Double-booked room.
    pub room_id: RoomId,
    /// Common start time.
    pub starts_at: NaiveDateTime,
    /// Lower exam id of the pair.
    pub first_exam_id: ExamId,
    /// Higher exam id of the pair.
    pub second_exam_id: ExamId,
}

/// All hard-constraint findings for one term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Same-day student conflicts.
    pub students: Vec<GroupDayConflict>,
    /// Daily supervision overloads.
    pub professors: Vec<ProfessorOverload>,
    /// Capacity excesses.
    pub rooms: Vec<CapacityExcess>,
    /// Room double bookings.
    pub overlaps: Vec<RoomOverlap>,
}

impl ConflictReport {
    /// Total number of findings across all families.
    pub fn total(&self) -> usize {
        self.students.len() + self.professors.len() + self.rooms.len() + self.overlaps.len()
    }

    /// Whether the timetable is free of hard-constraint violations.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// Per-family conflict counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    /// Number of same-day student conflicts.
    pub student_day_conflicts: usize,
    /// Number of same-slot student conflicts.
    pub same_slot_conflicts: usize,
    /// Number of supervision overloads.
    pub professor_overloads: usize,
    /// Number of capacity excesses.
    pub capacity_excesses: usize,
    /// Number of room double bookings.
    pub room_overlaps: usize,
    /// Whether any finding exists.
    pub has_conflicts: bool,
}

/// Distribution of supervision duties across professors.
///
/// Includes professors with zero assignments; an even spread is part
/// of the fairness picture even when nobody is overloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorBalance {
    /// Fewest supervisions of any professor.
    pub min: u32,
    /// Most supervisions of any professor.
    pub max: u32,
    /// Mean supervisions per professor.
    pub avg: f64,
    /// `max - min`.
    pub difference: u32,
    /// Whether the spread stays within two supervisions.
    pub balanced: bool,
    /// Supervision count per professor.
    pub by_professor: BTreeMap<ProfessorId, u32>,
}

/// Urgency of a recommendation.
///
/// Declared most urgent first so the natural ordering sorts critical
/// findings to the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Timetable unusable as is.
    Critical,
    /// Breaks a hard constraint.
    High,
    /// Breaks a soft limit.
    Medium,
    /// Quality-of-life improvement.
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(label)
    }
}

/// Which constraint family a recommendation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    /// Students double-booked at one start time.
    SameSlotStudents,
    /// Students with several exams in one day.
    StudentDayLoad,
    /// Rosters larger than their rooms.
    RoomCapacity,
    /// Professors over the daily supervision cap.
    ProfessorOverload,
    /// Uneven supervision spread.
    SupervisionImbalance,
}

/// One actionable remediation hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Targeted constraint family.
    pub kind: RecommendationKind,
    /// Urgency.
    pub priority: Priority,
    /// What was found.
    pub message: String,
    /// What to do about it.
    pub action: String,
}

/// Full verification output: counts, findings, balance, and hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    /// Per-family counts.
    pub summary: ConflictSummary,
    /// Hard-constraint findings.
    pub report: ConflictReport,
    /// Same-slot student conflicts.
    pub same_slot: Vec<GroupSlotConflict>,
    /// Supervision distribution.
    pub balance: ProfessorBalance,
    /// Remediation hints, most urgent first.
    pub recommendations: Vec<Recommendation>,
}
