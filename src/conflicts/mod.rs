//! Post-generation timetable verification.
//!
//! The generator refuses to create violations, but exams can also be
//! edited by hand or imported, so every constraint is re-checked here
//! against the persisted rows rather than against generator state.
//! Detection is read-only and reports findings; it never mutates the
//! timetable.
//!
//! # Checks
//!
//! Same-day and same-slot student conflicts, daily supervision
//! overloads, room capacity excesses, room double bookings, and the
//! supervision balance across professors.

mod report;

pub use report::{
    CapacityExcess, ConflictReport, ConflictSummary, DetailedReport, GroupDayConflict,
    GroupSlotConflict, Priority, ProfessorBalance, ProfessorOverload, Recommendation,
    RecommendationKind, RoomOverlap,
};

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    Exam, ExamId, GroupId, ModuleId, ProfessorId, Room, RoomId, StudentId, Supervision,
};
use crate::scheduler::MAX_DAILY_SUPERVISIONS;
use crate::store::{ExamFilter, ExamStore, StoreResult};

/// Read-only conflict detector over a persisted timetable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

/// Everything one verification pass reads from the store.
struct TermData {
    exams: Vec<Exam>,
    supervisions: Vec<Supervision>,
    rooms: HashMap<RoomId, Room>,
    professor_ids: Vec<ProfessorId>,
    by_module: HashMap<ModuleId, Vec<StudentId>>,
    group_of: HashMap<StudentId, GroupId>,
}

impl TermData {
    fn load<S: ExamStore>(store: &S, filter: &ExamFilter) -> StoreResult<Self> {
        let exams = store.exams(filter)?;
        let in_scope: HashSet<ExamId> = exams.iter().map(|e| e.id).collect();
        let supervisions = store
            .supervisions()?
            .into_iter()
            .filter(|s| in_scope.contains(&s.exam_id))
            .collect();

        let rooms = store.rooms()?.into_iter().map(|r| (r.id, r)).collect();
        let mut professor_ids: Vec<ProfessorId> =
            store.professors()?.into_iter().map(|p| p.id).collect();
        professor_ids.sort_unstable();

        let mut by_module: HashMap<ModuleId, Vec<StudentId>> = HashMap::new();
        for e in store.enrollments()? {
            by_module.entry(e.module_id).or_default().push(e.student_id);
        }
        let group_of = store
            .students()?
            .into_iter()
            .map(|s| (s.id, s.group_id))
            .collect();

        Ok(Self {
            exams,
            supervisions,
            rooms,
            professor_ids,
            by_module,
            group_of,
        })
    }

    /// Students of the exam's group enrolled in the exam's module.
    fn roster(&self, exam: &Exam) -> Vec<StudentId> {
        self.by_module
            .get(&exam.module_id)
            .map(|students| {
                students
                    .iter()
                    .filter(|id| self.group_of.get(id) == Some(&exam.group_id))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Students appearing in at least two of the given rosters, ascending.
fn shared_students(data: &TermData, exams: &[&Exam]) -> Vec<StudentId> {
    let mut counts: HashMap<StudentId, u32> = HashMap::new();
    for exam in exams {
        for student in data.roster(exam) {
            *counts.entry(student).or_insert(0) += 1;
        }
    }
    let mut shared: Vec<StudentId> = counts
        .into_iter()
        .filter(|(_, n)| *n >= 2)
        .map(|(id, _)| id)
        .collect();
    shared.sort_unstable();
    shared
}

impl ConflictDetector {
    /// Creates a detector.
    pub fn new() -> Self {
        Self
    }

    /// Groups with more than one exam on a single day.
    pub fn student_day_conflicts<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<Vec<GroupDayConflict>> {
        let data = TermData::load(store, filter)?;
        Ok(Self::day_conflicts(&data))
    }

    fn day_conflicts(data: &TermData) -> Vec<GroupDayConflict> {
        let mut by_key: BTreeMap<(GroupId, NaiveDate), Vec<&Exam>> = BTreeMap::new();
        for exam in &data.exams {
            by_key.entry((exam.group_id, exam.day())).or_default().push(exam);
        }

        let mut out = Vec::new();
        for ((group_id, day), exams) in by_key {
            if exams.len() < 2 {
                continue;
            }
            let mut exam_ids: Vec<ExamId> = exams.iter().map(|e| e.id).collect();
            exam_ids.sort_unstable();
            out.push(GroupDayConflict {
                group_id,
                day,
                student_ids: shared_students(data, &exams),
                exam_ids,
            });
        }
        out
    }

    /// Groups with more than one exam starting at the same time.
    pub fn same_slot_conflicts<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<Vec<GroupSlotConflict>> {
        let data = TermData::load(store, filter)?;
        Ok(Self::slot_conflicts(&data))
    }

    fn slot_conflicts(data: &TermData) -> Vec<GroupSlotConflict> {
        let mut by_key: BTreeMap<(GroupId, NaiveDateTime), Vec<&Exam>> = BTreeMap::new();
        for exam in &data.exams {
            by_key
                .entry((exam.group_id, exam.starts_at))
                .or_default()
                .push(exam);
        }

        let mut out = Vec::new();
        for ((group_id, starts_at), exams) in by_key {
            if exams.len() < 2 {
                continue;
            }
            let mut exam_ids: Vec<ExamId> = exams.iter().map(|e| e.id).collect();
            exam_ids.sort_unstable();
            out.push(GroupSlotConflict {
                group_id,
                starts_at,
                student_ids: shared_students(data, &exams),
                exam_ids,
            });
        }
        out
    }

    /// Professors supervising more than the daily cap.
    pub fn professor_overloads<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<Vec<ProfessorOverload>> {
        let data = TermData::load(store, filter)?;
        Ok(Self::overloads(&data))
    }

    fn overloads(data: &TermData) -> Vec<ProfessorOverload> {
        let day_of: HashMap<ExamId, NaiveDate> =
            data.exams.iter().map(|e| (e.id, e.day())).collect();

        let mut by_key: BTreeMap<(ProfessorId, NaiveDate), Vec<ExamId>> = BTreeMap::new();
        for sup in &data.supervisions {
            if let Some(&day) = day_of.get(&sup.exam_id) {
                by_key
                    .entry((sup.professor_id, day))
                    .or_default()
                    .push(sup.exam_id);
            }
        }

        let mut out = Vec::new();
        for ((professor_id, day), mut exam_ids) in by_key {
            if exam_ids.len() as u32 <= MAX_DAILY_SUPERVISIONS {
                continue;
            }
            exam_ids.sort_unstable();
            out.push(ProfessorOverload {
                professor_id,
                day,
                exam_ids,
            });
        }
        out
    }

    /// Exams whose roster exceeds their room's capacity.
    pub fn capacity_excesses<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<Vec<CapacityExcess>> {
        let data = TermData::load(store, filter)?;
        Ok(Self::excesses(&data))
    }

    fn excesses(data: &TermData) -> Vec<CapacityExcess> {
        let mut out: Vec<CapacityExcess> = data
            .exams
            .iter()
            .filter_map(|exam| {
                let room = data.rooms.get(&exam.room_id)?;
                if exam.student_count > room.capacity {
                    Some(CapacityExcess {
                        exam_id: exam.id,
                        room_id: room.id,
                        capacity: room.capacity,
                        student_count: exam.student_count,
                        excess: exam.student_count - room.capacity,
                    })
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable_by_key(|c| c.exam_id);
        out
    }

    /// Rooms hosting more than one exam at the same start time.
    pub fn room_overlaps<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<Vec<RoomOverlap>> {
        let data = TermData::load(store, filter)?;
        Ok(Self::double_bookings(&data))
    }

    fn double_bookings(data: &TermData) -> Vec<RoomOverlap> {
        let mut by_key: BTreeMap<(RoomId, NaiveDateTime), Vec<ExamId>> = BTreeMap::new();
        for exam in &data.exams {
            by_key
                .entry((exam.room_id, exam.starts_at))
                .or_default()
                .push(exam.id);
        }

        let mut out = Vec::new();
        for ((room_id, starts_at), mut ids) in by_key {
            ids.sort_unstable();
            for pair in ids.windows(2) {
                out.push(RoomOverlap {
                    room_id,
                    starts_at,
                    first_exam_id: pair[0],
                    second_exam_id: pair[1],
                });
            }
        }
        out
    }

    /// All hard-constraint findings in one pass.
    pub fn full_report<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<ConflictReport> {
        let data = TermData::load(store, filter)?;
        Ok(ConflictReport {
            students: Self::day_conflicts(&data),
            professors: Self::overloads(&data),
            rooms: Self::excesses(&data),
            overlaps: Self::double_bookings(&data),
        })
    }

    /// Per-family conflict counts.
    pub fn summary<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<ConflictSummary> {
        let data = TermData::load(store, filter)?;
        Ok(Self::summarize(&data))
    }

    fn summarize(data: &TermData) -> ConflictSummary {
        let students = Self::day_conflicts(data).len();
        let same_slot = Self::slot_conflicts(data).len();
        let professors = Self::overloads(data).len();
        let capacity = Self::excesses(data).len();
        let overlaps = Self::double_bookings(data).len();
        ConflictSummary {
            student_day_conflicts: students,
            same_slot_conflicts: same_slot,
            professor_overloads: professors,
            capacity_excesses: capacity,
            room_overlaps: overlaps,
            has_conflicts: students + same_slot + professors + capacity + overlaps > 0,
        }
    }

    /// Supervision spread across all professors, idle ones included.
    pub fn professor_balance<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<ProfessorBalance> {
        let data = TermData::load(store, filter)?;
        Ok(Self::balance(&data))
    }

    fn balance(data: &TermData) -> ProfessorBalance {
        let mut by_professor: BTreeMap<ProfessorId, u32> =
            data.professor_ids.iter().map(|&id| (id, 0)).collect();
        for sup in &data.supervisions {
            *by_professor.entry(sup.professor_id).or_insert(0) += 1;
        }

        let min = by_professor.values().copied().min().unwrap_or(0);
        let max = by_professor.values().copied().max().unwrap_or(0);
        let avg = if by_professor.is_empty() {
            0.0
        } else {
            by_professor.values().sum::<u32>() as f64 / by_professor.len() as f64
        };
        let difference = max - min;
        ProfessorBalance {
            min,
            max,
            avg,
            difference,
            balanced: difference <= 2,
            by_professor,
        }
    }

    /// Summary, findings, balance, and prioritized recommendations.
    pub fn detailed_report<S: ExamStore>(
        &self,
        store: &S,
        filter: &ExamFilter,
    ) -> StoreResult<DetailedReport> {
        let data = TermData::load(store, filter)?;
        let summary = Self::summarize(&data);
        let report = ConflictReport {
            students: Self::day_conflicts(&data),
            professors: Self::overloads(&data),
            rooms: Self::excesses(&data),
            overlaps: Self::double_bookings(&data),
        };
        let same_slot = Self::slot_conflicts(&data);
        let balance = Self::balance(&data);
        let recommendations = Self::recommend(&summary, &balance);
        Ok(DetailedReport {
            summary,
            report,
            same_slot,
            balance,
            recommendations,
        })
    }

    fn recommend(summary: &ConflictSummary, balance: &ProfessorBalance) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if summary.same_slot_conflicts > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::SameSlotStudents,
                priority: Priority::Critical,
                message: format!(
                    "{} group(s) have exams starting at the same time",
                    summary.same_slot_conflicts
                ),
                action: "move one exam of each collision to a free slot".into(),
            });
        }
        if summary.student_day_conflicts > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::StudentDayLoad,
                priority: Priority::High,
                message: format!(
                    "{} group(s) sit more than one exam in a day",
                    summary.student_day_conflicts
                ),
                action: "spread the affected exams over more days".into(),
            });
        }
        if summary.capacity_excesses > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::RoomCapacity,
                priority: Priority::High,
                message: format!(
                    "{} exam(s) exceed their room's capacity",
                    summary.capacity_excesses
                ),
                action: "reassign the affected exams to larger rooms".into(),
            });
        }
        if summary.professor_overloads > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::ProfessorOverload,
                priority: Priority::Medium,
                message: format!(
                    "{} professor-day(s) exceed {} supervisions",
                    summary.professor_overloads, MAX_DAILY_SUPERVISIONS
                ),
                action: "redistribute supervisions to less loaded professors".into(),
            });
        }
        if !balance.balanced && balance.max > 0 {
            out.push(Recommendation {
                kind: RecommendationKind::SupervisionImbalance,
                priority: Priority::Low,
                message: format!(
                    "supervision spread of {} between the most and least loaded professors",
                    balance.difference
                ),
                action: "shift supervisions from the most to the least loaded professors".into(),
            });
        }
        out.sort_by_key(|r| r.priority);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Enrollment, Formation, Group, Module, NewExam, Professor, Room, RoomKind, Semester,
        Student, DEFAULT_EXAM_DURATION_MINUTES,
    };
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// One group of two students enrolled in two modules, two rooms,
    /// two professors.
    fn seeded_store() -> MemoryStore {
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
        for id in [100, 101] {
            store.add_module(Module {
                id,
                formation_id: 1,
                name: format!("M{id}"),
                code: format!("CS{id}"),
                semester: Semester::One,
            });
        }
        for id in [1, 2] {
            store.add_student(Student { id, group_id: 1 });
            store.add_enrollment(Enrollment {
                student_id: id,
                module_id: 100,
            });
            store.add_enrollment(Enrollment {
                student_id: id,
                module_id: 101,
            });
        }
        store.add_room(Room::new(1, RoomKind::Standard, 30));
        store.add_room(Room::new(2, RoomKind::Standard, 30));
        store.add_professor(Professor::new(1, 10));
        store.add_professor(Professor::new(2, 10));
        store
    }

    fn new_exam(module_id: u32, room_id: u32, professor_id: u32, starts_at: NaiveDateTime) -> NewExam {
        NewExam {
            module_id,
            professor_id,
            room_id,
            group_id: 1,
            starts_at,
            duration_minutes: DEFAULT_EXAM_DURATION_MINUTES,
            student_count: 2,
            semester: Semester::One,
            academic_year: "2024-2025".into(),
        }
    }

    #[test]
    fn test_clean_timetable_reports_nothing() {
        let mut store = seeded_store();
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 2, 2, at(21, 8)),
            ])
            .unwrap();

        let detector = ConflictDetector::new();
        let report = detector
            .full_report(&store, &ExamFilter::default())
            .unwrap();
        assert!(report.is_clean(), "{report:?}");

        let detailed = detector
            .detailed_report(&store, &ExamFilter::default())
            .unwrap();
        assert!(!detailed.summary.has_conflicts);
        assert!(detailed.recommendations.is_empty());
    }

    #[test]
    fn test_same_day_conflict_lists_shared_students() {
        let mut store = seeded_store();
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 2, 2, at(20, 10)),
            ])
            .unwrap();

        let found = ConflictDetector::new()
            .student_day_conflicts(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].group_id, 1);
        assert_eq!(found[0].exam_ids, vec![1, 2]);
        assert_eq!(found[0].student_ids, vec![1, 2]);
    }

    #[test]
    fn test_same_slot_is_critical() {
        let mut store = seeded_store();
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 2, 2, at(20, 8)),
            ])
            .unwrap();

        let detector = ConflictDetector::new();
        let slots = detector
            .same_slot_conflicts(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(slots.len(), 1);

        let detailed = detector
            .detailed_report(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(detailed.recommendations[0].priority, Priority::Critical);
    }

    #[test]
    fn test_professor_overload_beyond_daily_cap() {
        let mut store = seeded_store();
        // Four supervisions for professor 1 on one day. Extra modules
        // keep day conflicts out of the way of this check.
        for id in [102, 103] {
            store.add_module(Module {
                id,
                formation_id: 1,
                name: format!("M{id}"),
                code: format!("CS{id}"),
                semester: Semester::One,
            });
        }
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 1, 1, at(20, 10)),
                new_exam(102, 1, 1, at(20, 12)),
                new_exam(103, 1, 1, at(20, 14)),
            ])
            .unwrap();

        let found = ConflictDetector::new()
            .professor_overloads(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].professor_id, 1);
        assert_eq!(found[0].exam_ids.len(), 4);
    }

    #[test]
    fn test_capacity_excess_reported() {
        let mut store = seeded_store();
        let mut oversized = new_exam(100, 1, 1, at(20, 8));
        oversized.student_count = 45;
        store.insert_planned(&[oversized]).unwrap();

        let found = ConflictDetector::new()
            .capacity_excesses(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].excess, 15);
    }

    #[test]
    fn test_room_double_booking() {
        let mut store = seeded_store();
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 1, 2, at(20, 8)),
            ])
            .unwrap();

        let found = ConflictDetector::new()
            .room_overlaps(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].first_exam_id, found[0].second_exam_id), (1, 2));
    }

    #[test]
    fn test_balance_counts_idle_professors() {
        let mut store = seeded_store();
        store
            .insert_planned(&[
                new_exam(100, 1, 1, at(20, 8)),
                new_exam(101, 2, 1, at(21, 8)),
            ])
            .unwrap();

        let balance = ConflictDetector::new()
            .professor_balance(&store, &ExamFilter::default())
            .unwrap();
        assert_eq!(balance.min, 0);
        assert_eq!(balance.max, 2);
        assert_eq!(balance.by_professor.get(&2), Some(&0));
        assert!(balance.balanced);
    }
}
