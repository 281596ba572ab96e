//! Placement batch accumulation and flush.
//!
//! Successful placements are committed to the tracker immediately (so
//! the rest of the pass sees the occupancy) but persisted only once at
//! the end of the run, as a single atomic batch.

use log::{debug, info};

use crate::models::{
    ExamId, NewExam, Placement, Semester, DEFAULT_EXAM_DURATION_MINUTES,
};
use crate::store::{ExamStore, StoreResult};
use crate::tracker::AvailabilityTracker;

/// Accumulates placements during a run and flushes them at the end.
#[derive(Debug, Default)]
pub struct AssignmentRecorder {
    batch: Vec<Placement>,
}

impl AssignmentRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batched placements.
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// The batched placements, in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.batch
    }

    /// Records a placement: commits it to the tracker and batches it
    /// for the end-of-run flush.
    pub fn record(&mut self, placement: Placement, tracker: &mut AvailabilityTracker) {
        tracker.commit(&placement);
        debug!(
            "placed module {} group {} at {} in room {} under professor {}",
            placement.module_id,
            placement.group_id,
            placement.slot.starts_at(),
            placement.room_id,
            placement.professor_id
        );
        self.batch.push(placement);
    }

    /// Persists the whole batch atomically.
    ///
    /// Each placement becomes one planned exam plus its primary
    /// supervision row. Either the full batch lands or nothing does.
    pub fn flush<S: ExamStore>(
        &self,
        store: &mut S,
        semester: Semester,
        academic_year: &str,
    ) -> StoreResult<Vec<ExamId>> {
        if self.batch.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<NewExam> = self
            .batch
            .iter()
            .map(|p| NewExam {
                module_id: p.module_id,
                professor_id: p.professor_id,
                room_id: p.room_id,
                group_id: p.group_id,
                starts_at: p.slot.starts_at(),
                duration_minutes: DEFAULT_EXAM_DURATION_MINUTES,
                student_count: p.student_count,
                semester,
                academic_year: academic_year.to_string(),
            })
            .collect();

        let ids = store.insert_planned(&rows)?;
        info!("persisted {} exams", ids.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExamStatus, Formation, Group, Module, Professor, Room, RoomKind, Slot,
    };
    use crate::store::{ExamFilter, MemoryStore};
    use chrono::NaiveDate;

    fn placement(group: u32, hour: u32) -> Placement {
        Placement {
            module_id: 100,
            group_id: group,
            department_id: 10,
            slot: Slot::new(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(), hour),
            room_id: 5,
            professor_id: 7,
            student_count: 25,
        }
    }

    fn store_with_refs() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_formation(Formation {
            id: 1,
            department_id: 10,
            name: "CS".into(),
        });
        for id in [1, 2] {
            store.add_group(Group {
                id,
                formation_id: 1,
                name: format!("G{id}"),
            });
        }
        store.add_module(Module {
            id: 100,
            formation_id: 1,
            name: "Algo".into(),
            code: "CS101".into(),
            semester: Semester::One,
        });
        store.add_room(Room::new(5, RoomKind::Standard, 40));
        store.add_professor(Professor::new(7, 10));
        store
    }

    #[test]
    fn test_record_commits_to_tracker() {
        let mut recorder = AssignmentRecorder::new();
        let mut tracker = AvailabilityTracker::new();

        recorder.record(placement(1, 8), &mut tracker);
        assert_eq!(recorder.len(), 1);
        assert!(tracker.is_group_busy(1, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()));
    }

    #[test]
    fn test_flush_writes_exams_and_supervisions() {
        let mut recorder = AssignmentRecorder::new();
        let mut tracker = AvailabilityTracker::new();
        recorder.record(placement(1, 8), &mut tracker);
        recorder.record(placement(2, 10), &mut tracker);

        let mut store = store_with_refs();
        let ids = recorder
            .flush(&mut store, Semester::One, "2024-2025")
            .unwrap();
        assert_eq!(ids.len(), 2);

        let exams = store.exams(&ExamFilter::default()).unwrap();
        assert_eq!(exams.len(), 2);
        assert!(exams.iter().all(|e| e.status == ExamStatus::Planned));
        assert!(exams
            .iter()
            .all(|e| e.duration_minutes == DEFAULT_EXAM_DURATION_MINUTES));
        assert_eq!(store.supervisions().unwrap().len(), 2);
    }

    #[test]
    fn test_flush_empty_batch_is_noop() {
        let recorder = AssignmentRecorder::new();
        let mut store = store_with_refs();
        let ids = recorder
            .flush(&mut store, Semester::One, "2024-2025")
            .unwrap();
        assert!(ids.is_empty());
        assert!(store.exams(&ExamFilter::default()).unwrap().is_empty());
    }
}
