//! In-run availability state.
//!
//! Tracks, for the duration of one generation run, which groups, rooms,
//! and professors are already committed. Seeded from persisted exams
//! before placement starts, then updated by every successful placement
//! so later units see the occupancy earlier units created.
//!
//! # Granularity
//!
//! Group occupancy is per day (the "one exam per day" rule); professor
//! and room occupancy are per exact slot; professor load is additionally
//! counted per day to cap daily supervisions.
//!
//! Absent keys mean free / zero load. The tracker is owned by a single
//! generator invocation; there is no interior synchronization.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::models::{Exam, GroupId, Placement, ProfessorId, RoomId, Slot};

/// Mutable occupancy state for one generation run.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTracker {
    /// Groups already sitting an exam on a given day.
    busy_groups: HashMap<NaiveDate, HashSet<GroupId>>,
    /// Professors supervising at a given slot.
    busy_professors: HashMap<Slot, HashSet<ProfessorId>>,
    /// Rooms occupied at a given slot.
    busy_rooms: HashMap<Slot, HashSet<RoomId>>,
    /// Supervisions per professor per day.
    daily_load: HashMap<(ProfessorId, NaiveDate), u32>,
}

impl AvailabilityTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds occupancy from already-persisted exams, so an incremental
    /// run never collides with what an earlier run placed.
    pub fn seed(&mut self, exams: &[Exam]) {
        for exam in exams {
            let slot = exam.slot();
            self.busy_groups
                .entry(slot.day)
                .or_default()
                .insert(exam.group_id);
            self.busy_professors
                .entry(slot)
                .or_default()
                .insert(exam.professor_id);
            self.busy_rooms.entry(slot).or_default().insert(exam.room_id);
            *self
                .daily_load
                .entry((exam.professor_id, slot.day))
                .or_insert(0) += 1;
        }
    }

    /// Whether the group already sits an exam that day.
    pub fn is_group_busy(&self, group_id: GroupId, day: NaiveDate) -> bool {
        self.busy_groups
            .get(&day)
            .is_some_and(|groups| groups.contains(&group_id))
    }

    /// Whether the professor already supervises at that exact slot.
    pub fn is_professor_busy_at(&self, professor_id: ProfessorId, slot: Slot) -> bool {
        self.busy_professors
            .get(&slot)
            .is_some_and(|profs| profs.contains(&professor_id))
    }

    /// Supervisions already assigned to the professor on that day.
    pub fn professor_daily_load(&self, professor_id: ProfessorId, day: NaiveDate) -> u32 {
        self.daily_load
            .get(&(professor_id, day))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the room is already occupied at that exact slot.
    pub fn is_room_busy_at(&self, room_id: RoomId, slot: Slot) -> bool {
        self.busy_rooms
            .get(&slot)
            .is_some_and(|rooms| rooms.contains(&room_id))
    }

    /// Commits a placement: updates all four occupancy structures so
    /// subsequent queries in the same run see it.
    pub fn commit(&mut self, placement: &Placement) {
        let slot = placement.slot;
        self.busy_groups
            .entry(slot.day)
            .or_default()
            .insert(placement.group_id);
        self.busy_professors
            .entry(slot)
            .or_default()
            .insert(placement.professor_id);
        self.busy_rooms
            .entry(slot)
            .or_default()
            .insert(placement.room_id);
        *self
            .daily_load
            .entry((placement.professor_id, slot.day))
            .or_insert(0) += 1;
    }

    /// Total supervisions per professor across the run, seeded exams
    /// included. Feeds the load statistics.
    pub fn supervision_totals(&self) -> HashMap<ProfessorId, u32> {
        let mut totals: HashMap<ProfessorId, u32> = HashMap::new();
        for ((professor_id, _), count) in &self.daily_load {
            *totals.entry(*professor_id).or_insert(0) += count;
        }
        totals
    }
}
