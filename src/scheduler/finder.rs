//! Slot search for one unit.
//!
//! # Algorithm
//!
//! For each candidate slot, in the order given:
//! 1. Skip the slot if the group already sits an exam that day — the
//!    student rule is day-granular, so every slot of a busy day fails.
//! 2. Find a room: amphitheaters first for rosters above the threshold,
//!    standard rooms first otherwise; fall back to the other category.
//!    A room qualifies when it is free at the slot and seats the whole
//!    roster — capacity is never waived, a unit too big for every room
//!    fails placement rather than overflowing one.
//! 3. Find a professor: primary pool first, then secondary, taking the
//!    first candidate free at the exact slot with fewer than three
//!    supervisions that day.
//!
//! The first slot satisfying all three yields the placement. No
//! backtracking across earlier placements, no optimization across
//! units.

use crate::models::{ExamUnit, Placement, Professor, ProfessorId, Room, RoomKind, Slot};
use crate::tracker::AvailabilityTracker;

/// Rosters above this size prefer an amphitheater.
pub const AMPHITHEATER_THRESHOLD: u32 = 30;

/// Maximum supervisions per professor per day.
pub const MAX_DAILY_SUPERVISIONS: u32 = 3;

/// Greedy slot/room/professor search over a fixed room inventory.
///
/// Rooms are partitioned by kind and scanned largest first, so the
/// first fitting room is also the one wasting the fewest seats of the
/// remaining stock's upper end.
#[derive(Debug)]
pub struct SlotFinder<'a> {
    amphitheaters: Vec<&'a Room>,
    standard_rooms: Vec<&'a Room>,
}

impl<'a> SlotFinder<'a> {
    /// Builds a finder over the available rooms.
    pub fn new(rooms: &'a [Room]) -> Self {
        let mut amphitheaters: Vec<&Room> = rooms
            .iter()
            .filter(|r| r.available && r.kind == RoomKind::Amphitheater)
            .collect();
        let mut standard_rooms: Vec<&Room> = rooms
            .iter()
            .filter(|r| r.available && r.kind == RoomKind::Standard)
            .collect();
        amphitheaters.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));
        standard_rooms.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));
        Self {
            amphitheaters,
            standard_rooms,
        }
    }

    /// Searches the candidate slots for the first fully valid
    /// (slot, room, professor) combination for this unit.
    ///
    /// Returns `None` when no candidate slot works — a per-unit,
    /// non-fatal failure the caller collects for the retry pass.
    pub fn find(
        &self,
        tracker: &AvailabilityTracker,
        unit: &ExamUnit,
        slots: &[Slot],
        primary: &[&Professor],
        secondary: &[&Professor],
    ) -> Option<Placement> {
        if unit.student_count == 0 {
            return None;
        }

        for &slot in slots {
            if tracker.is_group_busy(unit.group_id, slot.day) {
                continue;
            }

            let Some(room) = self.find_room(tracker, unit.student_count, slot) else {
                continue;
            };

            let Some(professor_id) = self.find_professor(tracker, slot, primary, secondary) else {
                continue;
            };

            return Some(Placement {
                module_id: unit.module_id,
                group_id: unit.group_id,
                department_id: unit.department_id,
                slot,
                room_id: room.id,
                professor_id,
                student_count: unit.student_count,
            });
        }

        None
    }

    /// First free room seating the roster, preferred category first.
    fn find_room(
        &self,
        tracker: &AvailabilityTracker,
        student_count: u32,
        slot: Slot,
    ) -> Option<&'a Room> {
        let (preferred, fallback) = if student_count > AMPHITHEATER_THRESHOLD {
            (&self.amphitheaters, &self.standard_rooms)
        } else {
            (&self.standard_rooms, &self.amphitheaters)
        };

        preferred
            .iter()
            .chain(fallback.iter())
            .find(|room| room.capacity >= student_count && !tracker.is_room_busy_at(room.id, slot))
            .copied()
    }

    /// First professor free at the slot with daily capacity left,
    /// primary pool before secondary.
    fn find_professor(
        &self,
        tracker: &AvailabilityTracker,
        slot: Slot,
        primary: &[&Professor],
        secondary: &[&Professor],
    ) -> Option<ProfessorId> {
        primary
            .iter()
            .chain(secondary.iter())
            .find(|p| {
                !tracker.is_professor_busy_at(p.id, slot)
                    && tracker.professor_daily_load(p.id, slot.day) < MAX_DAILY_SUPERVISIONS
            })
            .map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn unit(students: u32) -> ExamUnit {
        ExamUnit {
            module_id: 1,
            group_id: 1,
            department_id: 1,
            student_count: students,
        }
    }

    fn slots_on(d: u32) -> Vec<Slot> {
        vec![Slot::new(day(d), 8), Slot::new(day(d), 10)]
    }

    #[test]
    fn test_small_roster_prefers_standard_room() {
        let rooms = vec![
            Room::new(1, RoomKind::Amphitheater, 200),
            Room::new(2, RoomKind::Standard, 30),
        ];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        let p = finder
            .find(&tracker, &unit(25), &slots_on(20), &primary, &[])
            .unwrap();
        assert_eq!(p.room_id, 2);
    }

    #[test]
    fn test_large_roster_prefers_amphitheater() {
        let rooms = vec![
            Room::new(1, RoomKind::Standard, 60),
            Room::new(2, RoomKind::Amphitheater, 200),
        ];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        let p = finder
            .find(&tracker, &unit(50), &slots_on(20), &primary, &[])
            .unwrap();
        assert_eq!(p.room_id, 2);
    }

    #[test]
    fn test_falls_back_to_other_category() {
        // Standard room too small: the small roster lands in the amphi.
        let rooms = vec![
            Room::new(1, RoomKind::Standard, 10),
            Room::new(2, RoomKind::Amphitheater, 200),
        ];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        let p = finder
            .find(&tracker, &unit(25), &slots_on(20), &primary, &[])
            .unwrap();
        assert_eq!(p.room_id, 2);
    }

    #[test]
    fn test_capacity_never_waived() {
        let rooms = vec![
            Room::new(1, RoomKind::Amphitheater, 300),
            Room::new(2, RoomKind::Standard, 50),
        ];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        // 301 students, biggest room seats 300: must fail placement.
        assert!(finder
            .find(&tracker, &unit(301), &slots_on(20), &primary, &[])
            .is_none());
    }

    #[test]
    fn test_unavailable_rooms_excluded() {
        let rooms = vec![Room::new(1, RoomKind::Standard, 100).unavailable()];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        assert!(finder
            .find(&tracker, &unit(10), &slots_on(20), &primary, &[])
            .is_none());
    }

    #[test]
    fn test_busy_day_skips_all_hours() {
        let rooms = vec![Room::new(1, RoomKind::Standard, 100)];
        let finder = SlotFinder::new(&rooms);
        let mut tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        // Occupy the group on day 20 at 8h; 10h the same day must also fail.
        let first = finder
            .find(&tracker, &unit(10), &slots_on(20), &primary, &[])
            .unwrap();
        tracker.commit(&first);
        assert!(finder
            .find(&tracker, &unit(10), &slots_on(20), &primary, &[])
            .is_none());

        // A different day works.
        assert!(finder
            .find(&tracker, &unit(10), &slots_on(21), &primary, &[])
            .is_some());
    }

    #[test]
    fn test_primary_pool_preferred() {
        let rooms = vec![Room::new(1, RoomKind::Standard, 100)];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let home = [Professor::new(1, 1)];
        let away = [Professor::new(2, 2)];
        let primary: Vec<&Professor> = home.iter().collect();
        let secondary: Vec<&Professor> = away.iter().collect();

        let p = finder
            .find(&tracker, &unit(10), &slots_on(20), &primary, &secondary)
            .unwrap();
        assert_eq!(p.professor_id, 1);
    }

    #[test]
    fn test_secondary_pool_used_when_primary_busy() {
        let rooms = vec![
            Room::new(1, RoomKind::Standard, 100),
            Room::new(2, RoomKind::Standard, 100),
        ];
        let finder = SlotFinder::new(&rooms);
        let mut tracker = AvailabilityTracker::new();
        let home = [Professor::new(1, 1)];
        let away = [Professor::new(2, 2)];
        let primary: Vec<&Professor> = home.iter().collect();
        let secondary: Vec<&Professor> = away.iter().collect();

        let single_slot = vec![Slot::new(day(20), 8)];
        let first = finder
            .find(&tracker, &unit(10), &single_slot, &primary, &secondary)
            .unwrap();
        tracker.commit(&first);

        // Same slot, different group: the home professor is taken.
        let other = ExamUnit {
            group_id: 2,
            ..unit(10)
        };
        let second = finder
            .find(&tracker, &other, &single_slot, &primary, &secondary)
            .unwrap();
        assert_eq!(second.professor_id, 2);
    }

    #[test]
    fn test_daily_supervision_cap() {
        let rooms = vec![
            Room::new(1, RoomKind::Standard, 100),
            Room::new(2, RoomKind::Standard, 100),
            Room::new(3, RoomKind::Standard, 100),
            Room::new(4, RoomKind::Standard, 100),
        ];
        let finder = SlotFinder::new(&rooms);
        let mut tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        let slots: Vec<Slot> = [8, 10, 12, 14].iter().map(|&h| Slot::new(day(20), h)).collect();
        for group in 1..=3 {
            let u = ExamUnit {
                group_id: group,
                ..unit(10)
            };
            let p = finder.find(&tracker, &u, &slots, &primary, &[]).unwrap();
            tracker.commit(&p);
        }

        // Fourth exam the same day: the only professor is at the cap.
        let u4 = ExamUnit {
            group_id: 4,
            ..unit(10)
        };
        assert!(finder.find(&tracker, &u4, &slots, &primary, &[]).is_none());
    }

    #[test]
    fn test_empty_roster_is_skipped() {
        let rooms = vec![Room::new(1, RoomKind::Standard, 100)];
        let finder = SlotFinder::new(&rooms);
        let tracker = AvailabilityTracker::new();
        let profs = [Professor::new(1, 1)];
        let primary: Vec<&Professor> = profs.iter().collect();

        assert!(finder
            .find(&tracker, &unit(0), &slots_on(20), &primary, &[])
            .is_none());
    }
}
