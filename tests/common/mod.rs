//! Shared campus fixtures for integration tests.
//!
//! Builders over `MemoryStore` that wire up a small faculty: one or
//! more departments, groups with numbered students, modules with
//! per-group enrollments, rooms, professors, and a January exam
//! window.

use chrono::NaiveDate;
use exam_timetable::models::{
    DepartmentId, Enrollment, ExamPeriod, Formation, FormationId, Group, GroupId, Module,
    ModuleId, Professor, Room, RoomKind, Semester, Student,
};
use exam_timetable::scheduler::GenerateRequest;
use exam_timetable::store::MemoryStore;

pub const YEAR: &str = "2024-2025";

/// A store seeded with formation 1 in department 10.
pub fn base_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    add_formation(&mut store, 1, 10);
    store
}

pub fn add_formation(store: &mut MemoryStore, id: FormationId, department_id: DepartmentId) {
    store.add_formation(Formation {
        id,
        department_id,
        name: format!("F{id}"),
    });
}

/// Adds a group and `count` students in it, ids `group_id * 1000 + i`.
pub fn add_group(store: &mut MemoryStore, group_id: GroupId, formation_id: FormationId, count: u32) {
    store.add_group(Group {
        id: group_id,
        formation_id,
        name: format!("G{group_id}"),
    });
    for i in 0..count {
        store.add_student(Student {
            id: group_id * 1000 + i,
            group_id,
        });
    }
}

pub fn add_module(store: &mut MemoryStore, module_id: ModuleId, formation_id: FormationId) {
    store.add_module(Module {
        id: module_id,
        formation_id,
        name: format!("M{module_id}"),
        code: format!("MOD{module_id}"),
        semester: Semester::One,
    });
}

/// Enrolls the first `count` students of a group in a module.
pub fn enroll_group(store: &mut MemoryStore, group_id: GroupId, count: u32, module_id: ModuleId) {
    for i in 0..count {
        store.add_enrollment(Enrollment {
            student_id: group_id * 1000 + i,
            module_id,
        });
    }
}

pub fn add_rooms(store: &mut MemoryStore, specs: &[(RoomKind, u32)]) {
    for (i, &(kind, capacity)) in specs.iter().enumerate() {
        store.add_room(Room::new(i as u32 + 1, kind, capacity));
    }
}

pub fn add_professors(store: &mut MemoryStore, count: u32, department_id: DepartmentId) {
    for i in 0..count {
        store.add_professor(Professor::new(department_id * 100 + i, department_id));
    }
}

/// January 2025 exam window for semester one. Jan 20, 2025 is a Monday.
pub fn add_period(store: &mut MemoryStore, start_day: u32, end_day: u32) {
    store.add_exam_period(ExamPeriod::new(
        Semester::One,
        YEAR,
        NaiveDate::from_ymd_opt(2025, 1, start_day).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, end_day).unwrap(),
    ));
}

pub fn request() -> GenerateRequest {
    GenerateRequest::new(Semester::One, YEAR)
}
