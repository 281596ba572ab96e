//! Catalog loading and unit derivation.
//!
//! Reads the registrar tables from the store into a `Catalog` and
//! derives the scheduling workload: every (module, group) pair of the
//! target semester that has at least one enrolled student and no
//! already-planned exam.

use std::collections::{HashMap, HashSet};

use crate::models::{
    Catalog, DepartmentId, Exam, ExamUnit, GroupId, ModuleId, Semester, StudentId,
};
use crate::store::{ExamStore, StoreResult};

/// Loads the full catalog from a store.
pub fn load_catalog<S: ExamStore>(store: &S) -> StoreResult<Catalog> {
    Ok(Catalog {
        rooms: store.rooms()?,
        professors: store.professors()?,
        formations: store.formations()?,
        groups: store.groups()?,
        modules: store.modules()?,
        students: store.students()?,
        enrollments: store.enrollments()?,
        exam_periods: store.exam_periods()?,
    })
}

/// Precomputed enrollment lookups.
///
/// Built once per run so resolving the roster of every (module, group)
/// pair stays cheap across tens of thousands of students.
#[derive(Debug, Default)]
pub struct EnrollmentIndex {
    by_module: HashMap<ModuleId, HashSet<StudentId>>,
    group_of: HashMap<StudentId, GroupId>,
}

impl EnrollmentIndex {
    /// Builds the index from a catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let group_of = catalog
            .students
            .iter()
            .map(|s| (s.id, s.group_id))
            .collect();
        let mut by_module: HashMap<ModuleId, HashSet<StudentId>> = HashMap::new();
        for e in &catalog.enrollments {
            by_module.entry(e.module_id).or_default().insert(e.student_id);
        }
        Self { by_module, group_of }
    }

    /// Students of the given group enrolled in the given module.
    pub fn enrolled(&self, module_id: ModuleId, group_id: GroupId) -> Vec<StudentId> {
        let mut ids: Vec<StudentId> = self
            .by_module
            .get(&module_id)
            .map(|students| {
                students
                    .iter()
                    .filter(|s| self.group_of.get(s) == Some(&group_id))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Roster size for a (module, group) pair.
    pub fn enrolled_count(&self, module_id: ModuleId, group_id: GroupId) -> u32 {
        self.enrolled(module_id, group_id).len() as u32
    }
}

/// Derives the units still needing an exam for a term.
///
/// A pair qualifies when the module belongs to the semester (and the
/// department filter, if set), at least one group student is enrolled,
/// and no planned exam for the pair exists yet. Empty rosters are
/// skipped silently: there is nothing to schedule.
///
/// Units come back largest roster first, ties broken by (module, group)
/// id so a fixed seed reproduces the same run.
pub fn pending_units(
    catalog: &Catalog,
    index: &EnrollmentIndex,
    existing: &[Exam],
    semester: Semester,
    department: Option<DepartmentId>,
) -> Vec<ExamUnit> {
    let scheduled: HashSet<(ModuleId, GroupId)> = existing
        .iter()
        .map(|e| (e.module_id, e.group_id))
        .collect();

    let mut units = Vec::new();
    for module in &catalog.modules {
        if module.semester != semester {
            continue;
        }
        let Some(module_department) = catalog.module_department(module) else {
            continue;
        };
        if let Some(wanted) = department {
            if module_department != wanted {
                continue;
            }
        }
        for group in catalog.groups_of_formation(module.formation_id) {
            if scheduled.contains(&(module.id, group.id)) {
                continue;
            }
            let student_count = index.enrolled_count(module.id, group.id);
            if student_count == 0 {
                continue;
            }
            units.push(ExamUnit {
                module_id: module.id,
                group_id: group.id,
                department_id: module_department,
                student_count,
            });
        }
    }

    units.sort_by(|a, b| {
        b.student_count
            .cmp(&a.student_count)
            .then(a.module_id.cmp(&b.module_id))
            .then(a.group_id.cmp(&b.group_id))
    });
    units
}
