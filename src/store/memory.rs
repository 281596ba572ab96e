//! In-memory store backend.
//!
//! Vec-backed tables with an id counter, suitable for tests and
//! single-process deployments. Department filtering is resolved the
//! same way the generator resolves it: exam → module → formation →
//! department.

use std::collections::HashSet;

use crate::models::{
    DepartmentId, Enrollment, Exam, ExamId, ExamPeriod, ExamStatus, Formation, Group, Module,
    ModuleId, NewExam, Professor, Room, Student, Supervision, SupervisionRole,
};

use super::{ClearScope, ExamFilter, ExamStore, StoreError, StoreResult};

/// In-memory `ExamStore` implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rooms: Vec<Room>,
    professors: Vec<Professor>,
    formations: Vec<Formation>,
    groups: Vec<Group>,
    modules: Vec<Module>,
    students: Vec<Student>,
    enrollments: Vec<Enrollment>,
    exam_periods: Vec<ExamPeriod>,
    exams: Vec<Exam>,
    supervisions: Vec<Supervision>,
    next_exam_id: ExamId,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            next_exam_id: 1,
            ..Self::default()
        }
    }

    /// Adds a room.
    pub fn add_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    /// Adds a professor.
    pub fn add_professor(&mut self, professor: Professor) {
        self.professors.push(professor);
    }

    /// Adds a formation.
    pub fn add_formation(&mut self, formation: Formation) {
        self.formations.push(formation);
    }

    /// Adds a group.
    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Adds a module.
    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Adds a student.
    pub fn add_student(&mut self, student: Student) {
        self.students.push(student);
    }

    /// Adds an enrollment.
    pub fn add_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    /// Adds an exam period.
    pub fn add_exam_period(&mut self, period: ExamPeriod) {
        self.exam_periods.push(period);
    }

    /// Direct read access to all persisted exams, in insertion order.
    pub fn all_exams(&self) -> &[Exam] {
        &self.exams
    }

    /// Department owning a module, through its formation.
    fn module_department(&self, module_id: ModuleId) -> Option<DepartmentId> {
        let module = self.modules.iter().find(|m| m.id == module_id)?;
        self.formations
            .iter()
            .find(|f| f.id == module.formation_id)
            .map(|f| f.department_id)
    }

    fn matches_filter(&self, exam: &Exam, filter: &ExamFilter) -> bool {
        if let Some(semester) = filter.semester {
            if exam.semester != semester {
                return false;
            }
        }
        if let Some(ref year) = filter.academic_year {
            if exam.academic_year != *year {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if exam.status != status {
                return false;
            }
        }
        if let Some(department) = filter.department {
            if self.module_department(exam.module_id) != Some(department) {
                return false;
            }
        }
        true
    }

    fn matches_scope(&self, exam: &Exam, scope: &ClearScope) -> bool {
        if let Some(semester) = scope.semester {
            if exam.semester != semester {
                return false;
            }
        }
        if let Some(ref year) = scope.academic_year {
            if exam.academic_year != *year {
                return false;
            }
        }
        if let Some(department) = scope.department {
            if self.module_department(exam.module_id) != Some(department) {
                return false;
            }
        }
        true
    }

    /// Checks referential integrity of a batch without mutating state.
    fn check_batch(&self, batch: &[NewExam]) -> StoreResult<()> {
        for row in batch {
            if !self.modules.iter().any(|m| m.id == row.module_id) {
                return Err(StoreError::Integrity(format!(
                    "exam references unknown module {}",
                    row.module_id
                )));
            }
            if !self.groups.iter().any(|g| g.id == row.group_id) {
                return Err(StoreError::Integrity(format!(
                    "exam references unknown group {}",
                    row.group_id
                )));
            }
            if !self.rooms.iter().any(|r| r.id == row.room_id) {
                return Err(StoreError::Integrity(format!(
                    "exam references unknown room {}",
                    row.room_id
                )));
            }
            if !self.professors.iter().any(|p| p.id == row.professor_id) {
                return Err(StoreError::Integrity(format!(
                    "exam references unknown professor {}",
                    row.professor_id
                )));
            }
        }
        Ok(())
    }
}

impl ExamStore for MemoryStore {
    fn rooms(&self) -> StoreResult<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    fn professors(&self) -> StoreResult<Vec<Professor>> {
        Ok(self.professors.clone())
    }

    fn formations(&self) -> StoreResult<Vec<Formation>> {
        Ok(self.formations.clone())
    }

    fn groups(&self) -> StoreResult<Vec<Group>> {
        Ok(self.groups.clone())
    }

    fn modules(&self) -> StoreResult<Vec<Module>> {
        Ok(self.modules.clone())
    }

    fn students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.students.clone())
    }

    fn enrollments(&self) -> StoreResult<Vec<Enrollment>> {
        Ok(self.enrollments.clone())
    }

    fn exam_periods(&self) -> StoreResult<Vec<ExamPeriod>> {
        Ok(self.exam_periods.clone())
    }

    fn exams(&self, filter: &ExamFilter) -> StoreResult<Vec<Exam>> {
        Ok(self
            .exams
            .iter()
            .filter(|e| self.matches_filter(e, filter))
            .cloned()
            .collect())
    }

    fn supervisions(&self) -> StoreResult<Vec<Supervision>> {
        Ok(self.supervisions.clone())
    }

    fn insert_planned(&mut self, batch: &[NewExam]) -> StoreResult<Vec<ExamId>> {
        // Validate the whole batch before touching any table, so a bad
        // row cannot leave a partial flush behind.
        self.check_batch(batch)?;

        let mut ids = Vec::with_capacity(batch.len());
        for row in batch {
            let id = self.next_exam_id;
            self.next_exam_id += 1;
            self.exams.push(Exam {
                id,
                module_id: row.module_id,
                professor_id: row.professor_id,
                room_id: row.room_id,
                group_id: row.group_id,
                starts_at: row.starts_at,
                duration_minutes: row.duration_minutes,
                student_count: row.student_count,
                semester: row.semester,
                academic_year: row.academic_year.clone(),
                status: ExamStatus::Planned,
            });
            self.supervisions.push(Supervision {
                exam_id: id,
                professor_id: row.professor_id,
                role: SupervisionRole::Primary,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    fn delete_exams(&mut self, scope: &ClearScope) -> StoreResult<usize> {
        let removed: HashSet<ExamId> = self
            .exams
            .iter()
            .filter(|e| self.matches_scope(e, scope))
            .map(|e| e.id)
            .collect();
        self.supervisions.retain(|s| !removed.contains(&s.exam_id));
        self.exams.retain(|e| !removed.contains(&e.id));
        Ok(removed.len())
    }
}
