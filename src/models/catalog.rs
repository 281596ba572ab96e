//! Catalog models: the read-only inputs of a generation run.
//!
//! The catalog mirrors the registrar tables the scheduler consumes:
//! formations own groups and modules, students belong to exactly one
//! group, and enrollments associate students with modules. The unit of
//! scheduling is a (module, group) pair.

use serde::{Deserialize, Serialize};

use super::{
    DepartmentId, ExamPeriod, FormationId, GroupId, ModuleId, Professor, Room, Semester, StudentId,
};

/// A student, member of exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: StudentId,
    /// The group this student sits exams with.
    pub group_id: GroupId,
}

/// A cohort within a formation.
///
/// The group is the unit against which the one-exam-per-day rule is
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Owning formation.
    pub formation_id: FormationId,
    /// Human-readable name.
    pub name: String,
}

/// A degree program, owned by a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Unique formation identifier.
    pub id: FormationId,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Human-readable name.
    pub name: String,
}

/// A course, taught within a formation during one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier.
    pub id: ModuleId,
    /// Owning formation.
    pub formation_id: FormationId,
    /// Human-readable name.
    pub name: String,
    /// Course code.
    pub code: String,
    /// Semester the module is taught in.
    pub semester: Semester,
}

/// Association between a student and a module they sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrolled student.
    pub student_id: StudentId,
    /// Module enrolled in.
    pub module_id: ModuleId,
}

/// One (module, group) pair requiring exactly one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamUnit {
    /// Examined module.
    pub module_id: ModuleId,
    /// Examined group.
    pub group_id: GroupId,
    /// Home department of the module (through its formation).
    pub department_id: DepartmentId,
    /// Number of group students enrolled in the module.
    pub student_count: u32,
}

/// The read-only aggregate a generation run operates on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Examination rooms (availability flag included).
    pub rooms: Vec<Room>,
    /// Supervision-eligible professors.
    pub professors: Vec<Professor>,
    /// Degree programs.
    pub formations: Vec<Formation>,
    /// Cohorts.
    pub groups: Vec<Group>,
    /// Courses.
    pub modules: Vec<Module>,
    /// Students.
    pub students: Vec<Student>,
    /// Student-module associations.
    pub enrollments: Vec<Enrollment>,
    /// Configured exam periods.
    pub exam_periods: Vec<ExamPeriod>,
}

impl Catalog {
    /// Looks up a formation by id.
    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id)
    }

    /// Department owning a module, resolved through its formation.
    pub fn module_department(&self, module: &Module) -> Option<DepartmentId> {
        self.formation(module.formation_id).map(|f| f.department_id)
    }

    /// Groups belonging to a formation, in catalog order.
    pub fn groups_of_formation(&self, formation_id: FormationId) -> impl Iterator<Item = &Group> {
        self.groups
            .iter()
            .filter(move |g| g.formation_id == formation_id)
    }

    /// The configured period for a term, if any.
    pub fn exam_period(&self, semester: Semester, academic_year: &str) -> Option<&ExamPeriod> {
        self.exam_periods
            .iter()
            .find(|p| p.semester == semester && p.academic_year == academic_year)
    }

}
