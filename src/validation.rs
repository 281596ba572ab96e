//! Catalog integrity validation.
//!
//! Checks the structural integrity of a loaded catalog before any
//! placement is attempted. Detects:
//! - Duplicate identifiers within a table
//! - Dangling references (student → group, group/module → formation,
//!   enrollment → student/module)
//! - Rooms with no seats
//!
//! A malformed catalog fails the whole generation run up front; the
//! checks collect every issue instead of stopping at the first.

use std::collections::HashSet;

use crate::models::Catalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two rows of one table share the same ID.
    DuplicateId,
    /// A row references an entity that doesn't exist.
    DanglingReference,
    /// A room with zero capacity.
    InvalidCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a loaded catalog.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for room in &catalog.rooms {
        if !room_ids.insert(room.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Room {} has zero capacity", room.id),
            ));
        }
    }

    let mut professor_ids = HashSet::new();
    for prof in &catalog.professors {
        if !professor_ids.insert(prof.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate professor ID: {}", prof.id),
            ));
        }
    }

    let mut formation_ids = HashSet::new();
    for formation in &catalog.formations {
        if !formation_ids.insert(formation.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate formation ID: {}", formation.id),
            ));
        }
    }

    let mut group_ids = HashSet::new();
    for group in &catalog.groups {
        if !group_ids.insert(group.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", group.id),
            ));
        }
        if !formation_ids.contains(&group.formation_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "Group {} references unknown formation {}",
                    group.id, group.formation_id
                ),
            ));
        }
    }

    let mut module_ids = HashSet::new();
    for module in &catalog.modules {
        if !module_ids.insert(module.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate module ID: {}", module.id),
            ));
        }
        if !formation_ids.contains(&module.formation_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "Module {} references unknown formation {}",
                    module.id, module.formation_id
                ),
            ));
        }
    }

    let mut student_ids = HashSet::new();
    for student in &catalog.students {
        if !student_ids.insert(student.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", student.id),
            ));
        }
        if !group_ids.contains(&student.group_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "Student {} references unknown group {}",
                    student.id, student.group_id
                ),
            ));
        }
    }

    for enrollment in &catalog.enrollments {
        if !student_ids.contains(&enrollment.student_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "Enrollment references unknown student {}",
                    enrollment.student_id
                ),
            ));
        }
        if !module_ids.contains(&enrollment.module_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "Enrollment references unknown module {}",
                    enrollment.module_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
