//! Room and professor models.
//!
//! Rooms and professors are the two contended resources of an exam
//! session: a room is occupied for exactly one sitting at a time, a
//! professor supervises at most one sitting at a time and a bounded
//! number per day.

use serde::{Deserialize, Serialize};

use super::{DepartmentId, ProfessorId, RoomId};

/// An examination room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Human-readable name.
    pub name: String,
    /// Seat count.
    pub capacity: u32,
    /// Room classification.
    pub kind: RoomKind,
    /// Whether the room may be scheduled at all this session.
    pub available: bool,
}

/// Room classification.
///
/// Large cohorts are steered toward amphitheaters first; small ones
/// toward standard rooms, keeping amphitheater seats free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Large tiered hall.
    Amphitheater,
    /// Standard classroom.
    Standard,
}

impl Room {
    /// Creates an available room.
    pub fn new(id: RoomId, kind: RoomKind, capacity: u32) -> Self {
        Self {
            id,
            name: String::new(),
            capacity,
            kind,
            available: true,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the room unavailable for the session.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// A professor eligible to supervise exams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    /// Unique professor identifier.
    pub id: ProfessorId,
    /// Home department.
    pub department_id: DepartmentId,
    /// Human-readable name.
    pub name: String,
}

impl Professor {
    /// Creates a professor.
    pub fn new(id: ProfessorId, department_id: DepartmentId) -> Self {
        Self {
            id,
            department_id,
            name: String::new(),
        }
    }

    /// Sets the professor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
