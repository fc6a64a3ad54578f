//! Error types for the scheduling subsystem.

use thiserror::Error;

/// Errors that can occur during scheduling operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Slot coordinates outside the 5x8 weekly grid
    #[error("invalid slot: weekday {weekday}, hour {hour} is outside the weekly grid")]
    InvalidSlot { weekday: i64, hour: i64 },

    /// A tunable parameter was zero or otherwise unusable
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: i64 },

    /// The mentor already holds a block at this exact slot
    #[error("mentor {mentor_id} is already assigned to {slot_label}")]
    DuplicateAssignment { mentor_id: i64, slot_label: String },

    /// Operation referenced a block that no longer exists
    #[error("block {block_id} not found")]
    BlockNotFound { block_id: i64 },

    /// Operation referenced an unknown schedule
    #[error("schedule {schedule_id} not found")]
    ScheduleNotFound { schedule_id: i64 },

    /// No schedule is currently marked active
    #[error("no active schedule")]
    NoActiveSchedule,

    /// Operation referenced an unknown mentor
    #[error("mentor {mentor_id} not found")]
    MentorNotFound { mentor_id: i64 },

    /// Auto-fill was invoked with zero availability submissions
    #[error("no availability submitted for term {term}; nothing to fill")]
    NoAvailability { term: String },

    /// Underlying storage failure
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl ScheduleError {
    /// Returns true if this error is a rejected duplicate or no-op edit.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ScheduleError::DuplicateAssignment { .. })
    }

    /// Returns true if this error refers to a missing entity, usually stale
    /// client state after a concurrent edit elsewhere.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScheduleError::BlockNotFound { .. }
                | ScheduleError::ScheduleNotFound { .. }
                | ScheduleError::NoActiveSchedule
                | ScheduleError::MentorNotFound { .. }
        )
    }

    /// Returns true if the request itself was malformed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidSlot { .. } | ScheduleError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let conflict = ScheduleError::DuplicateAssignment {
            mentor_id: 1,
            slot_label: "Monday 10:00".to_string(),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let missing = ScheduleError::BlockNotFound { block_id: 42 };
        assert!(missing.is_not_found());
        assert!(!missing.is_validation());

        let bad_slot = ScheduleError::InvalidSlot {
            weekday: 7,
            hour: 10,
        };
        assert!(bad_slot.is_validation());
    }
}
