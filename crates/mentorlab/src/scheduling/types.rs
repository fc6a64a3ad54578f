/// Types for the lab scheduling subsystem
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;
use super::grid;

/// A coordinate in the fixed weekly grid: 5 weekdays x 8 lab hours.
///
/// Slots are computed keys, not stored entities; construction validates the
/// range so an out-of-bounds coordinate can never enter the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub weekday: u8, // 1 (Monday) ..= 5 (Friday)
    pub hour: u8,    // 10 ..= 17, each covering one lab hour
}

impl Slot {
    /// Creates a slot, rejecting coordinates outside the weekly grid.
    pub fn new(weekday: i64, hour: i64) -> Result<Self, ScheduleError> {
        if !grid::weekday_in_range(weekday) || !grid::hour_in_range(hour) {
            return Err(ScheduleError::InvalidSlot { weekday, hour });
        }
        Ok(Self {
            weekday: weekday as u8,
            hour: hour as u8,
        })
    }

    /// Canonical map key, `"{weekday}-{hour}"`.
    pub fn key(&self) -> String {
        grid::slot_key(self.weekday, self.hour)
    }

    /// Human-readable label for reports, e.g. `"Monday 10:00"`.
    pub fn label(&self) -> String {
        format!("{} {}:00", grid::weekday_name(self.weekday), self.hour)
    }
}

/// One mentor's declared availability for a term, already filtered to
/// eligible mentors by the caller.
#[derive(Debug, Clone)]
pub struct MentorAvailability {
    pub mentor_id: i64,
    pub mentor_name: String,
    pub slots: Vec<Slot>,
}

/// Tunable knobs for an auto-fill run. Pure input config, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFillParameters {
    /// Soft capacity per slot; auto-fill never pushes occupancy past this.
    #[serde(default = "default_max_per_slot")]
    pub max_per_slot: u32,

    /// Weekly cap on blocks per mentor, counting pre-existing assignments.
    #[serde(default = "default_max_slots_per_mentor")]
    pub max_slots_per_mentor: u32,

    /// Skip slots already at capacity without evaluating candidates.
    /// Auto-fill only ever adds blocks; this flag never causes replacement.
    #[serde(default)]
    pub fill_empty_only: bool,
}

fn default_max_per_slot() -> u32 {
    2
}

fn default_max_slots_per_mentor() -> u32 {
    4
}

impl Default for AutoFillParameters {
    fn default() -> Self {
        Self {
            max_per_slot: default_max_per_slot(),
            max_slots_per_mentor: default_max_slots_per_mentor(),
            fill_empty_only: false,
        }
    }
}

impl AutoFillParameters {
    /// Rejects non-positive caps before any planning happens.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.max_per_slot == 0 {
            return Err(ScheduleError::InvalidParameter {
                name: "max_per_slot",
                value: self.max_per_slot as i64,
            });
        }
        if self.max_slots_per_mentor == 0 {
            return Err(ScheduleError::InvalidParameter {
                name: "max_slots_per_mentor",
                value: self.max_slots_per_mentor as i64,
            });
        }
        Ok(())
    }
}

/// One assignment the planner wants to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedAssignment {
    pub mentor_id: i64,
    pub mentor_name: String,
    pub slot: Slot,
}

/// Output of the pure planning pass, before anything is written.
#[derive(Debug, Clone)]
pub struct AutoFillPlan {
    /// Proposals in deterministic slot-major order.
    pub proposed: Vec<ProposedAssignment>,
    /// Labels of slots still below capacity after the pass.
    pub unfilled_slots: Vec<String>,
    /// Eligible mentors who received zero proposals in this run.
    pub unassigned_mentors: Vec<String>,
}

/// A proposal that could not be persisted during application.
#[derive(Debug, Clone, Serialize)]
pub struct FailedAssignment {
    pub mentor_name: String,
    pub slot_label: String,
    pub reason: String,
}

/// Summary returned to the caller after an auto-fill run is applied.
#[derive(Debug, Clone, Serialize)]
pub struct AutoFillReport {
    /// Number of blocks actually persisted.
    pub assignments: usize,
    pub unfilled_slots: Vec<String>,
    pub unassigned_mentors: Vec<String>,
    /// Proposals that failed to persist; the rest of the batch still applied.
    pub failures: Vec<FailedAssignment>,
}

/// What a drag gesture carries: the mentor being placed, and the block id
/// when the gesture started on an existing assignment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DragPayload {
    pub mentor_id: i64,
    pub block_id: Option<i64>,
}

/// A completed pointer gesture, resolved against the grid by the caller.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture {
    pub origin: (f64, f64),
    pub position: (f64, f64),
    /// The slot under the pointer at release, if any.
    pub target: Option<Slot>,
    /// The slot the gesture started from, for filtering zero-distance moves.
    pub source: Option<Slot>,
}

/// The single editor action a gesture resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragAction {
    /// Displacement under the threshold; treat as a click on the source cell.
    Click,
    /// Place a mentor with no existing block into the target slot.
    Assign { mentor_id: i64, slot: Slot },
    /// Relocate an existing block to the target slot.
    Move { block_id: i64, slot: Slot },
    /// Released outside the grid or onto the starting slot.
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_rejects_out_of_range() {
        assert!(Slot::new(0, 10).is_err());
        assert!(Slot::new(6, 10).is_err());
        assert!(Slot::new(3, 9).is_err());
        assert!(Slot::new(3, 18).is_err());
        assert!(Slot::new(1, 10).is_ok());
        assert!(Slot::new(5, 17).is_ok());
    }

    #[test]
    fn test_slot_key_and_label() {
        let slot = Slot::new(2, 14).unwrap();
        assert_eq!(slot.key(), "2-14");
        assert_eq!(slot.label(), "Tuesday 14:00");
    }

    #[test]
    fn test_parameters_validation() {
        assert!(AutoFillParameters::default().validate().is_ok());

        let zero_cap = AutoFillParameters {
            max_per_slot: 0,
            ..Default::default()
        };
        assert!(zero_cap.validate().is_err());

        let zero_load = AutoFillParameters {
            max_slots_per_mentor: 0,
            ..Default::default()
        };
        assert!(zero_load.validate().is_err());
    }
}
