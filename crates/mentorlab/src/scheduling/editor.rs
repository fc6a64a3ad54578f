//! Manual editing of the schedule grid: assign, move, remove, clear.
//!
//! Every mutation, manual or engine-driven, goes through the same store
//! primitives, so drag-and-drop edits and auto-fill share one consistency
//! model. A block is either absent, present, or present at different
//! coordinates; there is no pending state, and all validation happens
//! synchronously before the write.

use tracing::info;

use crate::db::types::DbScheduleBlock;
use crate::db::ScheduleDb;

use super::error::ScheduleError;
use super::types::{DragAction, DragGesture, DragPayload, Slot};

/// Pointer displacement below this many pixels is treated as a click rather
/// than a drag, so jittery input cannot cause an accidental reassignment.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Outcome of a move request.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub block: DbScheduleBlock,
    /// False when the target equaled the block's current coordinates and no
    /// write occurred.
    pub moved: bool,
}

/// Manually assigns a mentor to a slot.
///
/// Rejects an exact duplicate `(mentor, weekday, hour)` with a conflict.
/// The per-slot capacity cap is deliberately not enforced here: it is an
/// auto-fill heuristic, and a human may choose to exceed it.
pub fn assign_block(
    db: &ScheduleDb,
    schedule_id: i64,
    mentor_id: i64,
    weekday: i64,
    hour: i64,
) -> Result<DbScheduleBlock, ScheduleError> {
    let slot = Slot::new(weekday, hour)?;
    let block = db.create_block(schedule_id, mentor_id, slot)?;
    info!(
        "Assigned mentor {} to {} on schedule {}",
        mentor_id,
        slot.label(),
        schedule_id
    );
    Ok(block)
}

/// Moves an existing block to new coordinates, preserving its id.
///
/// Moving a block onto its own current slot is a no-op: no write happens and
/// the unchanged block is returned with `moved: false`. This guards against
/// zero-distance drags being misread as moves.
pub fn move_block(
    db: &ScheduleDb,
    block_id: i64,
    weekday: i64,
    hour: i64,
) -> Result<MoveOutcome, ScheduleError> {
    let slot = Slot::new(weekday, hour)?;
    let current = db.get_block(block_id)?;

    if current.weekday == slot.weekday as i64 && current.hour == slot.hour as i64 {
        return Ok(MoveOutcome {
            block: current,
            moved: false,
        });
    }

    let block = db.move_block(block_id, slot)?;
    info!("Moved block {} to {}", block_id, slot.label());
    Ok(MoveOutcome { block, moved: true })
}

/// Deletes one block by id.
pub fn remove_block(db: &ScheduleDb, block_id: i64) -> Result<(), ScheduleError> {
    db.delete_block(block_id)?;
    info!("Removed block {}", block_id);
    Ok(())
}

/// Deletes every block of a schedule in one statement.
///
/// Atomic from the caller's perspective: either the grid is empty afterwards
/// or the operation reports failure.
pub fn clear_schedule(db: &ScheduleDb, schedule_id: i64) -> Result<usize, ScheduleError> {
    let removed = db.clear_schedule(schedule_id)?;
    info!("Cleared {} blocks from schedule {}", removed, schedule_id);
    Ok(removed)
}

/// Resolves a completed pointer gesture into a single editor action.
///
/// Independent of the pointer library: the caller supplies the payload the
/// drag source carried and the slot the drop target resolved to.
pub fn resolve_drag(payload: DragPayload, gesture: DragGesture) -> DragAction {
    let dx = gesture.position.0 - gesture.origin.0;
    let dy = gesture.position.1 - gesture.origin.1;
    if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD_PX {
        return DragAction::Click;
    }

    let Some(target) = gesture.target else {
        // Released outside the grid.
        return DragAction::None;
    };

    match payload.block_id {
        Some(block_id) => {
            if gesture.source == Some(target) {
                // A real drag that landed back on its own cell is not a move.
                DragAction::None
            } else {
                DragAction::Move {
                    block_id,
                    slot: target,
                }
            }
        }
        None => DragAction::Assign {
            mentor_id: payload.mentor_id,
            slot: target,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(weekday: u8, hour: u8) -> Slot {
        Slot { weekday, hour }
    }

    fn seeded() -> (ScheduleDb, i64, i64) {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        let mentor = db
            .create_mentor("u100", "Ada", "ada@club.edu", true, None)
            .unwrap();
        (db, schedule.schedule_id, mentor.mentor_id)
    }

    #[test]
    fn test_assign_rejects_out_of_range_slot() {
        let (db, schedule_id, mentor_id) = seeded();
        let err = assign_block(&db, schedule_id, mentor_id, 6, 10).unwrap_err();
        assert!(err.is_validation());
        assert!(db.list_blocks(schedule_id).unwrap().is_empty());
    }

    #[test]
    fn test_assign_rejects_duplicate() {
        let (db, schedule_id, mentor_id) = seeded();
        assign_block(&db, schedule_id, mentor_id, 1, 10).unwrap();
        let err = assign_block(&db, schedule_id, mentor_id, 1, 10).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_move_to_own_slot_is_a_no_op() {
        let (db, schedule_id, mentor_id) = seeded();
        let block = assign_block(&db, schedule_id, mentor_id, 2, 14).unwrap();

        let outcome = move_block(&db, block.block_id, 2, 14).unwrap();
        assert!(!outcome.moved);
        assert_eq!(outcome.block.block_id, block.block_id);
        assert_eq!((outcome.block.weekday, outcome.block.hour), (2, 14));
    }

    #[test]
    fn test_move_changes_coordinates_in_place() {
        let (db, schedule_id, mentor_id) = seeded();
        let block = assign_block(&db, schedule_id, mentor_id, 2, 14).unwrap();

        let outcome = move_block(&db, block.block_id, 4, 16).unwrap();
        assert!(outcome.moved);
        assert_eq!(outcome.block.block_id, block.block_id);
        assert_eq!((outcome.block.weekday, outcome.block.hour), (4, 16));
    }

    #[test]
    fn test_remove_then_clear() {
        let (db, schedule_id, mentor_id) = seeded();
        let block = assign_block(&db, schedule_id, mentor_id, 1, 10).unwrap();
        assign_block(&db, schedule_id, mentor_id, 1, 11).unwrap();

        remove_block(&db, block.block_id).unwrap();
        assert_eq!(db.list_blocks(schedule_id).unwrap().len(), 1);

        let removed = clear_schedule(&db, schedule_id).unwrap();
        assert_eq!(removed, 1);
        assert!(db.list_blocks(schedule_id).unwrap().is_empty());
    }

    fn gesture(
        origin: (f64, f64),
        position: (f64, f64),
        source: Option<Slot>,
        target: Option<Slot>,
    ) -> DragGesture {
        DragGesture {
            origin,
            position,
            source,
            target,
        }
    }

    #[test]
    fn test_short_drag_is_a_click() {
        let payload = DragPayload {
            mentor_id: 1,
            block_id: Some(9),
        };
        let g = gesture((100.0, 100.0), (103.0, 102.0), Some(slot(1, 10)), Some(slot(2, 11)));
        assert_eq!(resolve_drag(payload, g), DragAction::Click);
    }

    #[test]
    fn test_drag_without_block_assigns() {
        let payload = DragPayload {
            mentor_id: 4,
            block_id: None,
        };
        let g = gesture((0.0, 0.0), (60.0, 0.0), None, Some(slot(3, 12)));
        assert_eq!(
            resolve_drag(payload, g),
            DragAction::Assign {
                mentor_id: 4,
                slot: slot(3, 12)
            }
        );
    }

    #[test]
    fn test_drag_with_block_moves() {
        let payload = DragPayload {
            mentor_id: 4,
            block_id: Some(17),
        };
        let g = gesture((0.0, 0.0), (0.0, 40.0), Some(slot(1, 10)), Some(slot(1, 14)));
        assert_eq!(
            resolve_drag(payload, g),
            DragAction::Move {
                block_id: 17,
                slot: slot(1, 14)
            }
        );
    }

    #[test]
    fn test_drag_back_to_own_cell_is_no_action() {
        let payload = DragPayload {
            mentor_id: 4,
            block_id: Some(17),
        };
        let g = gesture((0.0, 0.0), (50.0, 50.0), Some(slot(1, 10)), Some(slot(1, 10)));
        assert_eq!(resolve_drag(payload, g), DragAction::None);
    }

    #[test]
    fn test_drop_outside_grid_is_no_action() {
        let payload = DragPayload {
            mentor_id: 4,
            block_id: Some(17),
        };
        let g = gesture((0.0, 0.0), (200.0, 0.0), Some(slot(1, 10)), None);
        assert_eq!(resolve_drag(payload, g), DragAction::None);
    }
}
