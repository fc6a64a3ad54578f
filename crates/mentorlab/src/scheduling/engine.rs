//! The auto-fill planner.
//!
//! Given a snapshot of the active schedule's blocks and every eligible
//! mentor's availability, proposes a batch of new assignments subject to the
//! per-slot capacity and per-mentor load caps. The pass is a single
//! deterministic sweep in slot-major order (hours 10-17 ascending, weekdays
//! Monday-Friday within each hour), so re-running on identical input always
//! yields the identical proposal list.
//!
//! This is a best-effort heuristic, not an optimal matching: candidates are
//! taken greedily, fewest-assignments-first, with mentor id as the
//! tie-break. It only ever adds blocks; existing assignments are never
//! removed or replaced.

use std::collections::{HashMap, HashSet};

use crate::db::types::DbScheduleBlock;

use super::error::ScheduleError;
use super::grid;
use super::types::{AutoFillParameters, AutoFillPlan, MentorAvailability, ProposedAssignment, Slot};

/// Computes the batch of assignments to add, without writing anything.
///
/// # Arguments
/// * `term` - The term the availability belongs to, for error reporting
/// * `existing` - Current blocks of the schedule being filled
/// * `availability` - Per-mentor declared slots, pre-filtered to eligible mentors
/// * `params` - Capacity and load caps for this run
///
/// # Returns
/// * `Ok(AutoFillPlan)` - Ordered proposals plus the unfilled/unassigned report
/// * `Err` - If the parameters are unusable or there is no availability at all
pub fn plan_auto_fill(
    term: &str,
    existing: &[DbScheduleBlock],
    availability: &[MentorAvailability],
    params: &AutoFillParameters,
) -> Result<AutoFillPlan, ScheduleError> {
    params.validate()?;

    // Refuse to run on an empty availability store: zero proposals would be
    // indistinguishable from a successful no-op.
    if availability.iter().all(|a| a.slots.is_empty()) {
        return Err(ScheduleError::NoAvailability {
            term: term.to_string(),
        });
    }

    // Running counters seeded from pre-existing blocks so the caps count
    // what is already committed, not just this run's proposals.
    let mut slot_occupancy: HashMap<Slot, u32> = HashMap::new();
    let mut mentor_load: HashMap<i64, u32> = HashMap::new();
    let mut taken: HashSet<(i64, Slot)> = HashSet::new();

    for block in existing {
        let slot = Slot {
            weekday: block.weekday as u8,
            hour: block.hour as u8,
        };
        *slot_occupancy.entry(slot).or_insert(0) += 1;
        *mentor_load.entry(block.mentor_id).or_insert(0) += 1;
        taken.insert((block.mentor_id, slot));
    }

    let availability_sets: HashMap<i64, HashSet<Slot>> = availability
        .iter()
        .map(|a| (a.mentor_id, a.slots.iter().copied().collect()))
        .collect();
    let mentor_names: HashMap<i64, &str> = availability
        .iter()
        .map(|a| (a.mentor_id, a.mentor_name.as_str()))
        .collect();

    let mut proposed = Vec::new();
    let mut unfilled_slots = Vec::new();

    for slot in grid::slots_in_fill_order() {
        let mut occupancy = slot_occupancy.get(&slot).copied().unwrap_or(0);

        if params.fill_empty_only && occupancy >= params.max_per_slot {
            // Already filled; skip without evaluating candidates.
            continue;
        }

        if occupancy < params.max_per_slot {
            let mut candidates: Vec<i64> = availability
                .iter()
                .filter(|a| {
                    availability_sets[&a.mentor_id].contains(&slot)
                        && !taken.contains(&(a.mentor_id, slot))
                        && mentor_load.get(&a.mentor_id).copied().unwrap_or(0)
                            < params.max_slots_per_mentor
                })
                .map(|a| a.mentor_id)
                .collect();

            // Fewest total assignments first biases toward an even spread;
            // mentor id breaks ties so the order is stable across runs.
            candidates.sort_by_key(|id| (mentor_load.get(id).copied().unwrap_or(0), *id));

            for mentor_id in candidates {
                if occupancy >= params.max_per_slot {
                    break;
                }
                proposed.push(ProposedAssignment {
                    mentor_id,
                    mentor_name: mentor_names[&mentor_id].to_string(),
                    slot,
                });
                taken.insert((mentor_id, slot));
                *mentor_load.entry(mentor_id).or_insert(0) += 1;
                occupancy += 1;
            }

            slot_occupancy.insert(slot, occupancy);
        }

        if occupancy < params.max_per_slot {
            unfilled_slots.push(slot.label());
        }
    }

    let assigned_this_run: HashSet<i64> = proposed.iter().map(|p| p.mentor_id).collect();
    let unassigned_mentors: Vec<String> = availability
        .iter()
        .filter(|a| !assigned_this_run.contains(&a.mentor_id))
        .map(|a| a.mentor_name.clone())
        .collect();

    Ok(AutoFillPlan {
        proposed,
        unfilled_slots,
        unassigned_mentors,
    })
}
