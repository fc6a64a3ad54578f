//! The fixed weekly coordinate space and pure aggregation helpers.
//!
//! The grid is always exactly 40 cells: weekdays 1-5 (Monday-Friday) by lab
//! hours 10-17. Everything here is a pure function over sparse collections
//! keyed by `(weekday, hour)`.

use std::collections::HashMap;

use tracing::warn;

use super::types::{MentorAvailability, Slot};

pub const WEEKDAY_MIN: u8 = 1;
pub const WEEKDAY_MAX: u8 = 5;
pub const HOUR_MIN: u8 = 10;
pub const HOUR_MAX: u8 = 17;

/// Total number of cells in the weekly grid.
pub const SLOT_COUNT: usize =
    (WEEKDAY_MAX - WEEKDAY_MIN + 1) as usize * (HOUR_MAX - HOUR_MIN + 1) as usize;

pub fn weekday_in_range(weekday: i64) -> bool {
    (WEEKDAY_MIN as i64..=WEEKDAY_MAX as i64).contains(&weekday)
}

pub fn hour_in_range(hour: i64) -> bool {
    (HOUR_MIN as i64..=HOUR_MAX as i64).contains(&hour)
}

/// Canonical lookup key for a cell, `"{weekday}-{hour}"`.
pub fn slot_key(weekday: u8, hour: u8) -> String {
    format!("{}-{}", weekday, hour)
}

/// Display name for a weekday index.
pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Unknown",
    }
}

/// All 40 slots in the deterministic auto-fill order: hours ascending, then
/// weekdays Monday through Friday within each hour.
pub fn slots_in_fill_order() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(SLOT_COUNT);
    for hour in HOUR_MIN..=HOUR_MAX {
        for weekday in WEEKDAY_MIN..=WEEKDAY_MAX {
            slots.push(Slot { weekday, hour });
        }
    }
    slots
}

/// Membership test over a flat slot list.
///
/// Used by the per-mentor availability editing surface where n <= 40, so the
/// linear scan is fine.
pub fn is_selected(slots: &[Slot], weekday: u8, hour: u8) -> bool {
    slots
        .iter()
        .any(|s| s.weekday == weekday && s.hour == hour)
}

/// Inverts per-mentor availability into "who is available in slot X".
///
/// Stored rows outside the grid are skipped (with a warning) rather than
/// entering the aggregate; names within a slot keep the entry order.
pub fn aggregate_availability(entries: &[MentorAvailability]) -> HashMap<String, Vec<String>> {
    let mut aggregated: HashMap<String, Vec<String>> = HashMap::new();

    for entry in entries {
        for slot in &entry.slots {
            if !weekday_in_range(slot.weekday as i64) || !hour_in_range(slot.hour as i64) {
                warn!(
                    "Ignoring out-of-range availability slot ({}, {}) for mentor {}",
                    slot.weekday, slot.hour, entry.mentor_id
                );
                continue;
            }
            aggregated
                .entry(slot.key())
                .or_default()
                .push(entry.mentor_name.clone());
        }
    }

    aggregated
}

/// Lookup into an aggregate with an empty-list default, so callers can
/// iterate unconditionally.
pub fn slot_availability<'a>(
    aggregated: &'a HashMap<String, Vec<String>>,
    weekday: u8,
    hour: u8,
) -> &'a [String] {
    aggregated
        .get(&slot_key(weekday, hour))
        .map(|names| names.as_slice())
        .unwrap_or(&[])
}
