//! Advisory lab-traffic overlay.
//!
//! Historical average headcount per slot, shown alongside the grid so
//! officers can weight busy hours when reviewing a schedule. Strictly
//! advisory: nothing here ever constrains an assignment, and a failure to
//! load degrades to an empty overlay so the grid keeps working.

use std::collections::HashMap;

use tracing::warn;

use crate::db::types::DbTrafficDatum;
use crate::db::ScheduleDb;

/// Read model over a term's traffic history, keyed by slot coordinates.
#[derive(Debug, Default)]
pub struct TrafficOverlay {
    data: HashMap<(u8, u8), DbTrafficDatum>,
}

impl TrafficOverlay {
    /// Builds an overlay from stored rows, skipping any outside the grid.
    pub fn from_rows(rows: Vec<DbTrafficDatum>) -> Self {
        let mut data = HashMap::new();
        for row in rows {
            if !super::grid::weekday_in_range(row.weekday) || !super::grid::hour_in_range(row.hour)
            {
                warn!(
                    "Ignoring out-of-range traffic row ({}, {})",
                    row.weekday, row.hour
                );
                continue;
            }
            data.insert((row.weekday as u8, row.hour as u8), row);
        }
        Self { data }
    }

    /// Loads a term's overlay, degrading to empty if the store fails.
    pub fn load(db: &ScheduleDb, term: &str) -> Self {
        match db.list_traffic(term) {
            Ok(rows) => Self::from_rows(rows),
            Err(e) => {
                warn!("Traffic history unavailable for {}: {}", term, e);
                Self::default()
            }
        }
    }

    /// Average headcount for a slot, if any history exists.
    pub fn lookup(&self, weekday: u8, hour: u8) -> Option<&DbTrafficDatum> {
        self.data.get(&(weekday, hour))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(weekday: i64, hour: i64, avg: f64) -> DbTrafficDatum {
        DbTrafficDatum {
            term: "FA26".to_string(),
            weekday,
            hour,
            avg_people: avg,
            sample_count: 10,
        }
    }

    #[test]
    fn test_lookup_hits_and_misses() {
        let overlay = TrafficOverlay::from_rows(vec![datum(1, 10, 6.5), datum(2, 14, 12.0)]);

        assert_eq!(overlay.lookup(1, 10).unwrap().avg_people, 6.5);
        assert_eq!(overlay.lookup(2, 14).unwrap().sample_count, 10);
        assert!(overlay.lookup(3, 11).is_none());
    }

    #[test]
    fn test_out_of_range_rows_are_dropped() {
        let overlay = TrafficOverlay::from_rows(vec![datum(1, 10, 6.5), datum(0, 10, 1.0), datum(1, 9, 1.0)]);

        assert!(overlay.lookup(1, 10).is_some());
        assert!(overlay.lookup(0, 10).is_none());
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = TrafficOverlay::default();
        assert!(overlay.is_empty());
        assert!(overlay.lookup(1, 10).is_none());
    }
}
