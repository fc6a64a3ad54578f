/// Lab scheduling subsystem: grid model, auto-fill engine, manual editor
pub mod editor;
pub mod engine;
pub mod error;
pub mod grid;
pub mod traffic;
pub mod types;

pub use error::ScheduleError;
pub use types::{AutoFillParameters, AutoFillPlan, AutoFillReport, MentorAvailability, Slot};

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::db::types::DbMentor;
use crate::db::ScheduleDb;

use types::FailedAssignment;

/// Returns true if a mentor may feed the auto-fill engine: active, and not
/// past their expiration date.
pub fn mentor_is_eligible(mentor: &DbMentor, today: NaiveDate) -> bool {
    if !mentor.is_active {
        return false;
    }
    match &mentor.expires_on {
        None => true,
        Some(date) => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(expiry) => expiry >= today,
            Err(_) => {
                warn!(
                    "Mentor {} has unparseable expiration date {:?}; treating as expired",
                    mentor.mentor_id, date
                );
                false
            }
        },
    }
}

/// Loads a term's availability submissions grouped per mentor, restricted to
/// the given mentors.
pub fn load_availability(
    db: &ScheduleDb,
    term: &str,
    mentors: &[DbMentor],
) -> Result<Vec<MentorAvailability>, ScheduleError> {
    let names: HashMap<i64, &str> = mentors
        .iter()
        .map(|m| (m.mentor_id, m.name.as_str()))
        .collect();

    let mut grouped: HashMap<i64, Vec<Slot>> = HashMap::new();
    for row in db.list_availability(term)? {
        if !names.contains_key(&row.mentor_id) {
            continue; // submission from outside the given roster
        }
        grouped.entry(row.mentor_id).or_default().push(Slot {
            weekday: row.weekday as u8,
            hour: row.hour as u8,
        });
    }

    // Mentor-id order keeps the engine input (and thus its output) stable.
    let mut availability: Vec<MentorAvailability> = grouped
        .into_iter()
        .map(|(mentor_id, slots)| MentorAvailability {
            mentor_id,
            mentor_name: names[&mentor_id].to_string(),
            slots,
        })
        .collect();
    availability.sort_by_key(|a| a.mentor_id);
    Ok(availability)
}

/// Plans and applies an auto-fill run against one schedule.
///
/// The plan is computed from a snapshot fetched once; proposals are then
/// persisted one by one. A proposal that fails to persist is recorded in the
/// report and the rest of the batch still applies.
pub fn run_auto_fill(
    db: &ScheduleDb,
    schedule_id: i64,
    term: &str,
    params: &AutoFillParameters,
    today: NaiveDate,
) -> Result<AutoFillReport, ScheduleError> {
    if db.get_schedule(schedule_id)?.is_none() {
        return Err(ScheduleError::ScheduleNotFound { schedule_id });
    }

    let mentors = db.list_mentors()?;
    let eligible: Vec<DbMentor> = mentors
        .into_iter()
        .filter(|m| mentor_is_eligible(m, today))
        .collect();

    let availability = load_availability(db, term, &eligible)?;
    let existing = db.list_blocks(schedule_id)?;

    info!(
        "Auto-fill on schedule {}: {} eligible mentors with availability, {} existing blocks",
        schedule_id,
        availability.len(),
        existing.len()
    );

    let plan = engine::plan_auto_fill(term, &existing, &availability, params)?;
    Ok(apply_plan(db, schedule_id, plan))
}

/// Persists a plan's proposals sequentially, accumulating per-item failures
/// instead of aborting the batch.
pub fn apply_plan(db: &ScheduleDb, schedule_id: i64, plan: AutoFillPlan) -> AutoFillReport {
    let mut assignments = 0;
    let mut failures = Vec::new();

    for proposal in &plan.proposed {
        match db.create_block(schedule_id, proposal.mentor_id, proposal.slot) {
            Ok(_) => assignments += 1,
            Err(e) => {
                warn!(
                    "Failed to assign {} to {}: {}",
                    proposal.mentor_name,
                    proposal.slot.label(),
                    e
                );
                failures.push(FailedAssignment {
                    mentor_name: proposal.mentor_name.clone(),
                    slot_label: proposal.slot.label(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Auto-fill applied {} of {} proposals on schedule {}",
        assignments,
        plan.proposed.len(),
        schedule_id
    );

    AutoFillReport {
        assignments,
        unfilled_slots: plan.unfilled_slots,
        unassigned_mentors: plan.unassigned_mentors,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::types::ProposedAssignment;
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn mentor_row(mentor_id: i64, is_active: bool, expires_on: Option<&str>) -> DbMentor {
        DbMentor {
            mentor_id,
            user_id: format!("u{}", mentor_id),
            name: format!("Mentor {}", mentor_id),
            email: format!("m{}@club.edu", mentor_id),
            is_active,
            expires_on: expires_on.map(str::to_string),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_eligibility_rules() {
        assert!(mentor_is_eligible(&mentor_row(1, true, None), today()));
        assert!(mentor_is_eligible(
            &mentor_row(1, true, Some("2027-06-30")),
            today()
        ));
        assert!(!mentor_is_eligible(&mentor_row(1, false, None), today()));
        assert!(!mentor_is_eligible(
            &mentor_row(1, true, Some("2026-05-01")),
            today()
        ));
        assert!(!mentor_is_eligible(
            &mentor_row(1, true, Some("not a date")),
            today()
        ));
    }

    #[test]
    fn test_run_auto_fill_single_mentor() {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        let ada = db
            .create_mentor("u1", "Ada", "ada@club.edu", true, None)
            .unwrap();
        db.replace_availability("FA26", ada.mentor_id, &[Slot { weekday: 1, hour: 10 }])
            .unwrap();

        let report = run_auto_fill(
            &db,
            schedule.schedule_id,
            "FA26",
            &AutoFillParameters::default(),
            today(),
        )
        .unwrap();

        assert_eq!(report.assignments, 1);
        assert!(report.failures.is_empty());
        assert!(report.unassigned_mentors.is_empty());

        let blocks = db.list_blocks(schedule.schedule_id).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].mentor_id, ada.mentor_id);
        assert_eq!((blocks[0].weekday, blocks[0].hour), (1, 10));
    }

    #[test]
    fn test_rerun_adds_nothing_new() {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        let ada = db
            .create_mentor("u1", "Ada", "ada@club.edu", true, None)
            .unwrap();
        db.replace_availability("FA26", ada.mentor_id, &[Slot { weekday: 1, hour: 10 }])
            .unwrap();

        let params = AutoFillParameters::default();
        run_auto_fill(&db, schedule.schedule_id, "FA26", &params, today()).unwrap();
        let second = run_auto_fill(&db, schedule.schedule_id, "FA26", &params, today()).unwrap();

        assert_eq!(second.assignments, 0);
        assert!(second.failures.is_empty());
        assert_eq!(db.list_blocks(schedule.schedule_id).unwrap().len(), 1);
    }

    #[test]
    fn test_ineligible_mentors_are_excluded() {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        let expired = db
            .create_mentor("u1", "Old Guard", "og@club.edu", true, Some("2020-01-01"))
            .unwrap();
        db.replace_availability("FA26", expired.mentor_id, &[Slot { weekday: 1, hour: 10 }])
            .unwrap();

        let err = run_auto_fill(
            &db,
            schedule.schedule_id,
            "FA26",
            &AutoFillParameters::default(),
            today(),
        )
        .unwrap_err();

        // The only submission came from an expired mentor, so there is
        // nothing to do.
        assert!(matches!(err, ScheduleError::NoAvailability { .. }));
    }

    #[test]
    fn test_apply_plan_partial_failure() {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        let ada = db
            .create_mentor("u1", "Ada", "ada@club.edu", true, None)
            .unwrap();
        // A manual edit lands between planning and application.
        db.create_block(schedule.schedule_id, ada.mentor_id, Slot { weekday: 1, hour: 10 })
            .unwrap();

        let plan = AutoFillPlan {
            proposed: vec![
                ProposedAssignment {
                    mentor_id: ada.mentor_id,
                    mentor_name: "Ada".to_string(),
                    slot: Slot { weekday: 1, hour: 10 },
                },
                ProposedAssignment {
                    mentor_id: ada.mentor_id,
                    mentor_name: "Ada".to_string(),
                    slot: Slot { weekday: 2, hour: 11 },
                },
            ],
            unfilled_slots: vec![],
            unassigned_mentors: vec![],
        };

        let report = apply_plan(&db, schedule.schedule_id, plan);

        // The colliding proposal is reported; the rest of the batch applied.
        assert_eq!(report.assignments, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slot_label, "Monday 10:00");
        assert_eq!(db.list_blocks(schedule.schedule_id).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_schedule_is_not_found() {
        let db = ScheduleDb::in_memory();
        let err = run_auto_fill(&db, 42, "FA26", &AutoFillParameters::default(), today())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
