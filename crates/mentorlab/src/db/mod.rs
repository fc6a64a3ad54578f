/// Database module for managing schedules, mentors, availability, and traffic

pub mod types;

pub use types::{DbAvailabilitySlot, DbMentor, DbSchedule, DbScheduleBlock, DbTrafficDatum};

use rusqlite::{Connection, OptionalExtension};
use std::sync::Mutex;

use crate::scheduling::error::ScheduleError;
use crate::scheduling::types::Slot;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_mentorlab.sql");

pub struct ScheduleDb {
    db: Mutex<Connection>,
}

impl ScheduleDb {
    /// Creates a new ScheduleDb and initializes the database schema
    pub fn new(db_path: &str) -> Self {
        let conn = Connection::open(db_path).expect("Failed to open database");

        conn.execute_batch(SCHEMA_SQL)
            .expect("Failed to initialize database schema");

        Self {
            db: Mutex::new(conn),
        }
    }

    /// Creates an in-memory store, used by tests
    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");

        conn.execute_batch(SCHEMA_SQL)
            .expect("Failed to initialize database schema");

        Self {
            db: Mutex::new(conn),
        }
    }

    // ---- schedules ----

    /// Creates a new (inactive) schedule
    pub fn create_schedule(&self, name: &str) -> Result<DbSchedule, ScheduleError> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO schedules (name, is_active, created_at) VALUES (?1, 0, datetime('now'))",
            [name],
        )?;
        let schedule_id = db.last_insert_rowid();
        drop(db);

        self.get_schedule(schedule_id)?
            .ok_or(ScheduleError::ScheduleNotFound { schedule_id })
    }

    pub fn list_schedules(&self) -> Result<Vec<DbSchedule>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT schedule_id, name, is_active, created_at FROM schedules ORDER BY schedule_id",
        )?;
        let schedules = stmt
            .query_map([], |row| {
                Ok(DbSchedule {
                    schedule_id: row.get(0)?,
                    name: row.get(1)?,
                    is_active: row.get::<_, i64>(2)? != 0,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(schedules)
    }

    pub fn get_schedule(&self, schedule_id: i64) -> Result<Option<DbSchedule>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let schedule = db
            .query_row(
                "SELECT schedule_id, name, is_active, created_at FROM schedules
                 WHERE schedule_id = ?",
                [schedule_id],
                |row| {
                    Ok(DbSchedule {
                        schedule_id: row.get(0)?,
                        name: row.get(1)?,
                        is_active: row.get::<_, i64>(2)? != 0,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(schedule)
    }

    /// Gets the single canonical schedule, if one has been activated
    pub fn active_schedule(&self) -> Result<Option<DbSchedule>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let schedule = db
            .query_row(
                "SELECT schedule_id, name, is_active, created_at FROM schedules
                 WHERE is_active = 1",
                [],
                |row| {
                    Ok(DbSchedule {
                        schedule_id: row.get(0)?,
                        name: row.get(1)?,
                        is_active: row.get::<_, i64>(2)? != 0,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(schedule)
    }

    /// Makes one schedule canonical, deactivating any previous one
    pub fn activate_schedule(&self, schedule_id: i64) -> Result<(), ScheduleError> {
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction()?;
        tx.execute("UPDATE schedules SET is_active = 0 WHERE is_active = 1", [])?;
        let updated = tx.execute(
            "UPDATE schedules SET is_active = 1 WHERE schedule_id = ?",
            [schedule_id],
        )?;
        if updated == 0 {
            // Rolls back on drop, leaving the previous active schedule intact.
            return Err(ScheduleError::ScheduleNotFound { schedule_id });
        }
        tx.commit()?;
        Ok(())
    }

    // ---- mentors ----

    pub fn create_mentor(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
        is_active: bool,
        expires_on: Option<&str>,
    ) -> Result<DbMentor, ScheduleError> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO mentors (user_id, name, email, is_active, expires_on, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
            (user_id, name, email, is_active as i64, expires_on),
        )?;
        let mentor_id = db.last_insert_rowid();
        drop(db);

        self.get_mentor(mentor_id)?
            .ok_or(ScheduleError::MentorNotFound { mentor_id })
    }

    pub fn get_mentor(&self, mentor_id: i64) -> Result<Option<DbMentor>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mentor = db
            .query_row(
                "SELECT mentor_id, user_id, name, email, is_active, expires_on, created_at
                 FROM mentors WHERE mentor_id = ?",
                [mentor_id],
                Self::mentor_from_row,
            )
            .optional()?;
        Ok(mentor)
    }

    pub fn list_mentors(&self) -> Result<Vec<DbMentor>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT mentor_id, user_id, name, email, is_active, expires_on, created_at
             FROM mentors ORDER BY mentor_id",
        )?;
        let mentors = stmt
            .query_map([], Self::mentor_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(mentors)
    }

    fn mentor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbMentor> {
        Ok(DbMentor {
            mentor_id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            is_active: row.get::<_, i64>(4)? != 0,
            expires_on: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    // ---- schedule blocks ----

    pub fn list_blocks(&self, schedule_id: i64) -> Result<Vec<DbScheduleBlock>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT block_id, schedule_id, mentor_id, weekday, hour, created_at
             FROM schedule_blocks WHERE schedule_id = ?
             ORDER BY hour, weekday, mentor_id",
        )?;
        let blocks = stmt
            .query_map([schedule_id], Self::block_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks)
    }

    pub fn get_block(&self, block_id: i64) -> Result<DbScheduleBlock, ScheduleError> {
        let db = self.db.lock().unwrap();
        db.query_row(
            "SELECT block_id, schedule_id, mentor_id, weekday, hour, created_at
             FROM schedule_blocks WHERE block_id = ?",
            [block_id],
            Self::block_from_row,
        )
        .optional()?
        .ok_or(ScheduleError::BlockNotFound { block_id })
    }

    /// Creates a block, rejecting a duplicate `(mentor, weekday, hour)` for
    /// the schedule. Multiple different mentors in one slot are allowed.
    pub fn create_block(
        &self,
        schedule_id: i64,
        mentor_id: i64,
        slot: Slot,
    ) -> Result<DbScheduleBlock, ScheduleError> {
        let db = self.db.lock().unwrap();

        if self.schedule_exists(&db, schedule_id)? == 0 {
            return Err(ScheduleError::ScheduleNotFound { schedule_id });
        }

        let existing: i64 = db.query_row(
            "SELECT COUNT(*) FROM schedule_blocks
             WHERE schedule_id = ?1 AND mentor_id = ?2 AND weekday = ?3 AND hour = ?4",
            (schedule_id, mentor_id, slot.weekday, slot.hour),
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(ScheduleError::DuplicateAssignment {
                mentor_id,
                slot_label: slot.label(),
            });
        }

        db.execute(
            "INSERT INTO schedule_blocks (schedule_id, mentor_id, weekday, hour, created_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))",
            (schedule_id, mentor_id, slot.weekday, slot.hour),
        )?;
        let block_id = db.last_insert_rowid();
        drop(db);

        self.get_block(block_id)
    }

    /// Updates a block's coordinates in place, preserving its id
    pub fn move_block(&self, block_id: i64, slot: Slot) -> Result<DbScheduleBlock, ScheduleError> {
        let db = self.db.lock().unwrap();
        let updated = db.execute(
            "UPDATE schedule_blocks SET weekday = ?1, hour = ?2 WHERE block_id = ?3",
            (slot.weekday, slot.hour, block_id),
        )?;
        drop(db);

        if updated == 0 {
            return Err(ScheduleError::BlockNotFound { block_id });
        }
        self.get_block(block_id)
    }

    pub fn delete_block(&self, block_id: i64) -> Result<(), ScheduleError> {
        let db = self.db.lock().unwrap();
        let deleted = db.execute("DELETE FROM schedule_blocks WHERE block_id = ?", [block_id])?;
        if deleted == 0 {
            return Err(ScheduleError::BlockNotFound { block_id });
        }
        Ok(())
    }

    /// Removes every block of a schedule in a single statement, returning
    /// the number of blocks removed
    pub fn clear_schedule(&self, schedule_id: i64) -> Result<usize, ScheduleError> {
        let db = self.db.lock().unwrap();
        if self.schedule_exists(&db, schedule_id)? == 0 {
            return Err(ScheduleError::ScheduleNotFound { schedule_id });
        }
        let removed = db.execute(
            "DELETE FROM schedule_blocks WHERE schedule_id = ?",
            [schedule_id],
        )?;
        Ok(removed)
    }

    fn block_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbScheduleBlock> {
        Ok(DbScheduleBlock {
            block_id: row.get(0)?,
            schedule_id: row.get(1)?,
            mentor_id: row.get(2)?,
            weekday: row.get(3)?,
            hour: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn schedule_exists(&self, db: &Connection, schedule_id: i64) -> Result<i64, ScheduleError> {
        let count: i64 = db.query_row(
            "SELECT COUNT(*) FROM schedules WHERE schedule_id = ?",
            [schedule_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ---- availability ----

    /// Replaces a mentor's submission for a term wholesale.
    ///
    /// A resubmission supersedes the previous set rather than merging with
    /// it; the delete and inserts commit together.
    pub fn replace_availability(
        &self,
        term: &str,
        mentor_id: i64,
        slots: &[Slot],
    ) -> Result<usize, ScheduleError> {
        let mut db = self.db.lock().unwrap();

        let mentor_count: i64 = db.query_row(
            "SELECT COUNT(*) FROM mentors WHERE mentor_id = ?",
            [mentor_id],
            |row| row.get(0),
        )?;
        if mentor_count == 0 {
            return Err(ScheduleError::MentorNotFound { mentor_id });
        }

        let tx = db.transaction()?;
        tx.execute(
            "DELETE FROM availability_slots WHERE term = ?1 AND mentor_id = ?2",
            (term, mentor_id),
        )?;
        for slot in slots {
            tx.execute(
                "INSERT INTO availability_slots (term, mentor_id, weekday, hour, created_at)
                 VALUES (?1, ?2, ?3, ?4, datetime('now'))",
                (term, mentor_id, slot.weekday, slot.hour),
            )?;
        }
        tx.commit()?;
        Ok(slots.len())
    }

    pub fn list_availability(&self, term: &str) -> Result<Vec<DbAvailabilitySlot>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT availability_id, term, mentor_id, weekday, hour
             FROM availability_slots WHERE term = ?
             ORDER BY mentor_id, weekday, hour",
        )?;
        let slots = stmt
            .query_map([term], |row| {
                Ok(DbAvailabilitySlot {
                    availability_id: row.get(0)?,
                    term: row.get(1)?,
                    mentor_id: row.get(2)?,
                    weekday: row.get(3)?,
                    hour: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }

    // ---- traffic ----

    /// Replaces a term's traffic history wholesale (fed by the headcount
    /// importer)
    pub fn replace_traffic(
        &self,
        term: &str,
        rows: &[(u8, u8, f64, i64)],
    ) -> Result<usize, ScheduleError> {
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction()?;
        tx.execute("DELETE FROM traffic WHERE term = ?", [term])?;
        for &(weekday, hour, avg_people, sample_count) in rows {
            tx.execute(
                "INSERT INTO traffic (term, weekday, hour, avg_people, sample_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (term, weekday, hour, avg_people, sample_count),
            )?;
        }
        tx.commit()?;
        Ok(rows.len())
    }

    pub fn list_traffic(&self, term: &str) -> Result<Vec<DbTrafficDatum>, ScheduleError> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT term, weekday, hour, avg_people, sample_count
             FROM traffic WHERE term = ? ORDER BY weekday, hour",
        )?;
        let rows = stmt
            .query_map([term], |row| {
                Ok(DbTrafficDatum {
                    term: row.get(0)?,
                    weekday: row.get(1)?,
                    hour: row.get(2)?,
                    avg_people: row.get(3)?,
                    sample_count: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (ScheduleDb, i64, i64) {
        let db = ScheduleDb::in_memory();
        let schedule = db.create_schedule("Fall 2026").unwrap();
        db.activate_schedule(schedule.schedule_id).unwrap();
        let mentor = db
            .create_mentor("u100", "Ada", "ada@club.edu", true, None)
            .unwrap();
        (db, schedule.schedule_id, mentor.mentor_id)
    }

    fn slot(weekday: u8, hour: u8) -> Slot {
        Slot { weekday, hour }
    }

    #[test]
    fn test_duplicate_block_is_rejected() {
        let (db, schedule_id, mentor_id) = seeded();

        db.create_block(schedule_id, mentor_id, slot(1, 10)).unwrap();
        let err = db
            .create_block(schedule_id, mentor_id, slot(1, 10))
            .unwrap_err();
        assert!(err.is_conflict());

        // The store still contains exactly one block for the triple.
        let blocks = db.list_blocks(schedule_id).unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_same_slot_accepts_different_mentors() {
        let (db, schedule_id, mentor_id) = seeded();
        let other = db
            .create_mentor("u101", "Grace", "grace@club.edu", true, None)
            .unwrap();

        db.create_block(schedule_id, mentor_id, slot(1, 10)).unwrap();
        db.create_block(schedule_id, other.mentor_id, slot(1, 10))
            .unwrap();
        assert_eq!(db.list_blocks(schedule_id).unwrap().len(), 2);
    }

    #[test]
    fn test_move_preserves_block_id() {
        let (db, schedule_id, mentor_id) = seeded();
        let block = db.create_block(schedule_id, mentor_id, slot(1, 10)).unwrap();

        let moved = db.move_block(block.block_id, slot(3, 14)).unwrap();
        assert_eq!(moved.block_id, block.block_id);
        assert_eq!(moved.weekday, 3);
        assert_eq!(moved.hour, 14);
        assert_eq!(db.list_blocks(schedule_id).unwrap().len(), 1);
    }

    #[test]
    fn test_move_unknown_block_is_not_found() {
        let (db, _, _) = seeded();
        let err = db.move_block(999, slot(1, 10)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_block() {
        let (db, schedule_id, mentor_id) = seeded();
        let block = db.create_block(schedule_id, mentor_id, slot(1, 10)).unwrap();

        db.delete_block(block.block_id).unwrap();
        assert!(db.list_blocks(schedule_id).unwrap().is_empty());
        assert!(db.delete_block(block.block_id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_clear_schedule_empties_grid() {
        let (db, schedule_id, mentor_id) = seeded();
        db.create_block(schedule_id, mentor_id, slot(1, 10)).unwrap();
        db.create_block(schedule_id, mentor_id, slot(2, 11)).unwrap();
        db.create_block(schedule_id, mentor_id, slot(3, 12)).unwrap();

        let removed = db.clear_schedule(schedule_id).unwrap();
        assert_eq!(removed, 3);
        assert!(db.list_blocks(schedule_id).unwrap().is_empty());
    }

    #[test]
    fn test_activate_schedule_is_exclusive() {
        let (db, first_id, _) = seeded();
        let second = db.create_schedule("Spring 2027").unwrap();

        db.activate_schedule(second.schedule_id).unwrap();
        let active = db.active_schedule().unwrap().unwrap();
        assert_eq!(active.schedule_id, second.schedule_id);
        assert!(!db.get_schedule(first_id).unwrap().unwrap().is_active);

        // Activating an unknown id leaves the current active untouched.
        assert!(db.activate_schedule(999).unwrap_err().is_not_found());
        let active = db.active_schedule().unwrap().unwrap();
        assert_eq!(active.schedule_id, second.schedule_id);
    }

    #[test]
    fn test_resubmission_supersedes_availability() {
        let (db, _, mentor_id) = seeded();

        db.replace_availability("FA26", mentor_id, &[slot(1, 10), slot(2, 11)])
            .unwrap();
        db.replace_availability("FA26", mentor_id, &[slot(5, 17)])
            .unwrap();

        let rows = db.list_availability("FA26").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].weekday, rows[0].hour), (5, 17));
    }

    #[test]
    fn test_availability_for_unknown_mentor() {
        let (db, _, _) = seeded();
        let err = db
            .replace_availability("FA26", 999, &[slot(1, 10)])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_traffic_roundtrip() {
        let (db, _, _) = seeded();
        db.replace_traffic("FA26", &[(1, 10, 6.5, 12), (2, 14, 11.0, 9)])
            .unwrap();

        let rows = db.list_traffic("FA26").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].avg_people, 6.5);
        assert!(db.list_traffic("SP27").unwrap().is_empty());
    }
}
