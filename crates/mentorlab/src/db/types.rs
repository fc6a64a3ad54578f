/// Database types for the lab scheduling data

#[derive(Debug, Clone)]
pub struct DbSchedule {
    pub schedule_id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct DbMentor {
    pub mentor_id: i64,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub expires_on: Option<String>, // "YYYY-MM-DD"
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct DbScheduleBlock {
    pub block_id: i64,
    pub schedule_id: i64,
    pub mentor_id: i64,
    pub weekday: i64,
    pub hour: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct DbAvailabilitySlot {
    pub availability_id: i64,
    pub term: String,
    pub mentor_id: i64,
    pub weekday: i64,
    pub hour: i64,
}

#[derive(Debug, Clone)]
pub struct DbTrafficDatum {
    pub term: String,
    pub weekday: i64,
    pub hour: i64,
    pub avg_people: f64,
    pub sample_count: i64,
}
