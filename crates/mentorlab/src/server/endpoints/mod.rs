pub mod autofill;
pub mod availability;
pub mod mentors;
pub mod schedule;
pub mod status;
pub mod traffic;
