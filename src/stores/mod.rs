//! One store per backend resource. Each owns its collection cache and
//! the exact paths and response envelopes its resource uses — the
//! backend is not consistent across resources, so neither are these.

pub mod attendance;
pub mod batch_classes;
pub mod batch_students;
pub mod batches;
pub mod class_sessions;
pub mod course_batches;
pub mod courses;
pub mod institutes;
pub mod locations;
pub mod session_years;
pub mod students;
pub mod subjects;
pub mod teachers;
