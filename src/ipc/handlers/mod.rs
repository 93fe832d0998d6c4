pub mod batches;
pub mod catalog;
pub mod core;
pub mod exports;
pub mod institutes;
pub mod sessions;
pub mod students;
pub mod teachers;
