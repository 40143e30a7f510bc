pub mod document;
pub mod task;

pub use document::{Change, ChangeHub, Document};
pub use task::{count_completed, count_incomplete, count_total, find_in, find_in_mut, Task};
