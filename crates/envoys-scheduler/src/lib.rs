pub mod scheduler;

pub use scheduler::{TaskId, TickScheduler};
