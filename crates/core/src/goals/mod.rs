//! Monthly revenue goals and progress tracking.

pub mod error;
pub mod progress;
pub mod types;

pub use error::GoalError;
pub use progress::{GoalProgress, GoalStatus};
pub use types::{MonthlyGoal, validate_target};
