pub mod category_ops;
pub mod handlers;
pub mod recurrence;
pub mod search;
pub mod task_ops;

pub use handlers::{PendingUpdate, PlanError, Planner, TargetCategory, UpdateOutcome};
pub use recurrence::Scope;
