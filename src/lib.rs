//! Board-state core for a calendar-matrix task planner.
//!
//! The crate owns the domain logic behind the planner UI: an undoable
//! board store ([`history::UndoableStore`]), the recurring-series
//! engine ([`ops::recurrence`]), the sliding three-week calendar window
//! ([`window::WeekWindow`]), and the mutation handlers that pair
//! optimistic board edits with persistence calls and targeted rollback
//! ([`ops::handlers::Planner`]). Rendering and gesture capture live in
//! the embedding presentation layer; remote storage is anything that
//! implements [`io::Backend`].

pub mod history;
pub mod io;
pub mod model;
pub mod ops;
pub mod util;
pub mod window;
