//! Hoursme keeps a day planner's worth of data in plain delimited text
//! files: activity periods, daily reflections, and a todo list, all under
//! one user-chosen directory. The files stay hand-editable; the store
//! validates their headers, keeps activities sorted and non-overlapping,
//! and derives daily, weekly, and long-term views from them.

pub mod cli;
pub mod store;
pub mod utils;
