//! Storage is organized through [record_store::LocalStore].
//! The basic idea is:
//!  - There is one storage root directory the user picks (or the default).
//!  - Each collection is a delimited text file with a header row; column
//!    order is whatever the header declares.
//!  - Activities are kept sorted by start time on disk; reflections and
//!    todos are plain append / whole rewrite.
//!  - A missing file reads as an empty collection and gets its header
//!    written on first save.

pub mod csv;
pub mod entities;
pub mod error;
pub mod record_store;
pub mod schema;
