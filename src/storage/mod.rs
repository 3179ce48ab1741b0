//! Persistence of closed shifts.
//! The basic idea is:
//!  - There is one physical log file per calendar month, named
//!    `<prefix>--<YYYY-MM>`.
//!  - The structured log appends one JSON entry per line under a file lock.
//!  - A plain text log with the same stem can be written alongside for
//!    reading by hand.

pub mod entities;
pub mod log_reader;
pub mod log_writer;
