//! Shift based time tracking for editor save events. Continuous editing
//! activity is segmented into shifts by a 15 minute idle heuristic, closed
//! shifts are appended to per-month log files, and the raw entries can be
//! condensed into per-date, per-project reports.
//!

pub mod cli;
pub mod config;
pub mod session;
pub mod storage;
pub mod tracker;
pub mod utils;
