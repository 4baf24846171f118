//! Timetable Parser
//!
//! Downloads the faculty's course timetable, extracts the weekly schedule from its
//! markup and exports it as plain text, PDF or an iCalendar feed.

pub mod client;
pub mod config;
pub mod render;
pub mod timetable;

pub use config::AppConfig;
pub use render::{write_timetable, OutputFormat};
pub use timetable::{parse_generated_html, parse_html, ScheduleEntry, Timetable};
