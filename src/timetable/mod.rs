//! Timetable Extraction Module
//!
//! Turns the faculty's timetable markup into a day-indexed schedule. Two markup
//! dialects are understood: the simple page driven by `insertText(..)` calls and
//! the server-generated table layout.

mod dates;
mod generated;
pub mod grid;
mod labels;
mod simple;

use std::collections::BTreeMap;

use log::warn;

pub use dates::{extract_window_end, extract_window_start};
pub use generated::parse_generated_html;
pub use labels::{decompose_generated, decompose_lecture, Grammar, Label};
pub use simple::parse_html;

/// One occupied span of grid slots on one day.
///
/// The entry covers grid positions `[start_index, end_index)`. Indices come straight
/// from the markup and are not range checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub title: String,
    pub category: String,
    pub instructor: String,
    pub location: String,
    pub start_index: i32,
    pub end_index: i32,
}

impl ScheduleEntry {
    /// Builds an entry from a 1-based start slot and a slot count.
    ///
    /// Returns `None` when the indices do not fit in an `i32`.
    pub fn new(label: Label, category: &str, start_slot: i32, duration: i32) -> Option<Self> {
        let start_index = start_slot.checked_sub(1)?;
        let end_index = start_slot.checked_add(duration)?.checked_sub(1)?;
        Some(Self {
            title: label.title,
            category: category.to_string(),
            instructor: label.instructor,
            location: label.location,
            start_index,
            end_index,
        })
    }

    /// Whether the entry occupies the given grid index.
    pub fn covers(&self, index: i32) -> bool {
        self.start_index <= index && index < self.end_index
    }
}

/// Entries of one weekday in markup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: u8,
    pub entries: Vec<ScheduleEntry>,
}

impl DaySchedule {
    fn new(day: u8) -> Self {
        Self {
            day,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        grid::day_name(self.day).unwrap_or("?")
    }
}

/// A parsed timetable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    /// First day of the validity window as `DD.MM.YYYY`, empty when absent.
    pub window_start: String,
    /// Last day of the validity window as `DD.MM.YYYY`, empty when absent.
    pub window_end: String,
    /// Day number (1 = Monday .. 6 = Saturday) to its entries. Always holds all six days.
    pub days: BTreeMap<u8, DaySchedule>,
}

impl Timetable {
    pub fn day(&self, day: u8) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    /// Days in order, Monday first.
    pub fn iter_days(&self) -> impl Iterator<Item = &DaySchedule> {
        self.days.values()
    }

    pub fn entry_count(&self) -> usize {
        self.days.values().map(|d| d.entries.len()).sum()
    }
}

/// Collects entries into six day buckets.
#[derive(Debug)]
pub struct ScheduleBuilder {
    buckets: Vec<DaySchedule>,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self {
            buckets: (1..=grid::DAY_COUNT).map(DaySchedule::new).collect(),
        }
    }

    /// Appends an entry to its day. Returns `false` for day numbers outside 1..=6.
    pub fn push(&mut self, day: u8, entry: ScheduleEntry) -> bool {
        match self.buckets.iter_mut().find(|bucket| bucket.day == day) {
            Some(bucket) => {
                bucket.entries.push(entry);
                true
            }
            None => {
                warn!("Skipping entry '{}' on unknown day {}", entry.title, day);
                false
            }
        }
    }

    pub fn finish(self, window_start: String, window_end: String) -> Timetable {
        Timetable {
            window_start,
            window_end,
            days: self
                .buckets
                .into_iter()
                .map(|bucket| (bucket.day, bucket))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, start_slot: i32, duration: i32) -> ScheduleEntry {
        ScheduleEntry::new(
            Label {
                title: title.to_string(),
                ..Label::default()
            },
            "",
            start_slot,
            duration,
        )
        .unwrap()
    }

    #[test]
    fn slots_become_zero_based_half_open_indices() {
        let e = entry("Algorithms", 15, 2);
        assert_eq!((e.start_index, e.end_index), (14, 16));
        assert!(!e.covers(13));
        assert!(e.covers(14));
        assert!(e.covers(15));
        assert!(!e.covers(16));
    }

    #[test]
    fn indices_that_overflow_are_rejected() {
        let label = Label::raw("X");
        assert_eq!(ScheduleEntry::new(label.clone(), "", 2_000_000_000, 2_000_000_000), None);
        assert_eq!(ScheduleEntry::new(label.clone(), "", i32::MIN, 1), None);
        let e = ScheduleEntry::new(label, "", 0, 1).unwrap();
        assert_eq!((e.start_index, e.end_index), (-1, 0));
    }

    #[test]
    fn empty_builder_yields_all_six_days() {
        let timetable = ScheduleBuilder::new().finish(String::new(), String::new());
        assert_eq!(timetable.days.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert!(timetable.iter_days().all(|d| d.entries.is_empty()));
        assert_eq!(timetable.entry_count(), 0);
    }

    #[test]
    fn push_keeps_encounter_order_and_rejects_unknown_days() {
        let mut builder = ScheduleBuilder::new();
        assert!(builder.push(3, entry("Late", 20, 2)));
        assert!(builder.push(3, entry("Early", 1, 2)));
        assert!(!builder.push(0, entry("Nowhere", 1, 1)));
        assert!(!builder.push(7, entry("Nowhere", 1, 1)));

        let timetable = builder.finish("01.01.2024".into(), String::new());
        let titles: Vec<_> = timetable.day(3).unwrap().entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Late", "Early"]);
        assert_eq!(timetable.entry_count(), 2);
        assert_eq!(timetable.day(3).unwrap().name(), "Sreda");
    }
}
