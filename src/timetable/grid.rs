//! Half-hour grid of the school day and the weekday names used by the faculty.

use chrono::NaiveTime;

/// Number of half-hour slots between 07:00 and 20:30.
pub const SLOT_COUNT: usize = 28;

pub const SLOT_LABELS: [&str; SLOT_COUNT] = [
    "07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30",
    "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00", "16:30",
    "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30",
];

pub const DAY_COUNT: u8 = 6;

pub const DAY_NAMES: [&str; DAY_COUNT as usize] =
    ["Ponedeljek", "Torek", "Sreda", "Cetrtek", "Petek", "Sobota"];

/// Label of a grid index, `None` when the index lies outside the school day.
pub fn slot_label(index: i32) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| SLOT_LABELS.get(i))
        .copied()
}

/// Wall-clock time of a grid index.
pub fn slot_time(index: i32) -> Option<NaiveTime> {
    let label = slot_label(index)?;
    NaiveTime::parse_from_str(label, "%H:%M").ok()
}

/// Name of a day number, 1 = Monday.
pub fn day_name(day: u8) -> Option<&'static str> {
    DAY_NAMES.get(usize::from(day).checked_sub(1)?).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_the_school_day() {
        assert_eq!(SLOT_LABELS[0], "07:00");
        assert_eq!(SLOT_LABELS[SLOT_COUNT - 1], "20:30");
        for pair in SLOT_LABELS.windows(2) {
            let a = NaiveTime::parse_from_str(pair[0], "%H:%M").unwrap();
            let b = NaiveTime::parse_from_str(pair[1], "%H:%M").unwrap();
            assert_eq!((b - a).num_minutes(), 30);
        }
    }

    #[test]
    fn lookups_are_bounds_checked() {
        assert_eq!(slot_label(14), Some("14:00"));
        assert_eq!(slot_label(-1), None);
        assert_eq!(slot_label(28), None);
        assert_eq!(slot_time(3), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(day_name(1), Some("Ponedeljek"));
        assert_eq!(day_name(6), Some("Sobota"));
        assert_eq!(day_name(0), None);
        assert_eq!(day_name(7), None);
    }
}
