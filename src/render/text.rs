use std::fmt;

use crate::timetable::grid::slot_label;
use crate::timetable::{ScheduleEntry, Timetable};

/// `Display` adapter printing one line per non-empty day.
pub struct TimetableView<'a>(pub &'a Timetable);

impl fmt::Display for TimetableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.0.iter_days().filter(|d| !d.entries.is_empty()) {
            write!(f, "{}: ", day.name())?;
            for (i, entry) in day.entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_entry(f, entry)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &ScheduleEntry) -> fmt::Result {
    write!(
        f,
        "{} ({}) - {} - {} - {}",
        entry.title,
        entry.category,
        entry.instructor,
        slot_label(entry.start_index).unwrap_or("?"),
        slot_label(entry.end_index).unwrap_or("?"),
    )
}

pub fn render_text(timetable: &Timetable) -> String {
    TimetableView(timetable).to_string()
}
