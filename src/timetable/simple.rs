use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::dates::{extract_window_end, extract_window_start};
use super::labels::{decompose_lecture, Label};
use super::{ScheduleBuilder, ScheduleEntry, Timetable};

static INSERT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)insertText\((\d+),(\d+),"(.*?)", (\d+), 'course'\);?"#).unwrap()
});

/// Parses the simple timetable page, where every entry is an `insertText(..)` call.
///
/// Labels that do not follow the lecture grammar keep their raw text as the title.
pub fn parse_html(markup: &str) -> Timetable {
    let mut builder = ScheduleBuilder::new();
    let mut matched = 0;

    for caps in INSERT_TEXT_RE.captures_iter(markup) {
        matched += 1;
        let (Ok(day), Ok(start), Ok(duration)) = (
            caps[1].parse::<u8>(),
            caps[2].parse::<i32>(),
            caps[4].parse::<i32>(),
        ) else {
            warn!("Skipping entry with unreadable numbers: {}", &caps[0]);
            continue;
        };

        let text = &caps[3];
        let label = decompose_lecture(text).unwrap_or_else(|| {
            warn!("Label did not match the lecture grammar: {}", text);
            Label::raw(text)
        });

        let Some(entry) = ScheduleEntry::new(label, "", start, duration) else {
            warn!("Skipping entry with out of range slots: {}", &caps[0]);
            continue;
        };
        builder.push(day, entry);
    }
    debug!("Matched {} insertText entries", matched);

    builder.finish(extract_window_start(markup), extract_window_end(markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry() {
        let markup = r#"insertText(1,15,"Algorithms - J. Smith, P1, x, y;<br>note", 2, 'course')"#;
        let timetable = parse_html(markup);

        let monday = &timetable.day(1).unwrap().entries;
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].title, "Algorithms");
        assert_eq!(monday[0].instructor, "J. Smith");
        assert_eq!(monday[0].location, "P1");
        assert_eq!(monday[0].category, "");
        assert_eq!((monday[0].start_index, monday[0].end_index), (14, 16));
        assert_eq!(timetable.window_start, "");
    }

    #[test]
    fn unmatched_label_keeps_raw_title() {
        let markup = r#"INSERTTEXT(2,3,"Tutorial hour", 1, 'course');"#;
        let timetable = parse_html(markup);

        let entry = &timetable.day(2).unwrap().entries[0];
        assert_eq!(entry.title, "Tutorial hour");
        assert_eq!(entry.instructor, "");
        assert_eq!(entry.location, "");
        assert_eq!((entry.start_index, entry.end_index), (2, 3));
    }

    #[test]
    fn entries_on_unknown_days_are_dropped() {
        let markup = r#"insertText(9,1,"X - Y, Z, a, b;<br>c", 1, 'course');
insertText(5,1,"X - Y, Z, a, b;<br>c", 1, 'course');"#;
        let timetable = parse_html(markup);
        assert_eq!(timetable.entry_count(), 1);
        assert_eq!(timetable.day(5).unwrap().entries.len(), 1);
    }

    #[test]
    fn entries_with_extreme_numbers_are_skipped() {
        let markup = r#"
insertText(1,2000000000,"X - Y, Z, a, b;<br>c", 2000000000, 'course');
insertText(1,99999999999,"X - Y, Z, a, b;<br>c", 1, 'course');
insertText(1,4,"Kept - Y, Z, a, b;<br>c", 2, 'course');
"#;
        let timetable = parse_html(markup);

        let monday = &timetable.day(1).unwrap().entries;
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].title, "Kept");
        assert_eq!((monday[0].start_index, monday[0].end_index), (3, 5));
    }
}
