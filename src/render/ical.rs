//! iCalendar feed with one event per timetable entry.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use ical::generator::{Emitter, IcalCalendarBuilder, IcalEvent, Property};
use ical::ical_property;
use log::warn;

use crate::timetable::grid::slot_time;
use crate::timetable::{ScheduleEntry, Timetable};

const PRODID: &str = "-//timetable-parser//EN";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Builds the calendar. Events are anchored on the Monday heading of the timetable;
/// grid times are written as UTC.
pub fn render_ical(timetable: &Timetable, facility: &str, stamp: DateTime<Utc>) -> Result<String> {
    let monday = NaiveDate::parse_from_str(&timetable.window_start, "%d.%m.%Y")
        .with_context(|| format!("Invalid timetable start date '{}'", timetable.window_start))?;
    let stamp = stamp.format(STAMP_FORMAT).to_string();

    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PRODID)
        .build();

    for day in timetable.iter_days() {
        let date = monday + Duration::days(i64::from(day.day) - 1);
        for (i, entry) in day.entries.iter().enumerate() {
            let Some((start, end)) = event_times(date, entry) else {
                warn!(
                    "Skipping '{}': slots {}..{} are outside the grid",
                    entry.title, entry.start_index, entry.end_index
                );
                continue;
            };

            let mut event = IcalEvent::new();
            event.properties = vec![
                ical_property!(
                    "UID",
                    format!("{}-{}-{}@timetable-parser", date.format("%Y%m%d"), entry.start_index, i)
                ),
                ical_property!("DTSTAMP", stamp.as_str()),
                ical_property!("DTSTART", start.format(STAMP_FORMAT).to_string()),
                ical_property!("DTEND", end.format(STAMP_FORMAT).to_string()),
                ical_property!("SUMMARY", format!("{} ({})", entry.title, entry.category)),
                ical_property!("LOCATION", format!("{} - {}", facility, entry.location)),
            ];
            calendar.events.push(event);
        }
    }

    Ok(calendar.generate())
}

fn event_times(date: NaiveDate, entry: &ScheduleEntry) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = slot_time(entry.start_index)?;
    let end = slot_time(entry.end_index)?;
    Some((date.and_time(start), date.and_time(end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::parse_generated_html;
    use chrono::TimeZone;

    fn cell(rowspan: u32, day: u8, slot: u32, label: &str) -> String {
        format!(
            r#"<td rowspan="{rowspan}" id="c1" name="c{day}{slot}" class="classCell" align="center" bgcolor="PR" valign="top"><h4>{label}</h4></td>"#
        )
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn events_are_anchored_on_the_window_start() {
        let markup = format!(
            "<h2>Pon, 3.3.2025</h2><h2>Sob, 8.3.2025</h2>{}",
            cell(4, 3, 5, "Compilers - M. Kralj, G2-P02, RIT, 2;<br>UN")
        );
        let calendar = render_ical(&parse_generated_html(&markup), "FERI", stamp()).unwrap();

        assert!(calendar.starts_with("BEGIN:VCALENDAR"));
        assert!(calendar.contains("VERSION:2.0"));
        assert!(calendar.trim_end().ends_with("END:VCALENDAR"));
        assert!(calendar.contains("DTSTART:20250305T090000Z"));
        assert!(calendar.contains("DTEND:20250305T110000Z"));
        assert!(calendar.contains("SUMMARY:Compilers (PR)"));
        assert!(calendar.contains("LOCATION:FERI - G2-P02"));
        assert!(calendar.contains("DTSTAMP:20250301T120000Z"));
        assert_eq!(calendar.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn entries_outside_the_grid_are_skipped() {
        let markup = format!("<h2>Pon, 3.3.2025</h2>{}", cell(4, 1, 27, "Late<br>LV G1 Kos"));
        let calendar = render_ical(&parse_generated_html(&markup), "FERI", stamp()).unwrap();
        assert!(!calendar.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn missing_window_start_is_an_error() {
        let markup = cell(2, 1, 1, "Networks<br>LV G3 Zupan");
        assert!(render_ical(&parse_generated_html(&markup), "FERI", stamp()).is_err());
    }

    #[test]
    fn one_event_per_entry_across_days() {
        let markup = format!(
            "<h2>Pon, 3.3.2025</h2>{}{}",
            cell(2, 1, 1, "Networks<br>LV G3 Zupan"),
            cell(2, 6, 3, "Sport<br>SV Hall Kos")
        );
        let calendar = render_ical(&parse_generated_html(&markup), "FERI", stamp()).unwrap();
        assert_eq!(calendar.matches("BEGIN:VEVENT").count(), 2);
        assert!(calendar.contains("DTSTART:20250303T070000Z"));
        assert!(calendar.contains("DTSTART:20250308T080000Z"));
    }
}
