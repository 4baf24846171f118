use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::dates::{extract_window_end, extract_window_start};
use super::labels::{decompose_generated, Label};
use super::{ScheduleBuilder, ScheduleEntry, Timetable};

// The cell name is `c<day><slot>`: one digit of day followed by the start slot.
static CLASS_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)<td rowspan="(\d+)" id="c\d+" name="c(\d)(\d+)" class="classCell" "#,
        r#"align="center" bgcolor="(.*?)" valign="top"><h4>(.*?)</h4></td>"#,
    ))
    .unwrap()
});

/// Parses the server-generated timetable table.
///
/// The entry type is only present as the cell's `bgcolor`, which becomes the entry category.
/// A label no grammar understands yields an entry with empty text fields.
pub fn parse_generated_html(markup: &str) -> Timetable {
    let mut builder = ScheduleBuilder::new();
    let mut matched = 0;

    for caps in CLASS_CELL_RE.captures_iter(markup) {
        matched += 1;
        let (Ok(duration), Ok(day), Ok(start)) = (
            caps[1].parse::<i32>(),
            caps[2].parse::<u8>(),
            caps[3].parse::<i32>(),
        ) else {
            warn!("Skipping cell with unreadable numbers: {}", &caps[0]);
            continue;
        };
        let category = &caps[4];
        let text = &caps[5];

        let label = match decompose_generated(text) {
            Some((grammar, label)) => {
                debug!("Decoded '{}' as {}", label.title, grammar);
                label
            }
            None => {
                warn!("Label matched no grammar: {}", text);
                Label::default()
            }
        };

        let Some(entry) = ScheduleEntry::new(label, category, start, duration) else {
            warn!("Skipping cell with out of range slots: {}", &caps[0]);
            continue;
        };
        builder.push(day, entry);
    }
    debug!("Matched {} classCell entries", matched);

    builder.finish(extract_window_start(markup), extract_window_end(markup))
}
