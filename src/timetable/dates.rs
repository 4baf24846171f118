use std::sync::LazyLock;

use regex::{Captures, Regex};

static WINDOW_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h2>Pon, (\d+)\.(\d+)\.(\d+)</h2>").unwrap());
static WINDOW_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h2>Sob, (\d+)\.(\d+)\.(\d+)</h2>").unwrap());

/// Monday heading of the timetable as `DD.MM.YYYY`, or an empty string.
pub fn extract_window_start(markup: &str) -> String {
    first_date(&WINDOW_START_RE, markup)
}

/// Saturday heading of the timetable as `DD.MM.YYYY`, or an empty string.
pub fn extract_window_end(markup: &str) -> String {
    first_date(&WINDOW_END_RE, markup)
}

fn first_date(pattern: &Regex, markup: &str) -> String {
    pattern
        .captures(markup)
        .map(|caps| format_date(&caps))
        .unwrap_or_default()
}

fn format_date(caps: &Captures) -> String {
    format!("{:0>2}.{:0>2}.{}", &caps[1], &caps[2], &caps[3])
}
