//! Label grammars of timetable entries.
//!
//! A lecture label reads `NAME - INSTRUCTOR, LOCATION, <filler>, TAIL;<br>REST`. Reservations
//! (lab and exercise slots) put the name on the first line followed by one or two lines of
//! three space-separated tokens.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static LECTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) - (.*?), (.*?), \D*,* (.*?);<br>(.*?)$").unwrap());
static TWO_LINE_RESERVATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)<br>(.*?) (.*?) (.*?)<br>(.*?) (.*?) (.*?)$").unwrap()
});
static ONE_LINE_RESERVATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)<br>(.*?) (.*?) (.*?)$").unwrap());

/// The decoded fields of an entry label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub title: String,
    pub instructor: String,
    pub location: String,
}

impl Label {
    /// Fallback for a label no grammar understood: the raw text becomes the title.
    pub fn raw(text: &str) -> Self {
        Self {
            title: text.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Lecture,
    TwoLineReservation,
    OneLineReservation,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grammar::Lecture => "lecture",
            Grammar::TwoLineReservation => "reservation (2 assistants)",
            Grammar::OneLineReservation => "reservation (1 assistant)",
        };
        f.write_str(name)
    }
}

/// Grammars of the generated markup, in the order they are tried.
const GENERATED_GRAMMARS: [(Grammar, fn(&str) -> Option<Label>); 3] = [
    (Grammar::Lecture, decompose_lecture),
    (Grammar::TwoLineReservation, two_line_reservation),
    (Grammar::OneLineReservation, one_line_reservation),
];

pub fn decompose_lecture(text: &str) -> Option<Label> {
    let caps = LECTURE_RE.captures(text)?;
    Some(Label {
        title: caps[1].to_string(),
        instructor: caps[2].to_string(),
        location: caps[3].to_string(),
    })
}

fn two_line_reservation(text: &str) -> Option<Label> {
    reservation(&TWO_LINE_RESERVATION_RE, text)
}

fn one_line_reservation(text: &str) -> Option<Label> {
    reservation(&ONE_LINE_RESERVATION_RE, text)
}

fn reservation(pattern: &Regex, text: &str) -> Option<Label> {
    let caps = pattern.captures(text)?;
    Some(Label {
        title: caps[1].to_string(),
        instructor: caps[4].to_string(),
        location: caps[3].to_string(),
    })
}

/// Decodes a generated-markup label with the first grammar that matches.
pub fn decompose_generated(text: &str) -> Option<(Grammar, Label)> {
    GENERATED_GRAMMARS
        .iter()
        .find_map(|(grammar, decompose)| decompose(text).map(|label| (*grammar, label)))
}
