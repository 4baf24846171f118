//! Output writers for parsed timetables.

mod ical;
mod pdf;
mod text;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use log::info;

use crate::config::AppConfig;
use crate::timetable::Timetable;

pub use ical::render_ical;
pub use pdf::render_pdf;
pub use text::{render_text, TimetableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Txt,
    Pdf,
    Ical,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Ical => "ics",
        }
    }
}

/// `timetable_<start>-<end>.<ext>`
pub fn file_name(timetable: &Timetable, format: OutputFormat) -> String {
    format!(
        "timetable_{}-{}.{}",
        timetable.window_start,
        timetable.window_end,
        format.extension()
    )
}

/// Renders the timetable into the configured output directory and returns the written path.
pub fn write_timetable(timetable: &Timetable, format: OutputFormat, config: &AppConfig) -> Result<PathBuf> {
    let path = config.output_dir.join(file_name(timetable, format));
    info!("Writing {} entries to {}", timetable.entry_count(), path.display());

    match format {
        OutputFormat::Txt => write_file(&path, render_text(timetable).as_bytes())?,
        OutputFormat::Ical => {
            let calendar = render_ical(timetable, &config.facility, Utc::now())?;
            write_file(&path, calendar.as_bytes())?;
        }
        OutputFormat::Pdf => {
            let document = render_pdf(timetable, config.pdf_font.as_deref())?;
            write_file(&path, &document)?;
        }
    }

    Ok(path)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
