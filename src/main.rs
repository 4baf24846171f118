//! Timetable Parser
//!
//! Command line front end: lists programs and branches and saves timetables.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use timetable_parser::client::TimetableClient;
use timetable_parser::{parse_generated_html, parse_html, write_timetable, AppConfig, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "timetable-parser", version, about = "Exports the FERI timetable as txt, pdf or iCal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lists available programs
    Programs,
    /// Lists available branches for a program and year
    Branches { program_id: String, year: String },
    /// Downloads a branch's timetable and saves it in the given format
    Timetable {
        #[arg(value_enum)]
        format: OutputFormat,
        /// Any day of the requested week, as accepted by the timetable page
        date: String,
        program_id: String,
        year: String,
        branch_id: String,
        /// The server answered with the generated table layout instead of insertText(..) calls
        #[arg(long)]
        generated: bool,
    },
    /// Renders a timetable page saved on disk
    Parse {
        #[arg(value_enum)]
        format: OutputFormat,
        file: PathBuf,
        /// The page uses the insertText(..) layout instead of the generated table
        #[arg(long)]
        simple: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    let config = AppConfig::from_env()?;

    match command {
        Command::Programs => {
            let programs = TimetableClient::new(&config)?.programs()?;
            println!("Programs:\n");
            for program in &programs {
                println!("{} - {}", program.id, program.name);
            }
        }
        Command::Branches { program_id, year } => {
            let branches = TimetableClient::new(&config)?.branches(&program_id, &year)?;
            println!("Branches:\n");
            for branch in &branches {
                println!("{} - {}", branch.id, branch.name);
            }
        }
        Command::Timetable {
            format,
            date,
            program_id,
            year,
            branch_id,
            generated,
        } => {
            let markup = TimetableClient::new(&config)?
                .timetable(&date, &program_id, &year, &branch_id)
                .context("Failed to fetch timetable")?;
            let timetable = if generated {
                parse_generated_html(&markup)
            } else {
                parse_html(&markup)
            };
            info!(
                "Parsed {} entries for {} - {}",
                timetable.entry_count(),
                timetable.window_start,
                timetable.window_end
            );
            let path = write_timetable(&timetable, format, &config)?;
            println!("Timetable saved as {}", path.display());
        }
        Command::Parse {
            format,
            file,
            simple,
        } => {
            let bytes = fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let markup = String::from_utf8_lossy(&bytes);
            let timetable = if simple {
                parse_html(&markup)
            } else {
                parse_generated_html(&markup)
            };
            let path = write_timetable(&timetable, format, &config)?;
            println!("Timetable saved as {}", path.display());
        }
    }

    Ok(())
}
