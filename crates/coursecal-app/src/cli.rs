use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Turns a course timetable into an iCalendar file.
#[derive(Parser)]
#[command(
    name = "coursecal",
    version,
    about = "Course timetable to iCalendar converter"
)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace). Overrides `logging.level`.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to read instead of `coursecal.toml`.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Write the timetable as an `.ics` file.
    Generate(GenerateArgs),
    /// Print every occurrence of every course without writing a file.
    Preview(PreviewArgs),
    /// Print the semester start and rest breaks found in a semester document.
    Semester(SemesterArgs),
}

/// Where the semester start and rest breaks come from.
///
/// Flags win over the semester document, which wins over configuration.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SemesterSource {
    /// Monday of teaching week 1, `YYYYMMDD` or `YYYY-MM-DD`.
    #[arg(long = "semester-start")]
    pub semester_start: Option<String>,

    /// Rest breaks as `after,length` pairs, e.g. `3,1,7,2`.
    #[arg(long)]
    pub rest: Option<String>,

    /// Semester-calendar JSON document, or a saved semester page holding it,
    /// to read the start and breaks from.
    #[arg(long = "semester-json")]
    pub semester_json: Option<PathBuf>,
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Course list JSON file.
    #[arg(long)]
    pub courses: PathBuf,

    /// Override `output.path` from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub semester: SemesterSource,
}

/// Arguments for the `preview` subcommand.
#[derive(clap::Args)]
pub struct PreviewArgs {
    /// Course list JSON file.
    #[arg(long)]
    pub courses: PathBuf,

    #[command(flatten)]
    pub semester: SemesterSource,
}

/// Arguments for the `semester` subcommand.
#[derive(clap::Args)]
pub struct SemesterArgs {
    /// Semester-calendar JSON document or saved semester page.
    #[arg(long = "semester-json")]
    pub semester_json: PathBuf,
}
