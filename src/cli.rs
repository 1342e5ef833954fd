use camino::Utf8PathBuf;
use clap::{Args, Parser};

/// Mutually exclusive verbosity switches shared by both tools.
#[derive(Args, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[group(required = false, multiple = false)]
pub struct Verbosity {
    /// Verbose output.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
    /// Display warnings and errors only.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Verbosity {
    /// Filter directive forced by the flags, if any.
    pub fn directive(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("warn")
        } else {
            None
        }
    }
}

/// `pz-fix-insulation`: give every clothing item an `Insulation` property.
#[derive(Parser, Debug)]
#[command(
    name = "pz-fix-insulation",
    version,
    about = "Set insulation to 1.0 for clothing that lacks insulation"
)]
pub struct InsulationCli {
    /// Path to the Zomboid installation.
    #[arg(short = 'd', long = "directory", value_name = "PATH")]
    pub directory: Utf8PathBuf,
    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// `pz-save-vacuum`: drop stale chunks from multiplayer saves.
#[derive(Parser, Debug)]
#[command(
    name = "pz-save-vacuum",
    version,
    about = "Remove files older than X days from Project Zomboid multiplayer saves",
    long_about = "Remove files older than X days from Project Zomboid multiplayer saves \
                  directory, with map_p.bin being an exception.\n\
                  Local server directories are not affected."
)]
pub struct VacuumCli {
    /// Days to preserve in each save (1 or more).
    #[arg(
        short = 'd',
        long = "days",
        value_name = "INT",
        allow_negative_numbers = true
    )]
    pub days: i64,
    /// Do not count freed size to speed things up.
    #[arg(short = 'f', long = "faster")]
    pub faster: bool,
    /// Do not perform actual removal, just count files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    #[command(flatten)]
    pub verbosity: Verbosity,
}

pub fn parse_insulation() -> InsulationCli {
    InsulationCli::parse()
}

pub fn parse_vacuum() -> VacuumCli {
    VacuumCli::parse()
}
