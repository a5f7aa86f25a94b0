use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::{Path, PathBuf};

/// Playmon: playback performance monitor
///
/// Records playback sessions, samples live player state once per period and
/// keeps bounded history and statistics that survive restarts.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    /// Directory to load and save monitoring state in.
    ///
    /// Overrides `persistence.state_dir`. Without either, state is kept in
    /// memory only.
    #[arg(short, long)]
    pub statedir: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sample live playback state until interrupted.
    ///
    /// SIGUSR1 logs the session report, SIGUSR2 logs network stats, Ctrl-C
    /// ends the run.
    Watch {
        /// Start a user-controlled run that only Ctrl-C ends.
        #[arg(short, long)]
        user: bool,

        /// Drive the monitor from a simulated player.
        #[arg(long)]
        simulate: bool,
    },
    /// Print the session report.
    Report,
    /// Replace the session history with synthetic sessions.
    Seed,
    /// Erase session history.
    Clear,
    /// Print the effective configuration as TOML.
    Config,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}
