use clap::Parser;
use config::Config;
use monitor::sampler::Controller;
use monitor::{PerformanceMonitor, Services};
use playmon::cli::{Cli, Command};
use playmon::watch::{WatchOptions, watch};
use std::io::{self, Write};
use tracing::{debug, info};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    debug!(config = ?cli);

    let mut config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => Config::new(),
    };
    if let Some(dir) = cli.statedir {
        config.persistence.state_dir = Some(dir);
    }

    let services = Services::from_config(&config.persistence);
    let monitor = PerformanceMonitor::load(config, services);

    match cli.command {
        Command::Watch { user, simulate } => {
            let controlled_by = if user {
                Controller::User
            } else {
                Controller::Auto
            };
            watch(
                &monitor,
                WatchOptions {
                    controlled_by,
                    simulate,
                },
            )
            .await?;
        }
        Command::Report => writeln!(io::stdout(), "{}", monitor.text_report())?,
        Command::Seed => {
            monitor.generate_synthetic_history();
            info!(sessions = monitor.history().len(), "synthetic history generated");
        }
        Command::Clear => monitor.clear(),
        Command::Config => write!(io::stdout(), "{}", monitor.config().to_toml()?)?,
    }

    Ok(())
}
