//! scratch-vm - CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scratch_vm::util::config::Config;
use scratch_vm::util::logger::{self, LogLevel};
use scratch_vm::{load_file, Runtime, Watch, NAME, VERSION};
use tracing::{info, warn};

/// Tick-driven runner for Scratch block projects
#[derive(Parser, Debug)]
#[command(name = "scratch-vm")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./scratch-vm.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a project for a number of ticks
    Run {
        /// Project file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Time delta per tick
        #[arg(long)]
        dt: Option<f64>,

        /// Number of ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Print a variable after every tick, as TARGET:VAR
        #[arg(long, value_name = "TARGET:VAR")]
        watch: Vec<Watch>,

        /// Print target positions after every tick
        #[arg(long)]
        positions: bool,
    },

    /// Validate a project and print a summary
    Check {
        /// Project file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config
        .apply_env()
        .context("Invalid environment override")?;
    // The subscriber must be installed before a bad level can be reported
    let (level, bad_level) = match config.log_level() {
        Ok(level) => (level, None),
        Err(e) => (LogLevel::Info, Some(e)),
    };
    logger::init_with_level(if args.verbose { LogLevel::Debug } else { level });
    if let Some(e) = bad_level {
        warn!("{}; using info", e);
    }

    match args.command {
        Commands::Run {
            file,
            dt,
            ticks,
            watch,
            positions,
        } => {
            let dt = dt.unwrap_or(config.run.dt);
            let ticks = ticks.unwrap_or(config.run.ticks);
            let watches = if watch.is_empty() {
                config
                    .run
                    .watch
                    .iter()
                    .map(|w| w.parse())
                    .collect::<Result<Vec<Watch>>>()?
            } else {
                watch
            };
            run(&file, &config, dt, ticks, &watches, positions)
                .with_context(|| format!("Failed to run: {}", file.display()))?;
        }
        Commands::Check { file } => {
            let program = load_file(&file, &config)?;
            println!("{}: ok", file.display());
            println!("  targets: {}", program.targets().len());
            println!("  blocks:  {}", program.graph().len());
            println!("  scripts: {}", program.script_count());
            println!("  max stack depth: {}", program.max_depth());
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

fn run(
    file: &std::path::Path,
    config: &Config,
    dt: f64,
    ticks: u64,
    watches: &[Watch],
    positions: bool,
) -> Result<()> {
    let program = load_file(file, config)?;
    let mut runtime = Runtime::init(program);
    for watch in watches {
        if watch.read(&runtime).is_none() {
            anyhow::bail!("Unknown variable {}", watch);
        }
    }

    info!("Running {} for {} ticks (dt={})", file.display(), ticks, dt);
    for tick in 1..=ticks {
        runtime.advance(dt);

        let mut line = format!("tick {:>4} t={:.4}", tick, runtime.clock());
        for watch in watches {
            if let Some(value) = watch.read(&runtime) {
                line.push_str(&format!(" {}={}", watch, value));
            }
        }
        if positions {
            for target in runtime.targets() {
                line.push_str(&format!(" {}@{}", target.name(), target.position()));
            }
        }
        println!("{}", line);

        if runtime.is_idle() {
            info!("All scripts finished after {} ticks", tick);
            break;
        }
    }

    let stats = runtime.stats();
    info!(
        "Done: {} ticks, {} block visits, {} suspensions, {} frames pushed",
        stats.ticks, stats.visits, stats.suspensions, stats.frames_pushed
    );
    Ok(())
}
