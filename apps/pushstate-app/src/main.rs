//! Push-trajectory dataset CLI.
//!
//! Provides three modes of operation:
//! - `process`: Turn a directory of recordings into N-step example files
//! - `flag`: Add contact flags to state files
//! - `inspect`: Print one trajectory of a flagged state file

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pushstate_contact::prelude::*;
use pushstate_core::prelude::*;
use pushstate_process::processor::TrajectoryProcessor;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Push-trajectory dataset preparation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable debug-level logging.
    #[arg(long, global = true)]
    verbose: bool,

    /// TOML configuration file; command-line flags override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert recordings into N-step example files.
    Process {
        /// Directory holding the .json or .h5 recordings.
        #[arg(short, long)]
        source_dir: Option<PathBuf>,

        /// Where to write the example files.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Base name of every output file.
        #[arg(short, long)]
        base_filename: Option<String>,

        /// Consecutive states per example (2, 3 or 4).
        #[arg(short = 'n', long)]
        number_of_steps: Option<usize>,

        /// Write trajectories of every velocity to the same files.
        #[arg(short = 'v', long = "mixed-velocity")]
        mixed_vel: Option<bool>,

        /// Write trajectories of every acceleration to the same files.
        #[arg(short = 'a', long = "mixed-acceleration")]
        mixed_acc: Option<bool>,

        /// Object shape, when it cannot be read from the source directory name.
        #[arg(long)]
        shape: Option<Shape>,

        /// Resampling period in milliseconds.
        #[arg(long)]
        period_ms: Option<u64>,

        /// Window each gap-free segment of a trajectory separately.
        #[arg(long)]
        split_on_gaps: bool,

        /// Also write the tagged state file used by `flag`.
        #[arg(long)]
        states: bool,
    },

    /// Flag the rows of state files in which the tip touches the object.
    Flag {
        /// Directory holding the state files.
        #[arg(short, long)]
        source_dir: Option<PathBuf>,

        /// Where to write the flagged files.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Tip-to-edge distance (m) at or below which the tip is in contact.
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Print one trajectory of a flagged state file.
    Inspect {
        /// Flagged state file.
        #[arg(short, long)]
        file: PathBuf,

        /// Trajectory index to print.
        #[arg(short = 'i', long)]
        trajectory_index: i64,
    },
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
fn run_process(
    config_path: Option<&Path>,
    source_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    base_filename: Option<String>,
    number_of_steps: Option<usize>,
    mixed_vel: Option<bool>,
    mixed_acc: Option<bool>,
    shape: Option<Shape>,
    period_ms: Option<u64>,
    split_on_gaps: bool,
    states: bool,
) -> anyhow::Result<()> {
    let mut config = match (config_path, source_dir) {
        (Some(path), source) => {
            let mut config = ProcessConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            if let Some(source) = source {
                config.source_dir = source;
            }
            config
        }
        (None, Some(source)) => ProcessConfig::new(source),
        (None, None) => anyhow::bail!("a source directory is required (--source-dir or --config)"),
    };
    if let Some(out) = out_dir {
        config.out_dir = out;
    }
    if let Some(base) = base_filename {
        config.base_filename = base;
    }
    if let Some(n) = number_of_steps {
        config.number_of_steps = StepCount::new(n)?;
    }
    if let Some(v) = mixed_vel {
        config.mixed_vel = v;
    }
    if let Some(a) = mixed_acc {
        config.mixed_acc = a;
    }
    if let Some(p) = period_ms {
        config.resample_period_ms = p;
    }
    config.shape = shape.or(config.shape);
    config.split_on_gaps |= split_on_gaps;
    config.write_states |= states;

    let processor = TrajectoryProcessor::new(config)?;
    let summary = processor.run()?;

    println!(
        "processed {} files ({} skipped): {} trajectories, {} examples",
        summary.files_processed,
        summary.files_skipped,
        summary.trajectories,
        summary.examples_written
    );
    let partitioner = processor.partitioner();
    for key in partitioner.keys() {
        println!("  {}", partitioner.path_for(&key).display());
    }
    Ok(())
}

fn run_flag(
    config_path: Option<&Path>,
    source_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    threshold: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = match (config_path, source_dir) {
        (Some(path), source) => {
            let mut config = ContactConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            if let Some(source) = source {
                config.source_dir = source;
            }
            config
        }
        (None, Some(source)) => ContactConfig::new(source),
        (None, None) => anyhow::bail!("a source directory is required (--source-dir or --config)"),
    };
    if let Some(out) = out_dir {
        config.out_dir = out;
    }
    if let Some(t) = threshold {
        config.threshold = t;
    }

    let filter = ContactFilter::new(config)?;
    let reports = filter.run()?;
    println!("flagged {} files (threshold {} m)", reports.len(), filter.threshold());
    for report in &reports {
        print!(
            "  {}: {} rows, {} in contact",
            report.output.display(),
            report.rows_written,
            report.contact_rows
        );
        if report.degenerate_rows > 0 {
            print!(", {} degenerate", report.degenerate_rows);
        }
        match report.truncated_at {
            Some(id) => println!(", truncated at id {id}"),
            None => println!(),
        }
    }
    Ok(())
}

fn run_inspect(file: &Path, index: i64) -> anyhow::Result<()> {
    let trajectory = load_flagged_trajectory(file, index)
        .with_context(|| format!("reading {}", file.display()))?;
    if trajectory.is_empty() {
        anyhow::bail!("trajectory {index} not found in {}", file.display());
    }
    info!(steps = trajectory.len(), "loaded trajectory {index}");

    println!(
        "trajectory {index}: {} steps, {} in contact",
        trajectory.len(),
        trajectory.contact_count()
    );
    for step in 0..trajectory.len() {
        let object = trajectory.object[step];
        let tip = trajectory.tip[step];
        let wrench = trajectory.wrench[step];
        let polygon = trajectory
            .corner_polygon(step)?
            .iter()
            .map(|p| format!("({:.4}, {:.4})", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:>6} object=({:.4}, {:.4}, {:.3}) tip=({:.4}, {:.4}) force=({:.3}, {:.3}, {:.3}) contact={} corners={polygon}",
            trajectory.ids[step],
            object.x,
            object.y,
            object.theta,
            tip.x,
            tip.y,
            wrench.fx,
            wrench.fy,
            wrench.torque,
            trajectory.contact[step],
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process {
            source_dir,
            out_dir,
            base_filename,
            number_of_steps,
            mixed_vel,
            mixed_acc,
            shape,
            period_ms,
            split_on_gaps,
            states,
        } => run_process(
            config_path,
            source_dir,
            out_dir,
            base_filename,
            number_of_steps,
            mixed_vel,
            mixed_acc,
            shape,
            period_ms,
            split_on_gaps,
            states,
        ),
        Commands::Flag {
            source_dir,
            out_dir,
            threshold,
        } => run_flag(config_path, source_dir, out_dir, threshold),
        Commands::Inspect {
            file,
            trajectory_index,
        } => run_inspect(&file, trajectory_index),
    }
}
