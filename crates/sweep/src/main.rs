use anyhow::Context;
use clap::Parser;
use netda_sweep::{Step, SweepConfig, SweepParameter, SweepRunner};
use std::path::PathBuf;

/// Parameter sweep over the network double auction
#[derive(Parser, Debug)]
#[command(name = "netda-sweep", version, about)]
struct Args {
    /// Load sweep configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Market parameter to sweep
    #[arg(long, value_enum)]
    parameter: Option<SweepParameter>,

    /// First parameter value
    #[arg(long)]
    start: Option<f64>,

    /// Last parameter value (inclusive)
    #[arg(long)]
    end: Option<f64>,

    /// Add this amount between points
    #[arg(long, conflicts_with = "ratio")]
    step: Option<f64>,

    /// Multiply by this ratio between points
    #[arg(long)]
    ratio: Option<f64>,

    /// Trials per point
    #[arg(short, long)]
    trials: Option<usize>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents, sellers are split evenly
    #[arg(long)]
    population: Option<usize>,

    /// Table file to append to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads per point (default: number of CPUs)
    #[arg(short, long)]
    workers: Option<usize>,
}

impl Args {
    fn apply_to(self, config: &mut SweepConfig) {
        if let Some(parameter) = self.parameter {
            config.parameter = parameter;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if let Some(step) = self.step {
            config.step = Step::Linear(step);
        }
        if let Some(ratio) = self.ratio {
            config.step = Step::Geometric(ratio);
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(population) = self.population {
            config.market = config.market.clone().with_population(population);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {}", path.display());
            SweepConfig::from_file(path)?
        }
        None => SweepConfig::default(),
    };
    args.apply_to(&mut config);

    let runner = SweepRunner::new(config).context("invalid sweep configuration")?;
    let table = runner.run()?;

    let output = &runner.config().output;
    table
        .append_to(output)
        .with_context(|| format!("writing results to {}", output.display()))?;
    log::info!("Appended {} points to {}", table.len(), output.display());

    Ok(())
}
