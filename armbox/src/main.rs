use anyhow::Result;
use armbox::{
    config::{EvalSpec, SampleSpec, TrainSpec},
    evaluate, sample_trajectories, train,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Train, evaluate and sample a muscle-actuated planar arm.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a reaching policy.
    Train {
        /// YAML file overriding the default training configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for checkpoints and TFRecord logs.
        #[arg(long, default_value = "output/reach")]
        model_dir: String,
    },

    /// Evaluate a trained reaching policy.
    Eval {
        /// YAML file overriding the default evaluation configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the policy parameters are loaded from.
        #[arg(long)]
        model_dir: Option<String>,

        /// Number of evaluation episodes.
        #[arg(long)]
        episodes: Option<usize>,
    },

    /// Sample random trajectories from the arm and export them to CSV.
    Sample {
        /// YAML file overriding the default sampling configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output CSV file.
        #[arg(long, default_value = "trajectories.csv")]
        out: PathBuf,

        /// Number of trajectories.
        #[arg(long)]
        count: Option<usize>,

        /// Duration of each trajectory in seconds.
        #[arg(long)]
        duration: Option<f64>,

        /// Seed of the noise process.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Train { config, model_dir } => {
            let mut spec = match config {
                Some(path) => TrainSpec::load(path)?,
                None => TrainSpec::default(),
            };
            spec.trainer = spec.trainer.model_dir(model_dir);
            train(&spec)?;
        }
        Command::Eval {
            config,
            model_dir,
            episodes,
        } => {
            let mut spec = match config {
                Some(path) => EvalSpec::load(path)?,
                None => EvalSpec::default(),
            };
            if let Some(model_dir) = model_dir {
                spec.model_dir = model_dir;
            }
            if let Some(episodes) = episodes {
                spec.n_episodes = episodes;
            }
            evaluate(&spec)?;
        }
        Command::Sample {
            config,
            out,
            count,
            duration,
            seed,
        } => {
            let mut spec = match config {
                Some(path) => SampleSpec::load(path)?,
                None => SampleSpec::default(),
            };
            if let Some(count) = count {
                spec.trajectory = spec.trajectory.num_trajectories(count);
            }
            if let Some(duration) = duration {
                spec.trajectory = spec.trajectory.duration_secs(duration);
            }
            if let Some(seed) = seed {
                spec.seed = seed;
            }
            sample_trajectories(&spec, out)?;
        }
    }

    Ok(())
}
