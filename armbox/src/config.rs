//! Run configurations for the command-line entry points.
use crate::agent::RandomSearchConfig;
use anyhow::Result;
use armbox_core::{trajectory::TrajectoryConfig, TrainerConfig};
use armbox_planar::{PlanarArmConfig, ReachEnvConfig};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let file = File::open(path)?;
    let rdr = BufReader::new(file);
    Ok(serde_yaml::from_reader(rdr)?)
}

fn save_yaml<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(value)?.as_bytes())?;
    Ok(())
}

/// Configuration of a training run.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrainSpec {
    /// Environment configuration.
    pub env: ReachEnvConfig,

    /// Agent configuration.
    pub agent: RandomSearchConfig,

    /// Trainer configuration.
    pub trainer: TrainerConfig,

    /// Number of episodes per evaluation.
    pub eval_episodes: usize,

    /// Random seed of the training environment.
    pub seed: u64,
}

impl Default for TrainSpec {
    fn default() -> Self {
        let env = ReachEnvConfig::default();
        let trainer = TrainerConfig::default()
            .max_opts(500)
            // Two full episodes per optimization step.
            .opt_interval(2 * env.max_episode_steps)
            .eval_interval(20)
            .save_interval(100)
            .flush_record_interval(20);
        Self {
            env,
            agent: RandomSearchConfig::default(),
            trainer,
            eval_episodes: 5,
            seed: 0,
        }
    }
}

impl TrainSpec {
    /// Constructs [`TrainSpec`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`TrainSpec`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of an evaluation run.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EvalSpec {
    /// Environment configuration.
    pub env: ReachEnvConfig,

    /// Agent configuration; the architecture must match the saved parameters.
    pub agent: RandomSearchConfig,

    /// Directory the policy parameters are loaded from.
    pub model_dir: String,

    /// Number of evaluation episodes.
    pub n_episodes: usize,

    /// Random seed of the evaluation environment.
    pub seed: u64,
}

impl Default for EvalSpec {
    fn default() -> Self {
        Self {
            env: ReachEnvConfig::default(),
            agent: RandomSearchConfig::default(),
            model_dir: "output/reach".to_string(),
            n_episodes: 10,
            seed: 1,
        }
    }
}

impl EvalSpec {
    /// Constructs [`EvalSpec`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`EvalSpec`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of a trajectory sampling run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SampleSpec {
    /// Arm backend configuration.
    pub arm: PlanarArmConfig,

    /// Sampler configuration.
    pub trajectory: TrajectoryConfig,

    /// Random seed of the noise process.
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            arm: PlanarArmConfig::default(),
            trajectory: TrajectoryConfig::default(),
            seed: 42,
        }
    }
}

impl SampleSpec {
    /// Constructs [`SampleSpec`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`SampleSpec`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn sample_spec_roundtrips_through_yaml() {
        let dir = TempDir::new("sample_spec").unwrap();
        let path = dir.path().join("sample.yaml");
        let spec = SampleSpec::default();
        spec.save(&path).unwrap();
        assert_eq!(SampleSpec::load(&path).unwrap(), spec);
    }
}
