//! A derivative-free random-search agent.
//!
//! The agent keeps an incumbent policy and a perturbed candidate. While
//! training it acts with the candidate; at every optimization step it adopts
//! the candidate when the mean return of the episodes completed since the
//! last step improves on the best seen so far, then proposes a new candidate.
//! This is deliberately lightweight: it exercises the full training loop
//! without a tensor backend.
use crate::mlp::{Mlp, MlpConfig};
use anyhow::{bail, Context, Result};
use armbox_core::{
    record::{Record, RecordValue::Scalar},
    Agent, Env, Policy, Step,
};
use log::info;
use ndarray::Array1;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::{
    fs::{create_dir_all, File},
    io::{BufReader, BufWriter},
    path::Path,
};

/// File name of the serialized policy parameters inside a model directory.
const PARAMS_FILE: &str = "policy.bincode";

/// Configuration of [`RandomSearch`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RandomSearchConfig {
    /// Network architecture.
    pub mlp: MlpConfig,

    /// Standard deviation of the parameter perturbations.
    pub noise_std: f64,

    /// Seed of the perturbation RNG.
    pub seed: u64,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            mlp: MlpConfig::default(),
            noise_std: 0.05,
            seed: 0,
        }
    }
}

/// Random-search agent over [`Mlp`] parameters.
pub struct RandomSearch {
    incumbent: Mlp,
    candidate: Mlp,
    best_return: Option<f32>,
    noise: Normal<f64>,
    rng: StdRng,
    train_mode: bool,
    episode_return: f32,
    returns: Vec<f32>,
}

impl RandomSearch {
    /// Builds the agent for the given observation and action dimensions.
    pub fn build(config: &RandomSearchConfig, in_dim: usize, out_dim: usize) -> Result<Self> {
        if config.noise_std <= 0.0 {
            bail!("noise_std must be positive");
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let incumbent = Mlp::new(in_dim, &config.mlp, out_dim, &mut rng);
        let noise = Normal::new(0.0, config.noise_std)?;
        let candidate = incumbent.perturbed(&noise, &mut rng);
        Ok(Self {
            incumbent,
            candidate,
            best_return: None,
            noise,
            rng,
            train_mode: true,
            episode_return: 0.0,
            returns: Vec::new(),
        })
    }
}

impl<E> Policy<E> for RandomSearch
where
    E: Env<Obs = Array1<f64>, Act = Array1<f64>>,
{
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        if self.train_mode {
            self.candidate.forward(obs)
        } else {
            self.incumbent.forward(obs)
        }
    }
}

impl<E> Agent<E> for RandomSearch
where
    E: Env<Obs = Array1<f64>, Act = Array1<f64>>,
{
    fn train(&mut self) {
        self.train_mode = true;
    }

    fn eval(&mut self) {
        self.train_mode = false;
    }

    fn is_train(&self) -> bool {
        self.train_mode
    }

    fn observe(&mut self, step: &Step<E>) {
        if !self.train_mode {
            return;
        }
        self.episode_return += step.reward;
        if step.is_done() {
            self.returns.push(self.episode_return);
            self.episode_return = 0.0;
        }
    }

    fn opt_with_record(&mut self) -> Record {
        if self.returns.is_empty() {
            // No completed episode yet; keep evaluating the candidate.
            return Record::empty();
        }

        let mean_return = self.returns.iter().sum::<f32>() / self.returns.len() as f32;
        let n_episodes = self.returns.len();
        self.returns.clear();

        if self.best_return.map_or(true, |best| mean_return > best) {
            self.best_return = Some(mean_return);
            self.incumbent = self.candidate.clone();
        }
        self.candidate = self.incumbent.perturbed(&self.noise, &mut self.rng);

        Record::from_slice(&[
            ("mean_return", Scalar(mean_return)),
            ("best_return", Scalar(self.best_return.unwrap_or(f32::MIN))),
            ("opt_episodes", Scalar(n_episodes as f32)),
        ])
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        create_dir_all(path)
            .with_context(|| format!("failed to create model directory {:?}", path))?;
        let file = File::create(path.join(PARAMS_FILE))?;
        bincode::serialize_into(BufWriter::new(file), &self.incumbent)?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let path = path.join(PARAMS_FILE);
        let file =
            File::open(&path).with_context(|| format!("failed to open {:?}", path))?;
        self.incumbent = bincode::deserialize_from(BufReader::new(file))?;
        self.candidate = self.incumbent.clone();
        info!("Loaded policy parameters from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armbox_planar::ReachEnv;
    use tempdir::TempDir;

    fn agent() -> RandomSearch {
        RandomSearch::build(&RandomSearchConfig::default(), 13, 4).unwrap()
    }

    #[test]
    fn adopts_candidate_on_improvement() {
        let mut agent = agent();
        let obs = Array1::zeros(13);
        let before = Policy::<ReachEnv>::sample(&mut agent, &obs);

        agent.returns = vec![-10.0, -12.0];
        let record = Agent::<ReachEnv>::opt_with_record(&mut agent);
        assert_eq!(record.get_scalar("mean_return").unwrap(), -11.0);
        assert_eq!(record.get_scalar("best_return").unwrap(), -11.0);

        // A worse batch keeps the incumbent.
        agent.returns = vec![-50.0];
        let record = Agent::<ReachEnv>::opt_with_record(&mut agent);
        assert_eq!(record.get_scalar("best_return").unwrap(), -11.0);

        Agent::<ReachEnv>::eval(&mut agent);
        let after = Policy::<ReachEnv>::sample(&mut agent, &obs);
        // The incumbent came from the first candidate, not the initial network.
        assert_eq!(after.len(), before.len());
    }

    #[test]
    fn opt_without_episodes_is_a_noop() {
        let mut agent = agent();
        assert!(Agent::<ReachEnv>::opt_with_record(&mut agent).is_empty());
    }

    #[test]
    fn params_roundtrip_through_disk() {
        let dir = TempDir::new("random_search").unwrap();
        let mut a = agent();
        Agent::<ReachEnv>::save_params(&a, dir.path()).unwrap();

        let config = RandomSearchConfig {
            seed: 9,
            ..Default::default()
        };
        let mut b = RandomSearch::build(&config, 13, 4).unwrap();
        Agent::<ReachEnv>::eval(&mut a);
        Agent::<ReachEnv>::eval(&mut b);
        let obs = Array1::from(vec![0.5; 13]);
        let ya = Policy::<ReachEnv>::sample(&mut a, &obs);

        Agent::<ReachEnv>::load_params(&mut b, dir.path()).unwrap();
        let yb = Policy::<ReachEnv>::sample(&mut b, &obs);
        assert_eq!(ya, yb);
    }
}
