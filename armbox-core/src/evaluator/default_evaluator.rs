//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use log::info;

/// Step count and accumulated reward of one evaluation episode.
#[derive(Clone, Copy, Debug)]
pub struct EpisodeStats {
    /// Number of environment steps until the episode ended.
    pub steps: usize,

    /// Episode return, the sum of rewards.
    pub ret: f32,
}

/// A default implementation of the [`Evaluator`] trait.
///
/// Runs a fixed number of episodes and reports the average return. Each
/// episode resets the environment with its episode index, so the sequence of
/// evaluation episodes is reproducible for a given environment seed.
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<f32> {
        let stats = self.run_episodes(policy)?;
        let r_total = stats.iter().map(|s| s.ret).sum::<f32>();
        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration of the environment.
    /// * `seed` - Random seed for environment initialization.
    /// * `n_episodes` - Number of episodes to run during evaluation.
    pub fn new(config: &E::Config, seed: u64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Runs the evaluation episodes, logging and returning the step count and
    /// return of each one.
    pub fn run_episodes<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Vec<EpisodeStats>> {
        let mut stats = Vec::with_capacity(self.n_episodes);

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut steps = 0;
            let mut ret = 0f32;

            loop {
                let act = policy.sample(&prev_obs);
                let step = self.env.step(&act)?;
                steps += 1;
                ret += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }

            info!("evaluation episode {}: {} steps, return {:.3}", ix, steps, ret);
            stats.push(EpisodeStats { steps, ret });
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Step;
    use ndarray::Array1;

    #[derive(Clone)]
    struct Config;

    /// Episode length grows with the reset index.
    struct VaryingEnv {
        episode_len: usize,
        t: usize,
    }

    impl Env for VaryingEnv {
        type Config = Config;
        type Obs = Array1<f64>;
        type Act = Array1<f64>;

        fn build(_config: &Config, _seed: u64) -> Result<Self> {
            Ok(Self {
                episode_len: 1,
                t: 0,
            })
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.t = 0;
            Ok(Array1::zeros(1))
        }

        fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
            self.episode_len = ix + 2;
            self.reset()
        }

        fn step(&mut self, act: &Self::Act) -> Result<Step<Self>> {
            self.t += 1;
            let is_truncated = self.t >= self.episode_len;
            Ok(Step::new(
                Array1::zeros(1),
                act.clone(),
                -1.0,
                false,
                is_truncated,
            ))
        }
    }

    struct ZeroPolicy;

    impl Policy<VaryingEnv> for ZeroPolicy {
        fn sample(&mut self, _obs: &Array1<f64>) -> Array1<f64> {
            Array1::zeros(1)
        }
    }

    #[test]
    fn reports_per_episode_steps_and_returns() {
        let mut evaluator = DefaultEvaluator::<VaryingEnv>::new(&Config, 0, 3).unwrap();
        let stats = evaluator.run_episodes(&mut ZeroPolicy).unwrap();

        let steps: Vec<usize> = stats.iter().map(|s| s.steps).collect();
        assert_eq!(steps, vec![2, 3, 4]);
        for s in &stats {
            assert_eq!(s.ret, -(s.steps as f32));
        }

        // Mean over episodes of length 2, 3 and 4.
        let mean = evaluator.evaluate(&mut ZeroPolicy).unwrap();
        assert_eq!(mean, -3.0);
    }
}
