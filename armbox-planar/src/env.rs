//! Reaching task over the planar arm.
use crate::{PlanarArm, PlanarArmConfig};
use anyhow::Result;
use armbox_core::{
    proprioception::{Proprioception, ProprioceptionConfig},
    Env, MuscleSim, Step,
};
use ndarray::Array1;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration of [`ReachEnv`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReachEnvConfig {
    /// Arm backend configuration.
    pub arm: PlanarArmConfig,

    /// Observation configuration.
    pub proprioception: ProprioceptionConfig,

    /// Episode length limit in environment steps.
    pub max_episode_steps: usize,

    /// Distance at which the target counts as reached, in meters.
    pub target_radius: f64,
}

impl Default for ReachEnvConfig {
    fn default() -> Self {
        Self {
            arm: PlanarArmConfig::default(),
            proprioception: ProprioceptionConfig::default(),
            max_episode_steps: 400,
            target_radius: 0.05,
        }
    }
}

/// Reaching task: drive the fingertip to a randomly drawn target.
///
/// Observations are the proprioceptive feature vector; the reward is the
/// negative Euclidean distance between the end-effector and the target. An
/// episode terminates inside the target radius and truncates at the step
/// limit.
pub struct ReachEnv {
    arm: PlanarArm,
    extractor: Proprioception,
    target: [f64; 3],
    n_steps: usize,
    rng: StdRng,
    seed: u64,
    max_episode_steps: usize,
    target_radius: f64,
}

impl ReachEnv {
    /// Current target position.
    pub fn target(&self) -> [f64; 3] {
        self.target
    }

    /// The underlying arm backend.
    pub fn arm(&self) -> &PlanarArm {
        &self.arm
    }

    fn draw_target(&mut self) -> [f64; 3] {
        // Somewhere comfortably inside the reachable disc.
        let reach = self.arm.reach();
        let r = self.rng.gen_range(0.3..0.9) * reach;
        let angle = self.rng.gen_range(0.0..std::f64::consts::PI);
        [r * angle.cos(), r * angle.sin(), 0.0]
    }

    fn distance_to_target(&self) -> Result<f64> {
        let ee = self.arm.site_position(self.extractor.end_effector())?;
        let d = (0..3)
            .map(|i| (ee[i] - self.target[i]).powi(2))
            .sum::<f64>()
            .sqrt();
        Ok(d)
    }
}

impl Env for ReachEnv {
    type Config = ReachEnvConfig;
    type Obs = Array1<f64>;
    type Act = Array1<f64>;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        let arm = PlanarArm::build(&config.arm)?;
        let extractor = Proprioception::new(&config.proprioception);
        let mut env = Self {
            arm,
            extractor,
            target: [0.0; 3],
            n_steps: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
            max_episode_steps: config.max_episode_steps,
            target_radius: config.target_radius,
        };
        env.target = env.draw_target();
        Ok(env)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.arm.reset()?;
        self.target = self.draw_target();
        self.n_steps = 0;
        self.extractor.observe(&self.arm)
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(ix as u64));
        self.reset()
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>> {
        self.arm.step(act)?;
        self.n_steps += 1;

        let obs = self.extractor.observe(&self.arm)?;
        let dist = self.distance_to_target()?;
        let reward = -dist as f32;
        let is_terminated = dist < self.target_radius;
        let is_truncated = self.n_steps >= self.max_episode_steps;

        Ok(Step::new(obs, act.clone(), reward, is_terminated, is_truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_ctrl(env: &ReachEnv) -> Array1<f64> {
        Array1::zeros(env.arm().num_actuators())
    }

    #[test]
    fn observation_has_declared_length() {
        let config = ReachEnvConfig::default();
        let mut env = ReachEnv::build(&config, 0).unwrap();
        let obs = env.reset().unwrap();
        // 2 joints, 4 actuators: 3 * 2 + 3 + 4.
        assert_eq!(obs.len(), 13);
    }

    #[test]
    fn episode_truncates_at_step_limit() {
        let config = ReachEnvConfig {
            max_episode_steps: 10,
            ..Default::default()
        };
        let mut env = ReachEnv::build(&config, 0).unwrap();
        env.reset().unwrap();
        let ctrl = zero_ctrl(&env);
        for i in 1..=10 {
            let step = env.step(&ctrl).unwrap();
            assert_eq!(step.is_truncated, i == 10);
            if step.is_done() {
                break;
            }
        }
    }

    #[test]
    fn indexed_resets_are_reproducible() {
        let config = ReachEnvConfig::default();
        let mut a = ReachEnv::build(&config, 42).unwrap();
        let mut b = ReachEnv::build(&config, 42).unwrap();
        a.reset_with_index(3).unwrap();
        b.reset_with_index(3).unwrap();
        assert_eq!(a.target(), b.target());

        b.reset_with_index(4).unwrap();
        assert_ne!(a.target(), b.target());
    }

    #[test]
    fn reward_is_negative_distance() {
        let config = ReachEnvConfig::default();
        let mut env = ReachEnv::build(&config, 1).unwrap();
        env.reset().unwrap();
        let step = env.step(&zero_ctrl(&env)).unwrap();
        assert!(step.reward <= 0.0);
    }
}
