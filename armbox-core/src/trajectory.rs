//! Random trajectory generation with temporally correlated noise.
//!
//! The sampler drives a simulator backend with an Ornstein–Uhlenbeck-like
//! action process and records the resulting independent-joint positions.
//! All trajectories start from the identical default pose, so a warm-up
//! prefix is recorded but dropped from the output to avoid biasing early-step
//! statistics.
use crate::{error::ArmboxError, MuscleSim};
use anyhow::{bail, Result};
use log::debug;
use ndarray::{s, Array1, Array3};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TrajectorySampler`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TrajectoryConfig {
    /// Number of trajectories to collect.
    pub num_trajectories: usize,

    /// Trajectory duration in simulated seconds.
    pub duration_secs: f64,

    /// Warm-up duration in simulated seconds, recorded but excluded from the
    /// output.
    pub warmup_secs: f64,

    /// Range the stationary standard deviation of the noise process is drawn
    /// from, once per trajectory.
    pub std_limits: [f64; 2],

    /// Range the noise timescale is drawn from, in seconds, once per
    /// trajectory.
    pub timescale_limits: [f64; 2],
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            num_trajectories: 100,
            duration_secs: 10.0,
            warmup_secs: 5.0,
            std_limits: [2.0, 4.0],
            timescale_limits: [0.5, 4.0],
        }
    }
}

impl TrajectoryConfig {
    /// Sets the number of trajectories.
    pub fn num_trajectories(mut self, v: usize) -> Self {
        self.num_trajectories = v;
        self
    }

    /// Sets the trajectory duration in seconds.
    pub fn duration_secs(mut self, v: f64) -> Self {
        self.duration_secs = v;
        self
    }

    /// Sets the warm-up duration in seconds.
    pub fn warmup_secs(mut self, v: f64) -> Self {
        self.warmup_secs = v;
        self
    }

    /// Constructs [`TrajectoryConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`TrajectoryConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Ornstein–Uhlenbeck-like action noise for a single trajectory.
///
/// The action vector evolves as `action' = decay_rate * action + N(0, scale)`
/// elementwise, with `scale = target_std * sqrt(1 - decay_rate^2)` so the
/// stationary standard deviation of the process equals `target_std`. The
/// parameters hold for the lifetime of one trajectory only.
pub struct OuNoise {
    decay_rate: f64,
    scale: f64,
    noise: Normal<f64>,
    action: Array1<f64>,
}

impl OuNoise {
    /// Constructs the process from an explicit timescale and target standard
    /// deviation.
    ///
    /// `decay_rate = exp(-dt / timescale)`, where `dt` is the simulation
    /// timestep.
    pub fn new(dt: f64, timescale: f64, target_std: f64, dim: usize) -> Result<Self> {
        let decay_rate = (-dt / timescale).exp();
        let scale = target_std * (1.0 - decay_rate * decay_rate).sqrt();
        let noise = Normal::new(0.0, scale)?;
        Ok(Self {
            decay_rate,
            scale,
            noise,
            action: Array1::zeros(dim),
        })
    }

    /// Draws the per-trajectory parameters uniformly from the configured
    /// limits.
    pub fn sample<R: Rng>(
        rng: &mut R,
        dt: f64,
        config: &TrajectoryConfig,
        dim: usize,
    ) -> Result<Self> {
        let timescale = rng.gen_range(config.timescale_limits[0]..=config.timescale_limits[1]);
        let target_std = rng.gen_range(config.std_limits[0]..=config.std_limits[1]);
        Self::new(dt, timescale, target_std, dim)
    }

    /// Decay rate of the process, in `(0, 1)` for positive `dt`.
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Standard deviation of the per-step Gaussian increment.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Theoretical stationary standard deviation,
    /// `scale / sqrt(1 - decay_rate^2)`.
    pub fn stationary_std(&self) -> f64 {
        self.scale / (1.0 - self.decay_rate * self.decay_rate).sqrt()
    }

    /// Advances the process by one step and returns the current action vector.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> &Array1<f64> {
        let decay_rate = self.decay_rate;
        let noise = self.noise;
        self.action
            .mapv_inplace(|a| decay_rate * a + noise.sample(rng));
        &self.action
    }
}

/// Collects random trajectories from a simulator backend.
///
/// Each trajectory starts from the default pose with a zero action vector and
/// a freshly drawn noise process. The output drops the warm-up prefix of
/// every trajectory.
pub struct TrajectorySampler {
    config: TrajectoryConfig,
}

impl TrajectorySampler {
    /// Constructs the sampler.
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Samples trajectories and returns the recorded joint positions as an
    /// array of shape `(num_trajectories, retained_steps, num_joints)`, where
    /// `retained_steps = floor(duration / dt) - floor(warmup / dt)`.
    ///
    /// Fails before touching the simulator if the duration is not positive,
    /// the warm-up is negative, or the duration is not strictly longer than
    /// the warm-up. Simulator errors propagate unchanged.
    pub fn sample<S: MuscleSim, R: Rng>(&self, sim: &mut S, rng: &mut R) -> Result<Array3<f64>> {
        let config = &self.config;
        if config.duration_secs <= 0.0 || config.warmup_secs < 0.0 {
            bail!(
                "duration must be positive and warm-up non-negative (duration {} s, warm-up {} s)",
                config.duration_secs,
                config.warmup_secs
            );
        }
        if config.duration_secs <= config.warmup_secs {
            return Err(ArmboxError::TrajectoryTooShort {
                duration_secs: config.duration_secs,
                warmup_secs: config.warmup_secs,
            }
            .into());
        }

        let dt = sim.timestep();
        let trajectory_len = (config.duration_secs / dt) as usize;
        let ignore_first = (config.warmup_secs / dt) as usize;
        let num_joints = sim.num_independent_joints();

        let mut states = Array3::zeros((config.num_trajectories, trajectory_len, num_joints));

        for traj_ix in 0..config.num_trajectories {
            sim.reset()?;

            // Noise statistics differ for each trajectory.
            let mut noise = OuNoise::sample(rng, dt, config, sim.num_actuators())?;

            for step_ix in 0..trajectory_len {
                let ctrl = noise.step(rng);
                sim.step(ctrl)?;
                states
                    .slice_mut(s![traj_ix, step_ix, ..])
                    .assign(&sim.independent_joint_positions());
            }
            debug!(
                "collected trajectory {}/{}",
                traj_ix + 1,
                config.num_trajectories
            );
        }

        Ok(states.slice(s![.., ignore_first.., ..]).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyArm;
    use rand::{rngs::StdRng, SeedableRng};
    use tempdir::TempDir;

    #[test]
    fn output_shape() {
        let mut arm = DummyArm::new(2);
        let config = TrajectoryConfig::default()
            .num_trajectories(3)
            .duration_secs(1.0)
            .warmup_secs(0.5);
        let sampler = TrajectorySampler::new(config);
        let mut rng = StdRng::seed_from_u64(0);

        let states = sampler.sample(&mut arm, &mut rng).unwrap();
        assert_eq!(states.dim(), (3, 50, 2));
    }

    #[test]
    fn warmup_prefix_is_dropped() {
        // D = 10 s, W = 5 s, dt = 0.01 s: 1000 raw steps, 500 retained.
        let mut arm = DummyArm::new(1);
        let config = TrajectoryConfig::default()
            .num_trajectories(1)
            .duration_secs(10.0)
            .warmup_secs(5.0);
        let sampler = TrajectorySampler::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        let states = sampler.sample(&mut arm, &mut rng).unwrap();
        assert_eq!(states.dim(), (1, 500, 1));
    }

    #[test]
    fn rejects_duration_not_longer_than_warmup() {
        let mut arm = DummyArm::new(1);
        let config = TrajectoryConfig::default()
            .num_trajectories(1)
            .duration_secs(5.0)
            .warmup_secs(5.0);
        let sampler = TrajectorySampler::new(config);
        let mut rng = StdRng::seed_from_u64(2);

        let err = sampler.sample(&mut arm, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArmboxError>(),
            Some(ArmboxError::TrajectoryTooShort { .. })
        ));
    }

    #[test]
    fn rejects_negative_and_zero_durations() {
        let mut arm = DummyArm::new(1);
        let mut rng = StdRng::seed_from_u64(4);

        // Negative pairs would otherwise slip past the duration > warm-up
        // check and yield an empty result.
        let config = TrajectoryConfig::default()
            .duration_secs(-1.0)
            .warmup_secs(-2.0);
        assert!(TrajectorySampler::new(config)
            .sample(&mut arm, &mut rng)
            .is_err());

        let config = TrajectoryConfig::default()
            .duration_secs(0.0)
            .warmup_secs(0.0);
        assert!(TrajectorySampler::new(config)
            .sample(&mut arm, &mut rng)
            .is_err());
    }

    #[test]
    fn seeded_runs_are_bit_identical() {
        let config = TrajectoryConfig::default()
            .num_trajectories(2)
            .duration_secs(1.0)
            .warmup_secs(0.5);

        let mut arm = DummyArm::new(2);
        let mut rng = StdRng::seed_from_u64(7);
        let a = TrajectorySampler::new(config.clone())
            .sample(&mut arm, &mut rng)
            .unwrap();

        let mut arm = DummyArm::new(2);
        let mut rng = StdRng::seed_from_u64(7);
        let b = TrajectorySampler::new(config)
            .sample(&mut arm, &mut rng)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn noise_matches_target_stationary_std() {
        let noise = OuNoise::new(0.01, 1.0, 3.0, 4).unwrap();
        assert!(noise.decay_rate() > 0.0 && noise.decay_rate() < 1.0);
        assert!((noise.stationary_std() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sampled_noise_stays_within_limits() {
        let config = TrajectoryConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let noise = OuNoise::sample(&mut rng, 0.01, &config, 2).unwrap();
            assert!(noise.decay_rate() > 0.0 && noise.decay_rate() < 1.0);
            let std = noise.stationary_std();
            assert!(std >= config.std_limits[0] - 1e-9 && std <= config.std_limits[1] + 1e-9);
        }
    }

    #[test]
    fn config_roundtrips_through_yaml() {
        let dir = TempDir::new("trajectory_config").unwrap();
        let path = dir.path().join("trajectory.yaml");
        let config = TrajectoryConfig::default()
            .num_trajectories(7)
            .duration_secs(6.0);
        config.save(&path).unwrap();
        assert_eq!(TrajectoryConfig::load(&path).unwrap(), config);
    }
}
