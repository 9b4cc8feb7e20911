//! Proprioceptive observation construction.
//!
//! Maps raw simulator state (joint positions, velocities, accelerations,
//! end-effector position, actuation state) into a fixed-length observation
//! vector. Joint positions and actuation are normalized to `[-1, 1]`;
//! velocities, accelerations and the end-effector position are passed through
//! unmodified since their ranges are not bounded a priori.
use crate::MuscleSim;
use anyhow::{bail, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Configuration of [`Proprioception`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProprioceptionConfig {
    /// Name of the end-effector site whose Cartesian position is appended to
    /// the observation.
    pub end_effector: String,
}

impl Default for ProprioceptionConfig {
    fn default() -> Self {
        Self {
            end_effector: "fingertip".to_string(),
        }
    }
}

impl ProprioceptionConfig {
    /// Sets the end-effector site name.
    pub fn end_effector(mut self, name: impl Into<String>) -> Self {
        self.end_effector = name.into();
        self
    }
}

/// Bounds and shape of the observation space declared by the extractor.
///
/// Every dimension is declared unbounded; range validation is deferred to the
/// consuming policy or training framework.
#[derive(Clone, Copy, Debug)]
pub struct ObservationSpace {
    /// Lower bound of every dimension.
    pub low: f64,
    /// Upper bound of every dimension.
    pub high: f64,
    /// Number of dimensions.
    pub shape: usize,
}

/// Builds the proprioceptive feature vector from readable simulator state.
///
/// The field order is constant for a given configuration: normalized joint
/// positions, joint velocities, joint accelerations, end-effector Cartesian
/// position, normalized actuation. This is a pure, stateless, per-call
/// transformation.
pub struct Proprioception {
    end_effector: String,
}

impl Proprioception {
    /// Constructs the extractor.
    pub fn new(config: &ProprioceptionConfig) -> Self {
        Self {
            end_effector: config.end_effector.clone(),
        }
    }

    /// Name of the end-effector site.
    pub fn end_effector(&self) -> &str {
        &self.end_effector
    }

    /// Length of the observation vector for the given backend.
    ///
    /// Equals `3 * num_independent_joints + 3 + num_actuators`.
    pub fn observation_len<S: MuscleSim>(&self, sim: &S) -> usize {
        3 * sim.num_independent_joints() + 3 + sim.num_actuators()
    }

    /// Observation-space parameters for the given backend.
    pub fn observation_space<S: MuscleSim>(&self, sim: &S) -> ObservationSpace {
        ObservationSpace {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
            shape: self.observation_len(sim),
        }
    }

    /// Computes the observation vector from the current simulator state.
    ///
    /// Fails if the backend reports a degenerate joint range (`lo >= hi`),
    /// which would divide the position normalization by zero.
    pub fn observe<S: MuscleSim>(&self, sim: &S) -> Result<Array1<f64>> {
        let ranges = sim.joint_ranges();
        if let Some(r) = ranges.iter().find(|r| r[0] >= r[1]) {
            bail!("degenerate joint range [{}, {}]", r[0], r[1]);
        }
        let qpos = sim.independent_joint_positions();
        let qvel = sim.independent_joint_velocities();
        let qacc = sim.independent_joint_accelerations();
        let act = sim.actuator_state();
        let ee = sim.site_position(&self.end_effector)?;

        let mut obs = Vec::with_capacity(self.observation_len(sim));
        // Positions are not clamped; the backend owns the joint-limit invariant.
        for (q, r) in qpos.iter().zip(ranges) {
            obs.push(((q - r[0]) / (r[1] - r[0]) - 0.5) * 2.0);
        }
        obs.extend(qvel.iter());
        obs.extend(qacc.iter());
        obs.extend_from_slice(&ee);
        obs.extend(act.iter().map(|a| (a - 0.5) * 2.0));

        Ok(Array1::from(obs))
    }
}
