//! A minimal simulator backend used in tests.
use crate::{error::ArmboxError, MuscleSim};
use anyhow::{bail, Result};
use ndarray::Array1;

/// A trivial arm with antagonistic actuator pairs.
///
/// Each joint is driven by two actuators (flexor and extensor); the joint
/// torque is the difference of their activations. This is not a physical
/// model, just enough dynamics to exercise the sampler, the extractor and the
/// environment machinery deterministically.
pub struct DummyArm {
    qpos: Array1<f64>,
    qvel: Array1<f64>,
    qacc: Array1<f64>,
    act: Array1<f64>,
    ranges: Vec<[f64; 2]>,
    dt: f64,
}

impl DummyArm {
    /// Constructs an arm with `num_joints` joints, all ranged `[-1, 1]`.
    pub fn new(num_joints: usize) -> Self {
        Self::with_ranges(vec![[-1.0, 1.0]; num_joints])
    }

    /// Constructs an arm with explicit joint ranges.
    pub fn with_ranges(ranges: Vec<[f64; 2]>) -> Self {
        let num_joints = ranges.len();
        Self {
            qpos: Self::default_pose(&ranges),
            qvel: Array1::zeros(num_joints),
            qacc: Array1::zeros(num_joints),
            act: Array1::zeros(2 * num_joints),
            ranges,
            dt: 0.01,
        }
    }

    /// Overwrites the joint positions. Test helper.
    pub fn set_positions(&mut self, qpos: Array1<f64>) {
        assert_eq!(qpos.len(), self.qpos.len());
        self.qpos = qpos;
    }

    /// Overwrites the actuator activations. Test helper.
    pub fn set_activations(&mut self, act: Array1<f64>) {
        assert_eq!(act.len(), self.act.len());
        self.act = act;
    }

    fn default_pose(ranges: &[[f64; 2]]) -> Array1<f64> {
        ranges.iter().map(|r| 0.5 * (r[0] + r[1])).collect()
    }
}

impl MuscleSim for DummyArm {
    fn reset(&mut self) -> Result<()> {
        self.qpos = Self::default_pose(&self.ranges);
        self.qvel.fill(0.0);
        self.qacc.fill(0.0);
        self.act.fill(0.0);
        Ok(())
    }

    fn step(&mut self, ctrl: &Array1<f64>) -> Result<()> {
        if ctrl.len() != self.num_actuators() {
            bail!(
                "control dimension mismatch: expected {}, got {}",
                self.num_actuators(),
                ctrl.len()
            );
        }
        self.act = ctrl.mapv(|c| c.clamp(0.0, 1.0));
        for j in 0..self.qpos.len() {
            let torque = self.act[2 * j] - self.act[2 * j + 1];
            self.qacc[j] = 2.0 * torque - 0.5 * self.qvel[j];
            self.qvel[j] += self.qacc[j] * self.dt;
            self.qpos[j] = (self.qpos[j] + self.qvel[j] * self.dt)
                .clamp(self.ranges[j][0], self.ranges[j][1]);
        }
        Ok(())
    }

    fn timestep(&self) -> f64 {
        self.dt
    }

    fn num_independent_joints(&self) -> usize {
        self.qpos.len()
    }

    fn num_actuators(&self) -> usize {
        self.act.len()
    }

    fn joint_ranges(&self) -> &[[f64; 2]] {
        &self.ranges
    }

    fn independent_joint_positions(&self) -> Array1<f64> {
        self.qpos.clone()
    }

    fn independent_joint_velocities(&self) -> Array1<f64> {
        self.qvel.clone()
    }

    fn independent_joint_accelerations(&self) -> Array1<f64> {
        self.qacc.clone()
    }

    fn actuator_state(&self) -> Array1<f64> {
        self.act.clone()
    }

    fn site_position(&self, name: &str) -> Result<[f64; 3]> {
        match name {
            "fingertip" => {
                let angle = self.qpos.sum();
                Ok([angle.cos(), angle.sin(), 0.0])
            }
            _ => Err(ArmboxError::UnknownSite(name.to_string()).into()),
        }
    }
}
