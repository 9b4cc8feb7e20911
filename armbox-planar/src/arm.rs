//! Planar arm dynamics.
use anyhow::{bail, Result};
use armbox_core::{error::ArmboxError, MuscleSim};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PlanarArm`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlanarArmConfig {
    /// `[lo, hi]` range of each joint, in radians.
    pub joint_ranges: Vec<[f64; 2]>,

    /// Length of each link, in meters. Must match the number of joints.
    pub link_lengths: Vec<f64>,

    /// Simulation timestep in seconds.
    pub timestep: f64,

    /// Time constant of the first-order muscle activation dynamics, in
    /// seconds.
    pub activation_tau: f64,

    /// Torque per unit of net activation.
    pub gain: f64,

    /// Viscous joint damping.
    pub damping: f64,
}

impl Default for PlanarArmConfig {
    fn default() -> Self {
        // A shoulder/elbow arm reaching in the x-y plane.
        Self {
            joint_ranges: vec![[-1.57, 1.57], [0.0, 2.7]],
            link_lengths: vec![0.30, 0.25],
            timestep: 0.01,
            activation_tau: 0.05,
            gain: 30.0,
            damping: 2.0,
        }
    }
}

impl PlanarArmConfig {
    /// Sets the simulation timestep.
    pub fn timestep(mut self, v: f64) -> Self {
        self.timestep = v;
        self
    }

    /// Number of joints.
    pub fn num_joints(&self) -> usize {
        self.joint_ranges.len()
    }

    /// Number of actuators: one antagonistic pair per joint.
    pub fn num_actuators(&self) -> usize {
        2 * self.joint_ranges.len()
    }

    /// Constructs [`PlanarArmConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`PlanarArmConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// A planar chain of revolute joints driven by antagonistic muscle pairs.
///
/// Actuator `2j` flexes and actuator `2j + 1` extends joint `j`. Activations
/// follow first-order dynamics towards the clamped control input, the joint
/// torque is `gain * (flexor - extensor) - damping * qvel`, and positions are
/// integrated with semi-implicit Euler and clamped to the joint ranges.
pub struct PlanarArm {
    config: PlanarArmConfig,
    qpos: Array1<f64>,
    qvel: Array1<f64>,
    qacc: Array1<f64>,
    act: Array1<f64>,
}

impl PlanarArm {
    /// Builds the arm, validating the configuration.
    pub fn build(config: &PlanarArmConfig) -> Result<Self> {
        if config.joint_ranges.is_empty() {
            bail!("planar arm needs at least one joint");
        }
        if config.link_lengths.len() != config.joint_ranges.len() {
            bail!(
                "link count ({}) does not match joint count ({})",
                config.link_lengths.len(),
                config.joint_ranges.len()
            );
        }
        if config.joint_ranges.iter().any(|r| r[0] >= r[1]) {
            bail!("every joint range must satisfy lo < hi");
        }
        if config.timestep <= 0.0 || config.activation_tau <= 0.0 {
            bail!("timestep and activation_tau must be positive");
        }
        let num_joints = config.joint_ranges.len();
        let mut arm = Self {
            config: config.clone(),
            qpos: Array1::zeros(num_joints),
            qvel: Array1::zeros(num_joints),
            qacc: Array1::zeros(num_joints),
            act: Array1::zeros(2 * num_joints),
        };
        arm.reset()?;
        Ok(arm)
    }

    /// Total reach of the arm, in meters.
    pub fn reach(&self) -> f64 {
        self.config.link_lengths.iter().sum()
    }

    /// Forward kinematics up to (and including) link `n`.
    fn chain_position(&self, n: usize) -> [f64; 3] {
        let mut angle = 0.0;
        let mut x = 0.0;
        let mut y = 0.0;
        for j in 0..n {
            angle += self.qpos[j];
            x += self.config.link_lengths[j] * angle.cos();
            y += self.config.link_lengths[j] * angle.sin();
        }
        [x, y, 0.0]
    }
}

impl MuscleSim for PlanarArm {
    fn reset(&mut self) -> Result<()> {
        // Default pose is the midpoint of every joint range.
        for (j, r) in self.config.joint_ranges.iter().enumerate() {
            self.qpos[j] = 0.5 * (r[0] + r[1]);
        }
        self.qvel.fill(0.0);
        self.qacc.fill(0.0);
        self.act.fill(0.0);
        Ok(())
    }

    fn step(&mut self, ctrl: &Array1<f64>) -> Result<()> {
        if ctrl.len() != self.act.len() {
            bail!(
                "control dimension mismatch: expected {}, got {}",
                self.act.len(),
                ctrl.len()
            );
        }

        let dt = self.config.timestep;
        let k = dt / self.config.activation_tau;
        for (a, c) in self.act.iter_mut().zip(ctrl.iter()) {
            *a += (c.clamp(0.0, 1.0) - *a) * k;
        }

        for j in 0..self.qpos.len() {
            let net = self.act[2 * j] - self.act[2 * j + 1];
            let torque = self.config.gain * net - self.config.damping * self.qvel[j];
            self.qacc[j] = torque;
            self.qvel[j] += self.qacc[j] * dt;

            let r = self.config.joint_ranges[j];
            let q = self.qpos[j] + self.qvel[j] * dt;
            if q < r[0] || q > r[1] {
                // Hitting a joint limit stops the joint.
                self.qpos[j] = q.clamp(r[0], r[1]);
                self.qvel[j] = 0.0;
            } else {
                self.qpos[j] = q;
            }
        }
        Ok(())
    }

    fn timestep(&self) -> f64 {
        self.config.timestep
    }

    fn num_independent_joints(&self) -> usize {
        self.qpos.len()
    }

    fn num_actuators(&self) -> usize {
        self.act.len()
    }

    fn joint_ranges(&self) -> &[[f64; 2]] {
        &self.config.joint_ranges
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
            "shoulder" => Ok([0.0, 0.0, 0.0]),
            "elbow" => Ok(self.chain_position(1)),
            "fingertip" => Ok(self.chain_position(self.qpos.len())),
            _ => Err(ArmboxError::UnknownSite(name.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flexor_only(arm: &PlanarArm) -> Array1<f64> {
        let mut ctrl = Array1::zeros(arm.num_actuators());
        for j in 0..arm.num_independent_joints() {
            ctrl[2 * j] = 1.0;
        }
        ctrl
    }

    #[test]
    fn activations_stay_in_unit_interval() {
        let mut arm = PlanarArm::build(&PlanarArmConfig::default()).unwrap();
        let ctrl = Array1::from(vec![5.0, -3.0, 1.0, 0.0]);
        for _ in 0..1000 {
            arm.step(&ctrl).unwrap();
        }
        assert!(arm.actuator_state().iter().all(|a| (0.0..=1.0).contains(a)));
    }

    #[test]
    fn positions_respect_joint_limits() {
        let mut arm = PlanarArm::build(&PlanarArmConfig::default()).unwrap();
        let ctrl = flexor_only(&arm);
        for _ in 0..5000 {
            arm.step(&ctrl).unwrap();
        }
        for (q, r) in arm
            .independent_joint_positions()
            .iter()
            .zip(arm.joint_ranges())
        {
            assert!(*q >= r[0] && *q <= r[1]);
        }
    }

    #[test]
    fn fingertip_matches_forward_kinematics() {
        let config = PlanarArmConfig {
            joint_ranges: vec![[0.0, 2.0], [0.0, 2.0]],
            link_lengths: vec![0.3, 0.25],
            ..Default::default()
        };
        let arm = PlanarArm::build(&config).unwrap();
        // Default pose: both joints at 1.0 rad.
        let p = arm.site_position("fingertip").unwrap();
        let expected_x = 0.3 * 1.0f64.cos() + 0.25 * 2.0f64.cos();
        let expected_y = 0.3 * 1.0f64.sin() + 0.25 * 2.0f64.sin();
        assert!((p[0] - expected_x).abs() < 1e-12);
        assert!((p[1] - expected_y).abs() < 1e-12);
        assert_eq!(p[2], 0.0);
    }

    #[test]
    fn rejects_bad_configs() {
        let mut config = PlanarArmConfig::default();
        config.link_lengths.pop();
        assert!(PlanarArm::build(&config).is_err());

        let config = PlanarArmConfig {
            joint_ranges: vec![[1.0, -1.0]],
            link_lengths: vec![0.3],
            ..Default::default()
        };
        assert!(PlanarArm::build(&config).is_err());
    }

    #[test]
    fn unknown_site_is_an_error() {
        let arm = PlanarArm::build(&PlanarArmConfig::default()).unwrap();
        assert!(arm.site_position("wrist").is_err());
    }
}
