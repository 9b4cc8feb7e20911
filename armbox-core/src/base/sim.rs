//! Interface to a musculoskeletal simulator.
use anyhow::Result;
use ndarray::Array1;

/// Read and step access to a musculoskeletal simulator.
///
/// This is the complete capability set the core logic needs from a physics
/// backend: stepping, resetting, the fixed timestep, and readable joint,
/// actuator and site state. Alternate backends are substituted by
/// implementing this trait.
///
/// Implementations own the joint-limit invariant: positions returned by
/// [`MuscleSim::independent_joint_positions`] are expected to stay within
/// [`MuscleSim::joint_ranges`]. The observation code does not clamp.
///
/// A simulator instance is exclusively owned by a single caller between
/// `reset` and `step` calls; concurrent access from two threads to the same
/// instance is not supported.
pub trait MuscleSim {
    /// Resets the simulator to its default pose.
    fn reset(&mut self) -> Result<()>;

    /// Applies a control vector to the actuators and advances the simulation
    /// by one timestep.
    ///
    /// `ctrl` must have [`MuscleSim::num_actuators`] elements.
    fn step(&mut self, ctrl: &Array1<f64>) -> Result<()>;

    /// Fixed simulation timestep in seconds.
    fn timestep(&self) -> f64;

    /// Number of independent joints, i.e. the degrees of freedom that are
    /// directly controlled.
    fn num_independent_joints(&self) -> usize;

    /// Number of actuators.
    fn num_actuators(&self) -> usize;

    /// `[lo, hi]` range of each independent joint, in joint index order.
    ///
    /// Implementations must return `lo < hi` for every joint; position
    /// normalization divides by the range width.
    fn joint_ranges(&self) -> &[[f64; 2]];

    /// Positions of the independent joints, in joint index order.
    fn independent_joint_positions(&self) -> Array1<f64>;

    /// Velocities of the independent joints.
    fn independent_joint_velocities(&self) -> Array1<f64>;

    /// Accelerations of the independent joints.
    fn independent_joint_accelerations(&self) -> Array1<f64>;

    /// Actuator activation state, each element in `[0, 1]`.
    fn actuator_state(&self) -> Array1<f64>;

    /// Cartesian position of a named site.
    ///
    /// Fails with [`ArmboxError::UnknownSite`](crate::error::ArmboxError) if
    /// the backend does not define the site.
    fn site_position(&self, name: &str) -> Result<[f64; 3]>;
}
