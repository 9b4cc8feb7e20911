//! Core functionalities.
mod agent;
mod env;
mod policy;
mod sim;
mod step;
pub use agent::Agent;
pub use env::Env;
use ndarray::Array1;
pub use policy::Policy;
pub use sim::MuscleSim;
use std::fmt::Debug;
pub use step::Step;

/// An observation of an environment.
pub trait Obs: Clone + Debug {
    /// Returns the number of elements in the observation.
    fn len(&self) -> usize;
}

impl Obs for Array1<f64> {
    fn len(&self) -> usize {
        self.len()
    }
}

/// An action on an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of elements in the action.
    fn len(&self) -> usize;
}

impl Act for Array1<f64> {
    fn len(&self) -> usize {
        self.len()
    }
}
