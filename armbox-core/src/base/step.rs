//! Environment step.
use super::Env;

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`.
///
/// An environment emits a [`Step`] object at every interaction step.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if the episode is truncated.
    pub is_truncated: bool,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
        }
    }

    /// Terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
