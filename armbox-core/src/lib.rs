#![warn(missing_docs)]
//! Core components for training and evaluating policies on a simulated
//! musculoskeletal arm.
//!
//! The crate provides:
//!
//! * [`MuscleSim`], the narrow capability interface a simulator backend has to
//!   implement (stepping, resetting, readable joint and actuator state, named
//!   site lookup).
//! * [`proprioception`], which turns readable simulator state into a flat,
//!   normalized observation vector.
//! * [`trajectory`], a sampler producing smoothly correlated random action
//!   sequences and recording the resulting joint positions.
//! * [`Env`], [`Policy`] and [`Agent`] traits together with [`Trainer`] and
//!   [`DefaultEvaluator`] for running training and evaluation loops.
//! * [`record`], a container for logging metrics through a
//!   [`Recorder`](record::Recorder).
pub mod error;
pub mod record;

mod base;
pub use base::{Act, Agent, Env, MuscleSim, Obs, Policy, Step};

pub mod proprioception;
pub mod trajectory;

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, EpisodeStats, Evaluator};

pub mod dummy;
