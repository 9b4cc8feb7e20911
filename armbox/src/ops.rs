//! Entry points for training, evaluation and trajectory sampling.
use crate::{
    agent::{RandomSearch, RandomSearchConfig},
    config::{EvalSpec, SampleSpec, TrainSpec},
};
use anyhow::Result;
use armbox_core::{
    proprioception::Proprioception,
    record::{NullRecorder, Recorder},
    trajectory::TrajectorySampler,
    Agent, DefaultEvaluator, Env, Evaluator, MuscleSim, Trainer,
};
use armbox_planar::{PlanarArm, ReachEnv, ReachEnvConfig};
use armbox_tensorboard::TensorboardRecorder;
use log::info;
use ndarray::Array3;
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;

fn build_agent(env: &ReachEnvConfig, agent: &RandomSearchConfig) -> Result<RandomSearch> {
    // Probe the backend for the observation and action dimensions.
    let arm = PlanarArm::build(&env.arm)?;
    let extractor = Proprioception::new(&env.proprioception);
    let in_dim = extractor.observation_len(&arm);
    let out_dim = arm.num_actuators();
    RandomSearch::build(agent, in_dim, out_dim)
}

/// Trains a policy on the reaching task.
///
/// Checkpoints go under the trainer's `model_dir` and TFRecord logs under
/// `(model_dir)/tb`; records are discarded when no model directory is
/// configured.
pub fn train(spec: &TrainSpec) -> Result<()> {
    let env = ReachEnv::build(&spec.env, spec.seed)?;
    let mut agent = build_agent(&spec.env, &spec.agent)?;
    let mut evaluator =
        DefaultEvaluator::<ReachEnv>::new(&spec.env, spec.seed.wrapping_add(1), spec.eval_episodes)?;

    let mut recorder: Box<dyn Recorder> = match spec.trainer.model_dir.as_ref() {
        Some(model_dir) => Box::new(TensorboardRecorder::new(format!("{}/tb", model_dir))),
        None => Box::new(NullRecorder {}),
    };

    let mut trainer = Trainer::build(spec.trainer.clone());
    trainer.train(env, &mut agent, recorder.as_mut(), &mut evaluator)?;

    Ok(())
}

/// Evaluates a trained policy and returns the mean episode return.
///
/// Loads the parameters saved under `(model_dir)/best` by [`train`].
pub fn evaluate(spec: &EvalSpec) -> Result<f32> {
    let mut agent = build_agent(&spec.env, &spec.agent)?;
    Agent::<ReachEnv>::load_params(&mut agent, &Path::new(&spec.model_dir).join("best"))?;
    Agent::<ReachEnv>::eval(&mut agent);

    let mut evaluator = DefaultEvaluator::<ReachEnv>::new(&spec.env, spec.seed, spec.n_episodes)?;
    let mean_return = evaluator.evaluate(&mut agent)?;
    info!(
        "mean episode return over {} episodes: {:.3}",
        spec.n_episodes, mean_return
    );

    Ok(mean_return)
}

/// Collects random trajectories from the arm and writes them to a CSV file.
///
/// Each row is one retained step: trajectory index, step index, then one
/// column per independent joint. Returns the recorded array of shape
/// `(num_trajectories, retained_steps, num_joints)`.
pub fn sample_trajectories(spec: &SampleSpec, out: impl AsRef<Path>) -> Result<Array3<f64>> {
    let mut arm = PlanarArm::build(&spec.arm)?;
    let sampler = TrajectorySampler::new(spec.trajectory.clone());
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let states = sampler.sample(&mut arm, &mut rng)?;

    let (num_trajectories, num_steps, num_joints) = states.dim();
    let mut writer = csv::Writer::from_path(out.as_ref())?;
    let mut header = vec!["trajectory".to_string(), "step".to_string()];
    header.extend((0..num_joints).map(|j| format!("q{}", j)));
    writer.write_record(&header)?;
    for traj_ix in 0..num_trajectories {
        for step_ix in 0..num_steps {
            let mut row = vec![traj_ix.to_string(), step_ix.to_string()];
            row.extend(
                states
                    .slice(ndarray::s![traj_ix, step_ix, ..])
                    .iter()
                    .map(|q| q.to_string()),
            );
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;

    info!(
        "wrote {} trajectories of {} steps to {:?}",
        num_trajectories,
        num_steps,
        out.as_ref()
    );

    Ok(states)
}
