use anyhow::Result;
use armbox::{
    config::{EvalSpec, SampleSpec, TrainSpec},
    evaluate, sample_trajectories, train,
};
use armbox_core::{trajectory::TrajectoryConfig, TrainerConfig};
use armbox_planar::ReachEnvConfig;
use std::{fs, path::Path};
use tempdir::TempDir;

#[test]
fn train_then_evaluate() -> Result<()> {
    let dir = TempDir::new("workflow")?;
    let model_dir = dir.path().join("reach").to_string_lossy().into_owned();

    let env = ReachEnvConfig {
        max_episode_steps: 20,
        ..Default::default()
    };
    let spec = TrainSpec {
        trainer: TrainerConfig::default()
            .max_opts(2)
            .opt_interval(2 * env.max_episode_steps)
            .eval_interval(1)
            .save_interval(1)
            .flush_record_interval(1)
            .model_dir(&model_dir),
        env,
        eval_episodes: 1,
        ..Default::default()
    };
    train(&spec)?;

    let best = Path::new(&model_dir).join("best");
    assert!(best.join("policy.bincode").is_file());
    // Interval checkpoints for both optimization steps.
    assert!(Path::new(&model_dir).join("1").is_dir());
    assert!(Path::new(&model_dir).join("2").is_dir());

    let eval_spec = EvalSpec {
        env: spec.env.clone(),
        agent: spec.agent.clone(),
        model_dir,
        n_episodes: 1,
        seed: 1,
    };
    let mean_return = evaluate(&eval_spec)?;
    assert!(mean_return.is_finite());
    // Rewards are negative distances, so returns cannot be positive.
    assert!(mean_return <= 0.0);

    Ok(())
}

#[test]
fn sample_writes_csv() -> Result<()> {
    let dir = TempDir::new("sample")?;
    let out = dir.path().join("trajectories.csv");

    let spec = SampleSpec {
        trajectory: TrajectoryConfig::default()
            .num_trajectories(2)
            .duration_secs(1.0)
            .warmup_secs(0.5),
        seed: 5,
        ..Default::default()
    };
    let states = sample_trajectories(&spec, &out)?;
    // dt = 0.01 s: 100 raw steps per trajectory, the first 50 dropped.
    assert_eq!(states.dim(), (2, 50, 2));

    let contents = fs::read_to_string(&out)?;
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("trajectory,step,q0,q1"));
    assert_eq!(lines.count(), 100);

    Ok(())
}
