//! Train [`Agent`].
mod config;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, Evaluator,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
use std::path::Path;

/// Manages the training loop and related objects.
///
/// The loop is strictly sequential: one environment step at a time, an
/// optimization step every `opt_interval` environment steps, and evaluation,
/// checkpointing and record flushing at their configured intervals of
/// optimization steps. Whenever an evaluation improves on the best seen
/// return, the agent parameters are saved under `(model_dir)/best`; interval
/// checkpoints go to `(model_dir)/(opt_steps)`.
pub struct Trainer {
    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Interval of optimization in environment steps.
    opt_interval: usize,

    /// Interval of evaluation in optimization steps.
    eval_interval: usize,

    /// Interval of flushing records in optimization steps.
    flush_record_interval: usize,

    /// Interval of saving the model in optimization steps.
    save_interval: usize,

    /// The maximal number of optimization steps.
    max_opts: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            model_dir: config.model_dir,
            opt_interval: config.opt_interval,
            eval_interval: config.eval_interval,
            flush_record_interval: config.flush_record_interval,
            save_interval: config.save_interval,
            max_opts: config.max_opts,
        }
    }

    fn save_model<E: Env, A: Agent<E>>(agent: &A, model_dir: &str) {
        match agent.save_params(Path::new(model_dir)) {
            Ok(()) => info!("Saved the model in {:?}.", model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", model_dir, e),
        }
    }

    fn save_best_model<E: Env, A: Agent<E>>(agent: &A, model_dir: &str) {
        let model_dir = format!("{}/best", model_dir);
        Self::save_model::<E, A>(agent, &model_dir);
    }

    fn save_model_with_steps<E: Env, A: Agent<E>>(agent: &A, model_dir: &str, steps: usize) {
        let model_dir = format!("{}/{}", model_dir, steps);
        Self::save_model::<E, A>(agent, &model_dir);
    }

    /// Train the agent on the given environment.
    pub fn train<E, A, D>(
        &mut self,
        mut env: E,
        agent: &mut A,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        A: Agent<E>,
        D: Evaluator<E>,
    {
        let mut max_eval_return = f32::MIN;
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        let mut episode_return = 0f32;
        let mut episode_len: usize = 0;
        // Episode stats carried over to the record of the next opt step.
        let mut pending = Record::empty();

        agent.train();
        let mut obs = env.reset()?;

        loop {
            let act = agent.sample(&obs);
            let step = env.step(&act)?;
            agent.observe(&step);
            env_steps += 1;
            episode_return += step.reward;
            episode_len += 1;

            obs = if step.is_done() {
                pending.insert("episode_return", Scalar(episode_return));
                pending.insert("episode_len", Scalar(episode_len as f32));
                episode_return = 0f32;
                episode_len = 0;
                env.reset()?
            } else {
                step.obs
            };

            if env_steps % self.opt_interval != 0 {
                continue;
            }

            let mut record = agent.opt_with_record();
            opt_steps += 1;
            record.merge_inplace(std::mem::take(&mut pending));

            if opt_steps % self.eval_interval == 0 {
                info!("Starts evaluation of the trained model");
                agent.eval();
                let eval_return = evaluator.evaluate(agent)?;
                agent.train();
                record.insert("eval_return", Scalar(eval_return));

                // Save the best model up to the current iteration.
                if eval_return > max_eval_return {
                    max_eval_return = eval_return;
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_best_model::<E, A>(agent, model_dir);
                    }
                }
            }

            if opt_steps % self.save_interval == 0 {
                if let Some(model_dir) = self.model_dir.as_ref() {
                    Self::save_model_with_steps::<E, A>(agent, model_dir, opt_steps);
                }
            }

            if !record.is_empty() {
                recorder.write(opt_steps, record);
            }

            if opt_steps % self.flush_record_interval == 0 {
                recorder.flush();
            }

            if opt_steps >= self.max_opts {
                break;
            }
        }

        recorder.flush();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::BufferedRecorder, DefaultEvaluator, Policy, Step};
    use ndarray::Array1;

    #[derive(Clone)]
    struct TestConfig {
        episode_len: usize,
    }

    struct TestEnv {
        episode_len: usize,
        t: usize,
    }

    impl Env for TestEnv {
        type Config = TestConfig;
        type Obs = Array1<f64>;
        type Act = Array1<f64>;

        fn build(config: &Self::Config, _seed: u64) -> Result<Self> {
            Ok(Self {
                episode_len: config.episode_len,
                t: 0,
            })
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.t = 0;
            Ok(Array1::zeros(1))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset()
        }

        fn step(&mut self, act: &Self::Act) -> Result<Step<Self>> {
            self.t += 1;
            let is_truncated = self.t >= self.episode_len;
            Ok(Step::new(
                Array1::zeros(1),
                act.clone(),
                1.0,
                false,
                is_truncated,
            ))
        }
    }

    struct TestAgent {
        opts: usize,
        train_mode: bool,
    }

    impl Policy<TestEnv> for TestAgent {
        fn sample(&mut self, _obs: &Array1<f64>) -> Array1<f64> {
            Array1::zeros(1)
        }
    }

    impl Agent<TestEnv> for TestAgent {
        fn train(&mut self) {
            self.train_mode = true;
        }

        fn eval(&mut self) {
            self.train_mode = false;
        }

        fn is_train(&self) -> bool {
            self.train_mode
        }

        fn observe(&mut self, _step: &Step<TestEnv>) {}

        fn opt_with_record(&mut self) -> Record {
            self.opts += 1;
            Record::from_scalar("opt", self.opts as f32)
        }

        fn save_params(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn runs_until_max_opts_and_records_each_step() {
        let config = TestConfig { episode_len: 4 };
        let env = TestEnv::build(&config, 0).unwrap();
        let mut agent = TestAgent {
            opts: 0,
            train_mode: false,
        };
        let mut evaluator = DefaultEvaluator::<TestEnv>::new(&config, 0, 1).unwrap();
        let mut recorder = BufferedRecorder::new();

        let mut trainer = Trainer::build(
            TrainerConfig::default()
                .max_opts(3)
                .opt_interval(5)
                .eval_interval(2),
        );
        trainer
            .train(env, &mut agent, &mut recorder, &mut evaluator)
            .unwrap();

        assert_eq!(agent.opts, 3);
        assert!(agent.is_train());

        let steps: Vec<usize> = recorder.iter().map(|(step, _)| *step).collect();
        assert_eq!(steps, vec![1, 2, 3]);

        // Evaluation ran at the second optimization step only; each episode
        // collects one unit of reward per step.
        let records: Vec<&Record> = recorder.iter().map(|(_, r)| r).collect();
        assert!(records[0].get_scalar("eval_return").is_err());
        assert_eq!(records[1].get_scalar("eval_return").unwrap(), 4.0);
        assert!(records[2].get_scalar("eval_return").is_err());

        // Episodes of length 4 complete between optimization steps, so the
        // carried-over stats land in the next record.
        assert_eq!(records[0].get_scalar("episode_return").unwrap(), 4.0);
    }
}
