//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The maximum number of optimization steps.
    pub max_opts: usize,

    /// Interval of optimization steps in environment steps.
    pub opt_interval: usize,

    /// Interval of evaluation in optimization steps.
    pub eval_interval: usize,

    /// Interval of flushing records in optimization steps.
    pub flush_record_interval: usize,

    /// Interval of saving model parameters in optimization steps.
    pub save_interval: usize,

    /// Where to save the trained model. No checkpoints are written when
    /// `None`.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_opts: 0,
            opt_interval: 1,
            eval_interval: usize::MAX,
            flush_record_interval: usize::MAX,
            save_interval: usize::MAX,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of optimization steps.
    pub fn max_opts(mut self, v: usize) -> Self {
        self.max_opts = v;
        self
    }

    /// Sets the interval of optimization in environment steps.
    pub fn opt_interval(mut self, v: usize) -> Self {
        self.opt_interval = v;
        self
    }

    /// Sets the interval of evaluation in optimization steps.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the interval of flushing records in optimization steps.
    pub fn flush_record_interval(mut self, v: usize) -> Self {
        self.flush_record_interval = v;
        self
    }

    /// Sets the interval of saving in optimization steps.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the directory where model parameters are saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Constructs [`TrainerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`TrainerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn yaml_roundtrip() -> Result<()> {
        let config = TrainerConfig::default()
            .max_opts(100)
            .opt_interval(50)
            .eval_interval(10)
            .model_dir("some/directory");

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer.yaml");
        config.save(&path)?;
        assert_eq!(TrainerConfig::load(&path)?, config);
        Ok(())
    }
}
