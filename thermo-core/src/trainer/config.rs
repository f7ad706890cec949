//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Parameters of the multiplicative epsilon decay.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonConfig {
    /// Initial exploration rate.
    pub eps_start: f64,

    /// Lower bound of the exploration rate.
    pub eps_min: f64,

    /// Factor applied to the exploration rate after every episode.
    pub eps_decay: f64,
}

impl Default for EpsilonConfig {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_min: 0.01,
            eps_decay: 0.9975,
        }
    }
}

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training episodes.
    pub n_episodes: usize,

    /// Interval of optimization steps in environment steps of an episode.
    pub opt_interval: usize,

    /// Window of the moving average of scores, and interval in episodes
    /// at which the average is computed and the best model is saved.
    pub avg_interval: usize,

    /// Interval of saving the policy network in episodes.
    pub save_interval: usize,

    /// Where to save the trained model.
    pub model_dir: Option<String>,

    /// Exploration schedule.
    pub epsilon: EpsilonConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 3000,
            opt_interval: 4,
            avg_interval: 200,
            save_interval: 500,
            model_dir: None,
            epsilon: EpsilonConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the interval of optimization in environment steps.
    pub fn opt_interval(mut self, opt_interval: usize) -> Self {
        self.opt_interval = opt_interval;
        self
    }

    /// Sets the window and interval of the moving average of scores.
    pub fn avg_interval(mut self, avg_interval: usize) -> Self {
        self.avg_interval = avg_interval;
        self
    }

    /// Sets the interval of saving in episodes.
    pub fn save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval;
        self
    }

    /// Sets the directory where the trained model is saved.
    pub fn model_dir<T: Into<String>>(mut self, model_dir: T) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }

    /// Sets the exploration schedule.
    pub fn epsilon(mut self, epsilon: EpsilonConfig) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
