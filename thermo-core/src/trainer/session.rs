//! State of a training run.
use super::{EpsilonConfig, TrainerConfig};
use crate::{error::ThermoError, ExperienceBufferBase};
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Returns `true` if an optimization step is due at environment step `t`.
///
/// `t` counts the steps of the current episode starting from 1. An update is
/// due when `t` is a multiple of `every_n_steps` and `buffer` holds at least
/// `batch_size` transitions.
pub fn should_update<B: ExperienceBufferBase>(
    t: usize,
    every_n_steps: usize,
    buffer: &B,
    batch_size: usize,
) -> bool {
    every_n_steps > 0 && t % every_n_steps == 0 && buffer.len() >= batch_size
}

/// Mutable state of a training run.
///
/// Holds the exploration rate, the history of episode scores and the best
/// moving average seen so far. A session is created by the caller and handed
/// to [`Trainer::train`](super::Trainer::train), so independent runs never
/// share state.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    epsilon: f64,
    eps_min: f64,
    eps_decay: f64,
    score_hist: Vec<f32>,
    best_avg_score: f32,
    opt_steps: usize,
}

impl TrainingSession {
    /// Creates a session with the exploration schedule of the config.
    pub fn new(config: &TrainerConfig) -> Result<Self> {
        Self::with_epsilon(&config.epsilon)
    }

    /// Creates a session with the given exploration schedule.
    pub fn with_epsilon(config: &EpsilonConfig) -> Result<Self> {
        let EpsilonConfig {
            eps_start,
            eps_min,
            eps_decay,
        } = *config;

        if !(0.0..=1.0).contains(&eps_min) || !(eps_min..=1.0).contains(&eps_start) {
            return Err(ThermoError::InvalidConfiguration(format!(
                "epsilon must satisfy 0 <= eps_min <= eps_start <= 1, got eps_min={}, eps_start={}",
                eps_min, eps_start
            ))
            .into());
        }
        if !(eps_decay > 0.0 && eps_decay <= 1.0) {
            return Err(ThermoError::InvalidConfiguration(format!(
                "eps_decay must be in (0, 1], got {}",
                eps_decay
            ))
            .into());
        }

        Ok(Self {
            epsilon: eps_start,
            eps_min,
            eps_decay,
            score_hist: vec![],
            best_avg_score: 0.0,
            opt_steps: 0,
        })
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Applies `epsilon = max(eps_min, epsilon * eps_decay)` and returns the new value.
    pub fn decay_epsilon(&mut self) -> f64 {
        self.epsilon = self.eps_min.max(self.epsilon * self.eps_decay);
        self.epsilon
    }

    /// Appends the score of a finished episode.
    pub fn push_score(&mut self, score: f32) {
        self.score_hist.push(score);
    }

    /// Scores of the finished episodes, in order.
    pub fn score_hist(&self) -> &[f32] {
        &self.score_hist
    }

    /// The number of finished episodes.
    pub fn n_episodes(&self) -> usize {
        self.score_hist.len()
    }

    /// Mean of the last `window` scores, or of all scores if there are fewer.
    pub fn moving_average(&self, window: usize) -> f32 {
        let n = self.score_hist.len().min(window);
        if n == 0 {
            return 0.0;
        }
        self.score_hist[self.score_hist.len() - n..].iter().sum::<f32>() / n as f32
    }

    /// Best moving average seen so far.
    pub fn best_avg_score(&self) -> f32 {
        self.best_avg_score
    }

    /// Records `avg` if it improves on the best moving average.
    ///
    /// Returns `true` if `avg` became the new best.
    pub fn update_best(&mut self, avg: f32) -> bool {
        if avg > self.best_avg_score {
            self.best_avg_score = avg;
            true
        } else {
            false
        }
    }

    /// Counts an optimization step.
    pub fn add_opt_step(&mut self) {
        self.opt_steps += 1;
    }

    /// The number of optimization steps done in this session.
    pub fn opt_steps(&self) -> usize {
        self.opt_steps
    }

    /// Writes the score history as a JSON array.
    pub fn save_score_hist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create score history {:?}", path))?;
        serde_json::to_writer(BufWriter::new(file), &self.score_hist)?;
        Ok(())
    }

    /// Reads a score history written by [`TrainingSession::save_score_hist`].
    pub fn load_score_hist(path: impl AsRef<Path>) -> Result<Vec<f32>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open score history {:?}", path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig, Transition};
    use crate::ReplayBufferBase;
    use tempdir::TempDir;

    #[test]
    fn test_epsilon_decay_is_monotone_and_floored() -> Result<()> {
        let config = EpsilonConfig {
            eps_start: 1.0,
            eps_min: 0.01,
            eps_decay: 0.9,
        };
        let mut session = TrainingSession::with_epsilon(&config)?;
        let mut prev = session.epsilon();

        for _ in 0..200 {
            let eps = session.decay_epsilon();
            assert!(eps <= prev);
            assert!(eps >= 0.01);
            prev = eps;
        }
        assert_eq!(session.epsilon(), 0.01);
        Ok(())
    }

    #[test]
    fn test_invalid_epsilon_config() {
        let config = EpsilonConfig {
            eps_start: 1.0,
            eps_min: 0.01,
            eps_decay: 1.5,
        };
        let err = TrainingSession::with_epsilon(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThermoError>(),
            Some(ThermoError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_moving_average_and_best() -> Result<()> {
        let mut session = TrainingSession::new(&TrainerConfig::default())?;
        assert_eq!(session.moving_average(3), 0.0);

        for s in [1.0, 2.0, 3.0, 4.0, 5.0] {
            session.push_score(s);
        }
        assert_eq!(session.moving_average(3), 4.0);
        assert_eq!(session.moving_average(10), 3.0);

        assert!(session.update_best(4.0));
        assert!(!session.update_best(4.0));
        assert!(!session.update_best(3.0));
        assert_eq!(session.best_avg_score(), 4.0);
        Ok(())
    }

    #[test]
    fn test_score_hist_roundtrip() -> Result<()> {
        let mut session = TrainingSession::new(&TrainerConfig::default())?;
        session.push_score(12.5);
        session.push_score(40.3);

        let dir = TempDir::new("score_hist")?;
        let path = dir.path().join("score_hist.json");
        session.save_score_hist(&path)?;
        assert_eq!(TrainingSession::load_score_hist(&path)?, vec![12.5, 40.3]);
        Ok(())
    }

    #[test]
    fn test_should_update() -> Result<()> {
        let config = SimpleReplayBufferConfig::default().capacity(100);
        let mut buffer = SimpleReplayBuffer::<f32, i64>::build(&config)?;
        for i in 0..19 {
            buffer.push(Transition::new(i as f32, 0, 0.0, i as f32, false))?;
        }

        // 19 transitions, batch of 20
        assert!(!should_update(4, 4, &buffer, 20));

        buffer.push(Transition::new(19.0, 0, 0.0, 19.0, false))?;
        assert!(should_update(4, 4, &buffer, 20));
        assert!(should_update(8, 4, &buffer, 20));
        assert!(!should_update(5, 4, &buffer, 20));
        assert!(!should_update(4, 0, &buffer, 20));
        Ok(())
    }
}
