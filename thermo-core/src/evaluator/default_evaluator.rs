//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{
    record::{RecordValue::Scalar, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes and collects their scores.
///
/// ```ignore
/// let config = RoomEnvConfig::default();
/// let mut evaluator = DefaultEvaluator::<RoomEnv>::new(&config, 42, 10)?;
/// let scores = evaluator.evaluate(&mut policy, &mut NullRecorder::new())?;
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(
        &mut self,
        policy: &mut P,
        recorder: &mut dyn Recorder,
    ) -> Result<Vec<f32>> {
        let mut scores = Vec::with_capacity(self.n_episodes);

        for ep in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut score = 0f32;

            for t in 0..self.env.max_steps() {
                let act = policy.sample(&obs)?;
                let (step, mut record) = self.env.step(&act)?;
                score += step.reward;
                record.insert("episode", Scalar(ep as f32));
                record.insert("step", Scalar(t as f32));
                recorder.write(record);

                if step.is_done() {
                    break;
                }
                obs = step.obs;
            }

            info!("Evaluation episode {}, score {:.3}", ep + 1, score);
            scores.push(score);
        }

        self.env.close();
        Ok(scores)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// The environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}
