//! Train [`Agent`].
mod config;
mod session;
use crate::{
    error::ThermoError,
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::{EpsilonConfig, TrainerConfig};
use log::{info, warn};
pub use session::{should_update, TrainingSession};
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the episodic training loop.
///
/// # Training loop
///
/// For each of `n_episodes` episodes:
///
/// 1. Reset [`Env`] and the [`StepProcessor`], `score = 0`.
/// 2. For `t` in `1..=max_steps`:
///     1. The agent picks an action with [`Agent::explore`] at the current
///        exploration rate of the [`TrainingSession`].
///     2. Do an environment step, `score += reward`, and push the transition
///        made by the [`StepProcessor`] into the replay buffer.
///     3. If [`should_update`] holds for `t`, do an optimization step.
///     4. Stop the episode if the step is terminal.
/// 3. Append `score` to the score history and decay the exploration rate.
/// 4. Every `avg_interval` episodes, compute the mean of the last
///    `avg_interval` scores. If it exceeds the best one so far, the policy
///    network is saved as `(model_dir)/best_model.safetensors`.
/// 5. Every `save_interval` episodes, the policy network is saved as
///    `(model_dir)/policy_network_(episodes).safetensors`.
///
/// After the last episode, the policy and target networks are saved as
/// `final_policy_network.safetensors` and `final_target_network.safetensors`,
/// and the score history as `score_hist.json`.
///
/// A record with `episode`, `score`, `epsilon`, `loss` and `opt_steps` is
/// stored in the recorder after every episode and the aggregation is flushed
/// every `avg_interval` episodes.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|Transition|D[ReplayBufferBase]
///     D -->|Batch|A
/// ```
pub struct Trainer {
    /// The number of training episodes.
    n_episodes: usize,

    /// Interval of optimization in environment steps.
    opt_interval: usize,

    /// Window of the moving average and interval of evaluating it, in episodes.
    avg_interval: usize,

    /// Interval of saving the model in episodes.
    save_interval: usize,

    /// Where to save the trained model.
    model_dir: Option<PathBuf>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        if config.opt_interval == 0 || config.avg_interval == 0 {
            return Err(ThermoError::InvalidConfiguration(format!(
                "opt_interval and avg_interval must be positive, got {} and {}",
                config.opt_interval, config.avg_interval
            ))
            .into());
        }

        Ok(Self {
            n_episodes: config.n_episodes,
            opt_interval: config.opt_interval,
            avg_interval: config.avg_interval,
            save_interval: config.save_interval,
            model_dir: config.model_dir.map(PathBuf::from),
        })
    }

    fn save_checkpoint<E, R, A>(agent: &A, path: &Path)
    where
        E: Env,
        R: ReplayBufferBase,
        A: Agent<E, R>,
    {
        match agent.save_policy_network(path) {
            Ok(()) => info!("Saved the model in {:?}", path),
            Err(e) => warn!("Failed to save model in {:?}: {}", path, e),
        }
    }

    /// Runs an episode and returns the record of the episode.
    fn run_episode<E, P, R, A>(
        &self,
        env: &mut E,
        step_proc: &mut P,
        agent: &mut A,
        buffer: &mut R,
        session: &mut TrainingSession,
    ) -> Result<Record>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
    {
        let epsilon = session.epsilon();
        let mut obs = env.reset()?;
        step_proc.reset(obs.clone());
        let mut score = 0f32;
        let mut losses = vec![];

        for t in 1..=env.max_steps() {
            let act = agent.explore(&obs, epsilon)?;
            let (step, _) = env.step(&act)?;
            score += step.reward;
            let is_done = step.is_done();
            obs = step.obs.clone();
            buffer.push(step_proc.process(step)?)?;

            if should_update(t, self.opt_interval, buffer, agent.batch_size()) {
                let record = agent.opt(buffer)?;
                if let Ok(loss) = record.get_scalar("loss") {
                    losses.push(loss);
                }
                session.add_opt_step();
            }

            if is_done {
                break;
            }
        }

        let mut record = Record::from_slice(&[
            ("score", Scalar(score)),
            ("epsilon", Scalar(epsilon as f32)),
            ("opt_steps", Scalar(session.opt_steps() as f32)),
        ]);
        if !losses.is_empty() {
            let loss = losses.iter().sum::<f32>() / losses.len() as f32;
            record.insert("loss", Scalar(loss));
        }
        session.push_score(score);
        Ok(record)
    }

    /// Train the agent.
    ///
    /// `session` carries the exploration rate and the score history; it can
    /// be inspected after training.
    pub fn train<E, P, R, A>(
        &mut self,
        env: &mut E,
        step_proc: &mut P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
        session: &mut TrainingSession,
    ) -> Result<()>
    where
        E: Env,
        P: StepProcessor<E>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        A: Agent<E, R>,
    {
        if let Some(model_dir) = &self.model_dir {
            fs::create_dir_all(model_dir)?;
        }

        let timer = SystemTime::now();
        agent.train();

        for ep in 1..=self.n_episodes {
            let mut record = self.run_episode(env, step_proc, agent, buffer, session)?;
            record.insert("episode", Scalar(ep as f32));
            session.decay_epsilon();

            let is_avg_step = ep % self.avg_interval == 0;
            if is_avg_step {
                let avg = session.moving_average(self.avg_interval);
                info!(
                    "Episode {}/{}, average score {:.3}, epsilon {:.4}",
                    ep,
                    self.n_episodes,
                    avg,
                    session.epsilon()
                );
                record.insert("score_avg", Scalar(avg));

                if session.update_best(avg) {
                    if let Some(model_dir) = &self.model_dir {
                        Self::save_checkpoint(agent, &model_dir.join("best_model.safetensors"));
                    }
                }
            }

            if self.save_interval > 0 && ep % self.save_interval == 0 {
                if let Some(model_dir) = &self.model_dir {
                    let path = model_dir.join(format!("policy_network_{}.safetensors", ep));
                    Self::save_checkpoint(agent, &path);
                }
            }

            recorder.store(record);
            if is_avg_step {
                recorder.flush(ep as _);
            }
        }

        if let Some(model_dir) = &self.model_dir {
            agent.save_policy_network(&model_dir.join("final_policy_network.safetensors"))?;
            agent.save_target_network(&model_dir.join("final_target_network.safetensors"))?;
            session.save_score_hist(model_dir.join("score_hist.json"))?;
            info!("Saved the final model in {:?}", model_dir);
        }

        info!(
            "Training for {} episodes took {:.2} minutes",
            self.n_episodes,
            timer.elapsed()?.as_secs_f32() / 60.0
        );

        Ok(())
    }
}
