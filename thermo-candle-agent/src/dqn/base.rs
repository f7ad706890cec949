//! DQN agent implemented with candle.
use super::{argmax, learn_step, DqnConfig, DqnModel, EpsilonGreedy, QNetwork};
use crate::{
    model::{OutDim, SubModel},
    TensorBatch,
};
use anyhow::Result;
use candle_core::{Device, Tensor};
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, path::Path};
use thermo_core::{
    error::ThermoError,
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Agent, Configurable, DiscreteAct, Env, Policy, ReplayBufferBase,
};

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The agent owns a policy network, trained by gradient descent on the
/// Bellman-target loss, and a target network, soft-updated toward the
/// policy network after every gradient step. Observations are converted to
/// `f32` vectors and actions to indices of the network output.
///
/// The agent starts in evaluation mode, where [`Agent::explore`] ignores
/// epsilon and takes the greedy action. The trainer switches it to training
/// mode before the first episode.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: DiscreteAct,
{
    qnet: DqnModel<Q>,
    qnet_tgt: DqnModel<Q>,
    batch_size: usize,
    gamma: f64,
    tau: f64,
    train: bool,
    device: Device,
    n_opts: usize,
    rng: SmallRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: DiscreteAct,
{
    /// Action values of the policy network for an observation.
    pub fn q_values(&self, obs: &E::Obs) -> Result<Vec<f32>> {
        let xs: Vec<f32> = obs.clone().into();
        let n = xs.len();
        let xs = Tensor::from_vec(xs, (1, n), &self.device)?;
        Ok(self.qnet.forward(&xs)?.squeeze(0)?.to_vec1::<f32>()?)
    }

    /// The number of optimization steps done.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// The policy network.
    pub fn policy_network(&self) -> &DqnModel<Q> {
        &self.qnet
    }

    /// The target network.
    pub fn target_network(&self) -> &DqnModel<Q> {
        &self.qnet_tgt
    }
}

impl<E, Q, R> Configurable for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Clone + OutDim,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: DiscreteAct,
{
    type Config = DqnConfig<Q::Config>;

    /// Constructs DQN agent.
    fn build(config: Self::Config) -> Result<Self> {
        if config.batch_size == 0
            || !(0.0..=1.0).contains(&config.gamma)
            || !(0.0..=1.0).contains(&config.tau)
        {
            return Err(ThermoError::InvalidConfiguration(format!(
                "batch_size must be positive and gamma, tau in [0, 1], got {}, {}, {}",
                config.batch_size, config.gamma, config.tau
            ))
            .into());
        }

        if let Some(q_config) = &config.model_config.q_config {
            let n_actions = <E::Act as DiscreteAct>::N_ACTIONS;
            if q_config.out_dim() != n_actions {
                return Err(ThermoError::InvalidConfiguration(format!(
                    "the network has {} outputs for {} actions",
                    q_config.out_dim(),
                    n_actions
                ))
                .into());
            }
        }

        let device: Device = config.device.unwrap_or_default().try_into()?;
        let qnet_tgt =
            DqnModel::build_frozen(config.model_config.q_config.clone(), device.clone())?;
        let qnet = DqnModel::build(config.model_config, device.clone())?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            batch_size: config.batch_size,
            gamma: config.gamma,
            tau: config.tau,
            train: false,
            device,
            n_opts: 0,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: DiscreteAct,
{
    /// Takes the greedy action.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let q = self.q_values(obs)?;
        Ok((argmax(&q) as i64).into())
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs, E::Act>>,
    E::Obs: Into<Vec<f32>>,
    E::Act: DiscreteAct,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    /// Epsilon-greedy in training mode, greedy otherwise.
    fn explore(&mut self, obs: &E::Obs, epsilon: f64) -> Result<E::Act> {
        if !self.train {
            return self.sample(obs);
        }
        let q = self.q_values(obs)?;
        Ok((EpsilonGreedy::choose(epsilon, &q, &mut self.rng) as i64).into())
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        let batch = buffer.batch(self.batch_size)?;
        let batch = TensorBatch::from_transitions(batch, &self.device)?;
        let loss = learn_step(&mut self.qnet, &self.qnet_tgt, &batch, self.gamma, self.tau)?;
        self.n_opts += 1;
        trace!("opt step {}, loss {}", self.n_opts, loss);

        Ok(Record::from_slice(&[("loss", RecordValue::Scalar(loss))]))
    }

    fn save_policy_network(&self, path: &Path) -> Result<()> {
        self.qnet.save(path)
    }

    fn save_target_network(&self, path: &Path) -> Result<()> {
        self.qnet_tgt.save(path)
    }

    fn load_policy_network(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path)
    }
}
