//! Action-value function owning its parameters.
use crate::{
    model::SubModel,
    opt::{Optimizer, OptimizerConfig},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use thermo_core::error::ThermoError;

/// Action-value function used by the learner.
///
/// Parameters are identified by name, so a policy network and a target
/// network built from the same configuration pair up one to one.
pub trait QNetwork {
    /// Action values of shape `[n, n_actions]` for observations of shape `[n, d]`.
    fn forward(&self, obs: &Tensor) -> Result<Tensor>;

    /// Trainable parameters, sorted by name.
    fn parameters(&self) -> Vec<(String, Var)>;

    /// Applies a gradient step minimizing `loss`.
    fn backward_step(&mut self, loss: &Tensor) -> Result<()>;
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<Q> {
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q> {
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> DqnModelConfig<Q>
where
    Q: DeserializeOwned + Serialize,
{
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// An action-value function owning its parameters and, unless it is a
/// target network, an optimizer.
pub struct DqnModel<Q>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
{
    device: Device,
    varmap: VarMap,
    q: Q,
    opt: Option<Optimizer>,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
{
    /// Constructs [`DqnModel`] with freshly initialized parameters.
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Result<Self> {
        let mut model = Self::build_frozen(config.q_config, device)?;
        model.opt = Some(config.opt_config.build(model.varmap.all_vars())?);
        Ok(model)
    }

    /// Constructs [`DqnModel`] without an optimizer, for a target network
    /// updated only by [`soft_update`](super::soft_update).
    pub fn build_frozen(q_config: Option<Q::Config>, device: Device) -> Result<Self> {
        let q_config = q_config.context("q_config is not set.")?;
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };

        Ok(Self {
            device,
            varmap,
            q,
            opt: None,
        })
    }

    /// Returns `true` if the model has an optimizer.
    pub fn is_trainable(&self) -> bool {
        self.opt.is_some()
    }

    /// The device of the parameters.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save dqnmodel to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters saved with [`DqnModel::save`].
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap
            .load(&path)
            .with_context(|| format!("Failed to load {:?}", path.as_ref()))?;
        info!("Load dqnmodel from {:?}", path.as_ref());
        Ok(())
    }
}

impl<Q> QNetwork for DqnModel<Q>
where
    Q: SubModel<Input = Tensor, Output = Tensor>,
{
    fn forward(&self, obs: &Tensor) -> Result<Tensor> {
        self.q.forward(obs)
    }

    fn parameters(&self) -> Vec<(String, Var)> {
        let data = self
            .varmap
            .data()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut params: Vec<_> = data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        params
    }

    fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self.opt.as_mut() {
            Some(opt) => opt.backward_step(loss),
            None => Err(ThermoError::InvalidState(
                "backward_step on a model without optimizer".to_string(),
            )
            .into()),
        }
    }
}
