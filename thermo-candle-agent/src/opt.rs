//! Optimizers of the action-value function.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer.
///
/// Moment decay rates and epsilon take the defaults of the underlying
/// implementations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam.
    Adam {
        /// Learning rate.
        lr: f64,
    },

    /// Adam with decoupled weight decay.
    AdamW {
        /// Learning rate.
        lr: f64,

        /// Weight decay, `0.01` if not given.
        #[serde(default)]
        weight_decay: Option<f64>,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-3 }
    }
}

impl OptimizerConfig {
    /// Builds an optimizer updating `vars`.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        Ok(match *self {
            Self::Adam { lr } => {
                let params = ParamsAdam {
                    lr,
                    ..ParamsAdam::default()
                };
                Optimizer::Adam(Adam::new(vars, params)?)
            }
            Self::AdamW { lr, weight_decay } => {
                let defaults = ParamsAdamW::default();
                let params = ParamsAdamW {
                    lr,
                    weight_decay: weight_decay.unwrap_or(defaults.weight_decay),
                    ..defaults
                };
                Optimizer::AdamW(AdamW::new(vars, params)?)
            }
        })
    }

    /// The learning rate.
    pub fn lr(&self) -> f64 {
        match *self {
            Self::Adam { lr } | Self::AdamW { lr, .. } => lr,
        }
    }

    /// Replaces the learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::Adam { .. } => Self::Adam { lr },
            Self::AdamW { weight_decay, .. } => Self::AdamW { lr, weight_decay },
        }
    }
}

/// An optimizer built from [`OptimizerConfig`].
pub enum Optimizer {
    /// Adam.
    Adam(Adam),

    /// AdamW.
    AdamW(AdamW),
}

impl Optimizer {
    /// Computes the gradients of `loss` and updates the variables.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => opt.backward_step(loss)?,
            Self::AdamW(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn minimize(config: &OptimizerConfig) -> Result<(f32, f32)> {
        let x = Var::new(&[0f32], &Device::Cpu)?;
        let mut opt = config.build(vec![x.clone()])?;
        let loss = |x: &Var| -> Result<Tensor> {
            Ok(x.as_tensor().affine(1.0, -3.0)?.sqr()?.sum_all()?)
        };

        let initial = loss(&x)?.to_scalar::<f32>()?;
        for _ in 0..50 {
            opt.backward_step(&loss(&x)?)?;
        }
        Ok((initial, loss(&x)?.to_scalar::<f32>()?))
    }

    #[test]
    fn test_optimizers_decrease_loss() -> Result<()> {
        for config in [
            OptimizerConfig::default().learning_rate(0.1),
            OptimizerConfig::AdamW {
                lr: 0.1,
                weight_decay: None,
            },
        ] {
            let (initial, last) = minimize(&config)?;
            assert!(last < initial, "{:?}: {} >= {}", config, last, initial);
        }
        Ok(())
    }

    #[test]
    fn test_learning_rate() {
        let config = OptimizerConfig::AdamW {
            lr: 1e-3,
            weight_decay: Some(0.0),
        }
        .learning_rate(0.5);
        assert_eq!(config.lr(), 0.5);
        assert_eq!(
            config,
            OptimizerConfig::AdamW {
                lr: 0.5,
                weight_decay: Some(0.0)
            }
        );
    }
}
