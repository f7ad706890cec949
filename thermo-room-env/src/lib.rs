#![warn(missing_docs)]
//! Single-room heating simulator.
//!
//! [`RoomEnv`] simulates the temperature of a room over a day of 96
//! 15-minute intervals. Every step the agent switches the heating on or off
//! and is rewarded for keeping the room close to the setpoint.
//!
//! ```rust
//! use anyhow::Result;
//! use thermo_core::{Env as _, Policy as _};
//! use thermo_room_env::{RandomHeating, RoomEnv, RoomEnvConfig};
//!
//! fn main() -> Result<()> {
//!     let config = RoomEnvConfig::default().reward_mech("V2");
//!     let mut env = RoomEnv::build(&config, 42)?;
//!     let mut policy = RandomHeating::new(42);
//!
//!     let mut obs = env.reset()?;
//!     loop {
//!         let act = policy.sample(&obs)?;
//!         let (step, _record) = env.step(&act)?;
//!         if step.is_done() {
//!             break;
//!         }
//!         obs = step.obs;
//!     }
//!     assert_eq!(env.timestep(), 96);
//!     Ok(())
//! }
//! ```
mod act;
mod env;
mod obs;
mod outdoor;
mod policy;
mod render;
mod reward;
pub use act::RoomAct;
pub use env::{RoomEnv, RoomEnvConfig, RoomInfo};
pub use obs::RoomObs;
pub use outdoor::{OutdoorTemperature, Season, N_TIMESTEPS};
pub use policy::RandomHeating;
pub use render::{RenderRecorder, RenderSnapshot, Renderer, TextRenderer};
pub use reward::RewardPolicy;
