//! Rendering of room trajectories.
//!
//! The simulator never renders by itself. Step records written by an
//! evaluation loop are turned into [`RenderSnapshot`]s by [`RenderRecorder`]
//! and handed to a [`Renderer`].
use crate::N_TIMESTEPS;
use anyhow::Result;
use log::{info, warn};
use std::{thread, time::Duration};
use thermo_core::record::{Record, Recorder};

/// Read-only view of the simulation after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot<'a> {
    /// Room temperature.
    pub temperature: f32,

    /// Running score of the episode.
    pub score: f32,

    /// Heating switch applied at this step.
    pub action: i64,

    /// Index of the timestep consumed by this step.
    pub timestep: usize,

    /// Room temperatures of the episode so far.
    pub temperature_history: &'a [f32],

    /// Setpoints of the episode so far.
    pub setpoint_history: &'a [f32],
}

impl RenderSnapshot<'_> {
    /// Returns `true` for the last step of the day.
    pub fn is_end_of_day(&self) -> bool {
        self.timestep + 1 == N_TIMESTEPS
    }

    /// Wall-clock time of the timestep as `HH:MM`.
    pub fn clock(&self) -> String {
        let minutes = self.timestep * 15;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Draws snapshots of the simulation.
pub trait Renderer {
    /// Draws a frame.
    fn render(&mut self, snapshot: &RenderSnapshot) -> Result<()>;

    /// Releases resources held by the renderer.
    fn close(&mut self) {}
}

/// Renders snapshots as log lines.
pub struct TextRenderer {
    wait_in_millis: u64,
}

impl TextRenderer {
    /// `wait_in_millis` is the pause at the end of the day.
    pub fn new(wait_in_millis: u64) -> Self {
        Self { wait_in_millis }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(5000)
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot) -> Result<()> {
        let setpoint = snapshot.setpoint_history.last().copied().unwrap_or(f32::NAN);
        info!(
            "{} room {:6.2} setpoint {:5.1} heating {:3} score {:6.1}",
            snapshot.clock(),
            snapshot.temperature,
            setpoint,
            if snapshot.action == 1 { "on" } else { "off" },
            snapshot.score
        );

        if snapshot.is_end_of_day() && self.wait_in_millis > 0 {
            thread::sleep(Duration::from_millis(self.wait_in_millis));
        }
        Ok(())
    }
}

/// A [`Recorder`] rebuilding trajectories from step records for a [`Renderer`].
///
/// Records need the keys `temperature`, `setpoint`, `action`, `score` and
/// `timestep`, as emitted by [`RoomEnv`](crate::RoomEnv). A record at
/// timestep `0` starts a new trajectory. Malformed records and rendering
/// failures are logged and skipped.
pub struct RenderRecorder<R: Renderer> {
    renderer: R,
    temperature_history: Vec<f32>,
    setpoint_history: Vec<f32>,
}

impl<R: Renderer> RenderRecorder<R> {
    /// Wraps a renderer.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            temperature_history: Vec::with_capacity(N_TIMESTEPS),
            setpoint_history: Vec::with_capacity(N_TIMESTEPS),
        }
    }

    /// Closes the renderer and returns it.
    pub fn into_inner(mut self) -> R {
        self.renderer.close();
        self.renderer
    }

    fn try_write(&mut self, record: &Record) -> Result<()> {
        let temperature = record.get_scalar("temperature")?;
        let setpoint = record.get_scalar("setpoint")?;
        let timestep = record.get_scalar("timestep")? as usize;

        if timestep == 0 {
            self.temperature_history.clear();
            self.setpoint_history.clear();
        }
        self.temperature_history.push(temperature);
        self.setpoint_history.push(setpoint);

        let snapshot = RenderSnapshot {
            temperature,
            score: record.get_scalar("score")?,
            action: record.get_scalar("action")? as i64,
            timestep,
            temperature_history: &self.temperature_history,
            setpoint_history: &self.setpoint_history,
        };
        self.renderer.render(&snapshot)
    }
}

impl<R: Renderer> Recorder for RenderRecorder<R> {
    fn write(&mut self, record: Record) {
        if let Err(e) = self.try_write(&record) {
            warn!("Skipped rendering a step: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermo_core::record::RecordValue::Scalar;

    #[derive(Default)]
    struct Frames {
        lengths: Vec<usize>,
        ends_of_day: usize,
        fail: bool,
    }

    impl Renderer for Frames {
        fn render(&mut self, snapshot: &RenderSnapshot) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            assert_eq!(
                snapshot.temperature_history.len(),
                snapshot.setpoint_history.len()
            );
            self.lengths.push(snapshot.temperature_history.len());
            if snapshot.is_end_of_day() {
                self.ends_of_day += 1;
            }
            Ok(())
        }
    }

    fn record(timestep: usize) -> Record {
        Record::from_slice(&[
            ("temperature", Scalar(19.0 + timestep as f32 * 0.1)),
            ("setpoint", Scalar(21.0)),
            ("action", Scalar(1.0)),
            ("score", Scalar(timestep as f32)),
            ("timestep", Scalar(timestep as f32)),
        ])
    }

    #[test]
    fn test_histories_restart_each_episode() {
        let mut recorder = RenderRecorder::new(Frames::default());
        for _ in 0..2 {
            for t in 0..N_TIMESTEPS {
                recorder.write(record(t));
            }
        }
        let frames = recorder.into_inner();
        assert_eq!(frames.lengths.len(), 2 * N_TIMESTEPS);
        assert_eq!(frames.lengths[N_TIMESTEPS - 1], N_TIMESTEPS);
        assert_eq!(frames.lengths[N_TIMESTEPS], 1);
        assert_eq!(frames.ends_of_day, 2);
    }

    #[test]
    fn test_failures_are_skipped() {
        let mut recorder = RenderRecorder::new(Frames {
            fail: true,
            ..Default::default()
        });
        recorder.write(record(0));
        recorder.write(Record::from_scalar("temperature", 20.0));
        assert!(recorder.into_inner().lengths.is_empty());
    }

    #[test]
    fn test_clock() {
        let snapshot = RenderSnapshot {
            temperature: 20.0,
            score: 0.0,
            action: 0,
            timestep: 95,
            temperature_history: &[],
            setpoint_history: &[],
        };
        assert_eq!(snapshot.clock(), "23:45");
        assert!(snapshot.is_end_of_day());
    }
}
