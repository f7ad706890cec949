//! Writes training records to TFRecord files readable by tensorboard.
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;
use thermo_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};

/// Key of the x-axis value in written records.
const STEP_KEY: &str = "step";

/// Write records to TFRecord.
///
/// Records handed to [`AggregateRecorder::store`] are aggregated with
/// [`RecordStorage`] and written on [`AggregateRecorder::flush`], with the
/// flushed episode count as the x-axis.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    storage: RecordStorage,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Only [`RecordValue::Scalar`] values are written; strings are skipped.
    /// Records without a scalar `step` are skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get(STEP_KEY) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without scalar {:?} is skipped", STEP_KEY);
                return;
            }
        };

        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) if k.as_str() != STEP_KEY => {
                    self.writer.add_scalar(k, *v, step)
                }
                _ => {}
            }
        }
        self.writer.flush();
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let mut record = self.storage.aggregate();
        record.insert(STEP_KEY, RecordValue::Scalar(step as f32));
        self.write(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_write_event_file() -> std::io::Result<()> {
        let dir = TempDir::new("thermo_tensorboard")?;
        let logdir = dir.path().join("logs");
        let mut recorder = TensorboardRecorder::new(&logdir);

        for (ep, score) in [(1.0, 12.0), (2.0, 20.5)] {
            let mut record = Record::from_scalar("score", score);
            record.insert("episode", RecordValue::Scalar(ep));
            record.insert("reward_mech", RecordValue::String("V1".to_string()));
            recorder.store(record);
        }
        recorder.flush(2);
        recorder.write(Record::from_scalar("loss", 0.1));

        let n_events = fs::read_dir(&logdir)?
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("events.out.tfevents")
            })
            .count();
        assert_eq!(n_events, 1);
        Ok(())
    }
}
