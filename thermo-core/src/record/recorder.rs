use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// Stores records, then writes values aggregated from them.
///
/// [`Trainer`](crate::Trainer) stores a record per episode and flushes the
/// aggregation periodically.
pub trait AggregateRecorder: Recorder {
    /// Store the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the x-axis of the written values, the number of episodes
    /// in the training loop.
    fn flush(&mut self, step: i64);
}
