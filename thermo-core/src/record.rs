//! Types and traits for recording training metrics and environment steps.
//!
//! * [`Record`] - key-value container of [`RecordValue`]s
//! * [`Recorder`] - writes records to some destination
//! * [`AggregateRecorder`] - stores records and flushes aggregated values
//! * [`RecordStorage`] - aggregation of stored records (min, max, mean, median)
//! * [`BufferedRecorder`] - keeps records in memory, e.g. the trajectory of an evaluation run
//! * [`NullRecorder`] - discards every record
//!
//! ```rust
//! use thermo_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("timestep", RecordValue::Scalar(3.0));
//! record.insert("temperature", RecordValue::Scalar(19.4));
//! assert_eq!(record.get_scalar("timestep").unwrap(), 3.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
