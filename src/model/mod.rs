//! Data model for decoded schedstat samples.

mod counters;
mod snapshot;

pub use counters::CounterMap;
pub use snapshot::{CpuRecord, CpuTable, DomainRecord, Snapshot};
