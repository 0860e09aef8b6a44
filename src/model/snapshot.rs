//! Decoded `/proc/schedstat` sample.
//!
//! A [`Snapshot`] is built once by the reader and only ever read afterwards.
//! Two snapshots are combined exclusively through the functions in
//! [`crate::delta`].

use std::time::Instant;

use super::counters::CounterMap;
use crate::collector::schedstat::schema::SchemaVersion;

/// Counters of one `domainN` line, bound to the snapshot's field schema.
///
/// Domains carry no identity beyond their position within a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub counters: CounterMap<u64>,
}

impl DomainRecord {
    pub fn get(&self, field: &str) -> Option<u64> {
        self.counters.get(field).copied()
    }
}

/// Raw counters of one `cpuN` line, unnamed and in kernel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuRecord {
    pub label: String,
    pub values: Vec<u64>,
}

/// CPU records keyed by label, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuTable {
    records: Vec<CpuRecord>,
}

impl CpuTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. A repeated label replaces the earlier values in place.
    pub fn insert(&mut self, record: CpuRecord) {
        match self.records.iter_mut().find(|r| r.label == record.label) {
            Some(existing) => existing.values = record.values,
            None => self.records.push(record),
        }
    }

    pub fn get(&self, label: &str) -> Option<&CpuRecord> {
        self.records.iter().find(|r| r.label == label)
    }

    /// The first CPU seen in the input.
    pub fn first(&self) -> Option<&CpuRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CpuRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CpuRecord> for CpuTable {
    fn from_iter<I: IntoIterator<Item = CpuRecord>>(iter: I) -> Self {
        let mut table = CpuTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// One complete read of the schedstat source.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: SchemaVersion,
    domains: Vec<DomainRecord>,
    cpus: CpuTable,
    /// Value of the kernel `timestamp` line, in jiffies.
    kernel_timestamp: Option<u64>,
    /// Wall clock at capture, milliseconds since the Unix epoch.
    captured_at_ms: i64,
    captured: Instant,
}

impl Snapshot {
    pub fn new(
        version: SchemaVersion,
        domains: Vec<DomainRecord>,
        cpus: CpuTable,
        kernel_timestamp: Option<u64>,
    ) -> Self {
        Self {
            version,
            domains,
            cpus,
            kernel_timestamp,
            captured_at_ms: chrono::Utc::now().timestamp_millis(),
            captured: Instant::now(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn domains(&self) -> &[DomainRecord] {
        &self.domains
    }

    pub fn cpus(&self) -> &CpuTable {
        &self.cpus
    }

    pub fn kernel_timestamp(&self) -> Option<u64> {
        self.kernel_timestamp
    }

    pub fn captured_at_ms(&self) -> i64 {
        self.captured_at_ms
    }

    /// Monotonic capture instant, for measuring the real sampling interval.
    pub fn captured(&self) -> Instant {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(label: &str, values: &[u64]) -> CpuRecord {
        CpuRecord {
            label: label.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_cpu_table_first_seen_order() {
        let table: CpuTable = [cpu("cpu3", &[1]), cpu("cpu0", &[2]), cpu("cpu1", &[3])]
            .into_iter()
            .collect();

        assert_eq!(table.first().unwrap().label, "cpu3");
        let labels: Vec<_> = table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["cpu3", "cpu0", "cpu1"]);
    }

    #[test]
    fn test_cpu_table_duplicate_label_replaces() {
        let mut table = CpuTable::new();
        table.insert(cpu("cpu0", &[1, 2]));
        table.insert(cpu("cpu1", &[3, 4]));
        table.insert(cpu("cpu0", &[5, 6]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.first().unwrap().values, vec![5, 6]);
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = Snapshot::new(
            SchemaVersion::V16,
            Vec::new(),
            [cpu("cpu0", &[1])].into_iter().collect(),
            Some(4295000000),
        );

        assert_eq!(snapshot.version(), SchemaVersion::V16);
        assert!(snapshot.domains().is_empty());
        assert_eq!(snapshot.cpus().len(), 1);
        assert_eq!(snapshot.kernel_timestamp(), Some(4295000000));
        assert!(snapshot.captured_at_ms() > 0);
    }
}
