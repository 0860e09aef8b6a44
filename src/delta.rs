//! Counter differencing between two snapshots.
//!
//! Domain counters are summed per field within each snapshot and the sums
//! are diffed; domains are never matched one-to-one across snapshots. CPU
//! counters are diffed per CPU label and then combined.
//!
//! Deltas are signed: counters are cumulative, but a field missing from the
//! later sample is taken as zero and may yield a negative value.

use crate::model::{CounterMap, CpuTable, Snapshot};

// ---------------------------------------------------------------------------
// Domain aggregates
// ---------------------------------------------------------------------------

/// Sums every domain field across all domain records of `snapshot`.
///
/// Keys follow the snapshot's schema order. No domains gives an empty map.
pub fn sum_domains(snapshot: &Snapshot) -> CounterMap<u64> {
    let Some(first) = snapshot.domains().first() else {
        return CounterMap::new();
    };

    first
        .counters
        .keys()
        .map(|field| {
            let sum = snapshot
                .domains()
                .iter()
                .map(|d| d.get(field).unwrap_or(0))
                .fold(0u64, u64::wrapping_add);
            (field, sum)
        })
        .collect()
}

/// Field-wise `sum_b - sum_a` over the keys of `sum_a`.
///
/// A key missing from `sum_b` counts as zero. Keys only in `sum_b` are
/// dropped, so the result always has exactly `sum_a`'s keys.
pub fn delta(sum_a: &CounterMap<u64>, sum_b: &CounterMap<u64>) -> CounterMap<i64> {
    sum_a
        .iter()
        .map(|(field, a)| {
            let b = sum_b.get(field).copied().unwrap_or(0);
            (field, counter_delta(*a, b))
        })
        .collect()
}

/// Signed difference of two wrapping 64-bit counters.
fn counter_delta(start: u64, end: u64) -> i64 {
    end.wrapping_sub(start) as i64
}

// ---------------------------------------------------------------------------
// CPU deltas
// ---------------------------------------------------------------------------

/// Combined per-field delta across every CPU present in both tables.
///
/// The field count is taken once from the first CPU of each table
/// (the shorter of the two) and applied to every CPU. CPUs with more values
/// contribute only that many; CPUs with fewer contribute zero for the
/// missing positions. CPUs present in only one table are skipped.
///
/// Returns an empty vector when either table is empty.
pub fn cpu_delta(start: &CpuTable, end: &CpuTable) -> Vec<i64> {
    let (Some(start_first), Some(end_first)) = (start.first(), end.first()) else {
        return Vec::new();
    };
    let num_fields = start_first.values.len().min(end_first.values.len());

    let mut combined = vec![0i64; num_fields];
    for start_cpu in start.iter() {
        let Some(end_cpu) = end.get(&start_cpu.label) else {
            continue;
        };
        for (i, slot) in combined.iter_mut().enumerate() {
            let a = start_cpu.values.get(i).copied().unwrap_or(0);
            let b = end_cpu.values.get(i).copied().unwrap_or(0);
            *slot = slot.wrapping_add(counter_delta(a, b));
        }
    }
    combined
}

/// Per-CPU deltas for every CPU present in both tables, in `start` order.
///
/// Each vector covers the shorter of that CPU's two records.
pub fn per_cpu_deltas(start: &CpuTable, end: &CpuTable) -> Vec<(String, Vec<i64>)> {
    start
        .iter()
        .filter_map(|start_cpu| {
            let end_cpu = end.get(&start_cpu.label)?;
            let values = start_cpu
                .values
                .iter()
                .zip(&end_cpu.values)
                .map(|(a, b)| counter_delta(*a, *b))
                .collect();
            Some((start_cpu.label.clone(), values))
        })
        .collect()
}

/// Labels present in exactly one of the two tables: (removed, added).
pub fn cpu_membership_changes(start: &CpuTable, end: &CpuTable) -> (Vec<String>, Vec<String>) {
    let removed = start
        .iter()
        .filter(|c| end.get(&c.label).is_none())
        .map(|c| c.label.clone())
        .collect();
    let added = end
        .iter()
        .filter(|c| start.get(&c.label).is_none())
        .map(|c| c.label.clone())
        .collect();
    (removed, added)
}
