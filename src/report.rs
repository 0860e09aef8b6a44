//! Interval report built from two snapshots.
//!
//! The report is a plain data structure; [`Report::render_text`] produces
//! the console layout and `serde_json` the machine-readable one.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::schedstat::SchemaVersion;
use crate::delta::{cpu_delta, delta, per_cpu_deltas, sum_domains};
use crate::model::{CounterMap, Snapshot};

/// One named CPU counter delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuFieldDelta {
    pub name: String,
    pub value: i64,
}

/// Deltas of a single CPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerCpuDelta {
    pub cpu: String,
    pub fields: Vec<CpuFieldDelta>,
}

/// Options controlling report construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions<'a> {
    /// Names applied to CPU counters by position; `None` gives `field_<i>`.
    pub cpu_field_names: Option<&'a [&'a str]>,
    /// Include the per-CPU breakdown.
    pub per_cpu: bool,
}

/// Counter deltas accumulated between two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    /// Interval requested by the caller, in seconds.
    pub interval_secs: f64,
    /// Interval actually elapsed between the two reads, in seconds.
    pub measured_secs: f64,
    /// Wall clock of each read, milliseconds since the Unix epoch.
    pub start_captured_at_ms: i64,
    pub end_captured_at_ms: i64,
    /// Difference of the kernel `timestamp` lines, when both carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_jiffies: Option<i64>,
    pub domain_deltas: CounterMap<i64>,
    pub cpu_deltas: Vec<CpuFieldDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_cpu: Option<Vec<PerCpuDelta>>,
}

/// Attaches names to CPU counter deltas by position.
///
/// With names, only positions that have both a name and a value are kept.
/// Without names, every value is labelled `field_<index>`.
pub fn name_cpu_fields(deltas: &[i64], names: Option<&[&str]>) -> Vec<CpuFieldDelta> {
    match names {
        Some(names) => names
            .iter()
            .zip(deltas)
            .map(|(name, value)| CpuFieldDelta {
                name: name.to_string(),
                value: *value,
            })
            .collect(),
        None => deltas
            .iter()
            .enumerate()
            .map(|(idx, value)| CpuFieldDelta {
                name: format!("field_{}", idx),
                value: *value,
            })
            .collect(),
    }
}

impl Report {
    /// Builds the report for `start` → `end`.
    ///
    /// The schema version reported is the one of `start`.
    pub fn build(
        start: &Snapshot,
        end: &Snapshot,
        interval_secs: f64,
        options: ReportOptions<'_>,
    ) -> Self {
        let domain_deltas = delta(&sum_domains(start), &sum_domains(end));
        let cpu_deltas = name_cpu_fields(
            &cpu_delta(start.cpus(), end.cpus()),
            options.cpu_field_names,
        );

        let per_cpu = options.per_cpu.then(|| {
            per_cpu_deltas(start.cpus(), end.cpus())
                .into_iter()
                .map(|(cpu, values)| PerCpuDelta {
                    cpu,
                    fields: name_cpu_fields(&values, options.cpu_field_names),
                })
                .collect()
        });

        let elapsed_jiffies = match (start.kernel_timestamp(), end.kernel_timestamp()) {
            (Some(a), Some(b)) => Some(b.wrapping_sub(a) as i64),
            _ => None,
        };

        Self {
            schema_version: start.version().as_u32(),
            interval_secs,
            measured_secs: end
                .captured()
                .saturating_duration_since(start.captured())
                .as_secs_f64(),
            start_captured_at_ms: start.captured_at_ms(),
            end_captured_at_ms: end.captured_at_ms(),
            elapsed_jiffies,
            domain_deltas,
            cpu_deltas,
            per_cpu,
        }
    }

    /// Schema version of the first snapshot.
    pub fn version(&self) -> Option<SchemaVersion> {
        SchemaVersion::from_raw(self.schema_version as i64)
    }

    /// Renders the console report.
    ///
    /// With `skip_zero`, counters that did not move are left out.
    pub fn render_text(&self, skip_zero: bool) -> String {
        let mut out = String::new();

        let _ = write!(
            out,
            "Schedstat version {} (measured {:.3}s",
            self.schema_version, self.measured_secs
        );
        if let Some(jiffies) = self.elapsed_jiffies {
            let _ = write!(out, ", {} jiffies", jiffies);
        }
        out.push_str(")\n");
        let _ = writeln!(
            out,
            "Sampled {} -> {} UTC",
            format_capture_time(self.start_captured_at_ms),
            format_capture_time(self.end_captured_at_ms)
        );

        let _ = writeln!(
            out,
            "\nSystem-wide domain counter deltas (interval {}s):",
            format_seconds(self.interval_secs)
        );
        for (field, value) in self.domain_deltas.iter() {
            if skip_zero && *value == 0 {
                continue;
            }
            let _ = writeln!(out, "{}: {}", field, value);
        }

        out.push_str("\nCombined CPU field deltas (all CPUs):\n");
        write_cpu_fields(&mut out, &self.cpu_deltas, skip_zero, "");

        if let Some(per_cpu) = &self.per_cpu {
            out.push_str("\nPer-CPU field deltas:\n");
            for cpu in per_cpu {
                let _ = writeln!(out, "{}:", cpu.cpu);
                write_cpu_fields(&mut out, &cpu.fields, skip_zero, "  ");
            }
        }

        out
    }
}

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM:SS.mmm` (UTC).
pub fn format_capture_time(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Shortest round-trip decimal form of `secs`.
///
/// Whole numbers keep a trailing `.0`; exponent form carries an explicit
/// sign and at least two digits (`1e-07`, `1e+16`).
pub fn format_seconds(secs: f64) -> String {
    let repr = format!("{:?}", secs);
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

fn write_cpu_fields(out: &mut String, fields: &[CpuFieldDelta], skip_zero: bool, indent: &str) {
    for field in fields {
        if skip_zero && field.value == 0 {
            continue;
        }
        let _ = writeln!(out, "{}{}: {}", indent, field.name, field.value);
    }
}
