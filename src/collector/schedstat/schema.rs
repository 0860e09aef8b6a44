//! Field layouts of `/proc/schedstat` domain lines, per schema version.
//!
//! Field order follows `show_schedstat()` in `kernel/sched/stats.c`. Each
//! load-balance group is emitted once per idle type; the order of those
//! groups follows the kernel's `enum cpu_idle_type`, which was reordered
//! between version 15 and version 16.

use std::fmt;

/// Canonical names of the per-CPU counters, applied by position at report time.
pub const CPU_FIELDS: &[&str] = &[
    "yld_count",
    "sched_count",
    "sched_goidle",
    "ttwu_count",
    "ttwu_local",
    "rq_cpu_time",
    "rq_run_delay",
    "rq_pcount",
];

/// Version assumed when the input carries no `version` line.
pub const DEFAULT_VERSION: SchemaVersion = SchemaVersion::V15;

/// A `/proc/schedstat` layout this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V15,
    V16,
    V17,
}

impl SchemaVersion {
    /// Maps the integer from a `version` line onto a known layout.
    ///
    /// Returns `None` for anything outside {15, 16, 17}.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            15 => Some(SchemaVersion::V15),
            16 => Some(SchemaVersion::V16),
            17 => Some(SchemaVersion::V17),
            _ => None,
        }
    }

    /// The integer as printed by the kernel.
    pub fn as_u32(self) -> u32 {
        match self {
            SchemaVersion::V15 => 15,
            SchemaVersion::V16 => 16,
            SchemaVersion::V17 => 17,
        }
    }

    /// Returns the domain field layout for this version.
    pub fn schema(self) -> &'static FieldSchema {
        match self {
            SchemaVersion::V15 => &SCHEMA_V15,
            SchemaVersion::V16 => &SCHEMA_V16,
            SchemaVersion::V17 => &SCHEMA_V17,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Ordered domain field names plus the number of leading non-numeric tokens.
#[derive(Debug)]
pub struct FieldSchema {
    pub version: SchemaVersion,
    pub fields: &'static [&'static str],
    /// Tokens to skip before the first counter: `domainN` and the cpumask,
    /// plus the domain name on v17.
    pub value_offset: usize,
}

impl FieldSchema {
    /// Position of `name` in the field list.
    #[cfg(test)]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == name)
    }
}

static SCHEMA_V15: FieldSchema = FieldSchema {
    version: SchemaVersion::V15,
    fields: DOMAIN_FIELDS_V15,
    value_offset: 2,
};

static SCHEMA_V16: FieldSchema = FieldSchema {
    version: SchemaVersion::V16,
    fields: DOMAIN_FIELDS_V16,
    value_offset: 2,
};

static SCHEMA_V17: FieldSchema = FieldSchema {
    version: SchemaVersion::V17,
    fields: DOMAIN_FIELDS_V17,
    value_offset: 3,
};

const DOMAIN_FIELDS_V15: &[&str] = &[
    // CPU_IDLE
    "lb_count_idle",
    "lb_balance_idle",
    "lb_failed_idle",
    "lb_imbalance_idle",
    "lb_gained_idle",
    "lb_hot_gained_idle",
    "lb_nobusyq_idle",
    "lb_nobusyg_idle",
    // CPU_NOT_IDLE
    "lb_count_not_idle",
    "lb_balance_not_idle",
    "lb_failed_not_idle",
    "lb_imbalance_not_idle",
    "lb_gained_not_idle",
    "lb_hot_gained_not_idle",
    "lb_nobusyq_not_idle",
    "lb_nobusyg_not_idle",
    // CPU_NEWLY_IDLE
    "lb_count_newly_idle",
    "lb_balance_newly_idle",
    "lb_failed_newly_idle",
    "lb_imbalance_newly_idle",
    "lb_gained_newly_idle",
    "lb_hot_gained_newly_idle",
    "lb_nobusyq_newly_idle",
    "lb_nobusyg_newly_idle",
    "alb_count",
    "alb_failed",
    "alb_pushed",
    "sbe_cnt",
    "sbe_balanced",
    "sbe_pushed",
    "sbf_cnt",
    "sbf_balanced",
    "sbf_pushed",
    "ttwu_wake_remote",
    "ttwu_move_affine",
    "ttwu_move_balance",
];

// Same names as v15; __CPU_NOT_IDLE now comes first in the enum.
const DOMAIN_FIELDS_V16: &[&str] = &[
    // __CPU_NOT_IDLE
    "lb_count_not_idle",
    "lb_balance_not_idle",
    "lb_failed_not_idle",
    "lb_imbalance_not_idle",
    "lb_gained_not_idle",
    "lb_hot_gained_not_idle",
    "lb_nobusyq_not_idle",
    "lb_nobusyg_not_idle",
    // CPU_IDLE
    "lb_count_idle",
    "lb_balance_idle",
    "lb_failed_idle",
    "lb_imbalance_idle",
    "lb_gained_idle",
    "lb_hot_gained_idle",
    "lb_nobusyq_idle",
    "lb_nobusyg_idle",
    // CPU_NEWLY_IDLE
    "lb_count_newly_idle",
    "lb_balance_newly_idle",
    "lb_failed_newly_idle",
    "lb_imbalance_newly_idle",
    "lb_gained_newly_idle",
    "lb_hot_gained_newly_idle",
    "lb_nobusyq_newly_idle",
    "lb_nobusyg_newly_idle",
    "alb_count",
    "alb_failed",
    "alb_pushed",
    "sbe_cnt",
    "sbe_balanced",
    "sbe_pushed",
    "sbf_cnt",
    "sbf_balanced",
    "sbf_pushed",
    "ttwu_wake_remote",
    "ttwu_move_affine",
    "ttwu_move_balance",
];

// lb_imbalance is split into load/util/task/misfit for every idle type.
const DOMAIN_FIELDS_V17: &[&str] = &[
    // __CPU_NOT_IDLE
    "lb_count_not_idle",
    "lb_balance_not_idle",
    "lb_failed_not_idle",
    "lb_imbalance_load_not_idle",
    "lb_imbalance_util_not_idle",
    "lb_imbalance_task_not_idle",
    "lb_imbalance_misfit_not_idle",
    "lb_gained_not_idle",
    "lb_hot_gained_not_idle",
    "lb_nobusyq_not_idle",
    "lb_nobusyg_not_idle",
    // CPU_IDLE
    "lb_count_idle",
    "lb_balance_idle",
    "lb_failed_idle",
    "lb_imbalance_load_idle",
    "lb_imbalance_util_idle",
    "lb_imbalance_task_idle",
    "lb_imbalance_misfit_idle",
    "lb_gained_idle",
    "lb_hot_gained_idle",
    "lb_nobusyq_idle",
    "lb_nobusyg_idle",
    // CPU_NEWLY_IDLE
    "lb_count_newly_idle",
    "lb_balance_newly_idle",
    "lb_failed_newly_idle",
    "lb_imbalance_load_newly_idle",
    "lb_imbalance_util_newly_idle",
    "lb_imbalance_task_newly_idle",
    "lb_imbalance_misfit_newly_idle",
    "lb_gained_newly_idle",
    "lb_hot_gained_newly_idle",
    "lb_nobusyq_newly_idle",
    "lb_nobusyg_newly_idle",
    "alb_count",
    "alb_failed",
    "alb_pushed",
    "sbe_cnt",
    "sbe_balanced",
    "sbe_pushed",
    "sbf_cnt",
    "sbf_balanced",
    "sbf_pushed",
    "ttwu_wake_remote",
    "ttwu_move_affine",
    "ttwu_move_balance",
];
