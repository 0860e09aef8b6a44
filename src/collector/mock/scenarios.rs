//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc/schedstat` contents for every
//! supported layout, as two successive samples.

use super::filesystem::MockFs;
use crate::collector::schedstat::DEFAULT_SCHEDSTAT_PATH as SCHEDSTAT_PATH;
use crate::collector::schedstat::schema::SchemaVersion;

/// CPUs in the generated samples.
pub const SCENARIO_CPUS: usize = 2;
/// Domain lines per CPU in the generated samples.
pub const SCENARIO_DOMAINS_PER_CPU: usize = 2;
/// Counters on a generated `cpuN` line, as printed by the kernel.
pub const SCENARIO_CPU_FIELDS: usize = 9;

const DOMAIN_NAMES: [&str; SCENARIO_DOMAINS_PER_CPU] = ["SMT", "MC"];
const DOMAIN_MASKS: [&str; SCENARIO_DOMAINS_PER_CPU] = ["00000003", "0000000f"];

/// Renders `/proc/schedstat` as the kernel would print it at sample `tick`.
///
/// Between two consecutive ticks:
/// - domain counter `i` of every domain line grows by `i + 1`;
/// - cpu counter `j` of `cpuN` grows by `(j + 1) * (N + 1)`.
pub fn schedstat_content(version: SchemaVersion, tick: u64) -> String {
    let schema = version.schema();
    let mut out = String::new();

    out.push_str(&format!("version {}\n", version));
    out.push_str(&format!("timestamp {}\n", 4294892296 + tick * 250));

    for cpu in 0..SCENARIO_CPUS {
        let scale = cpu as u64 + 1;
        let values: Vec<String> = (0..SCENARIO_CPU_FIELDS as u64)
            .map(|j| (scale * 100 + j + tick * (j + 1) * scale).to_string())
            .collect();
        out.push_str(&format!("cpu{} {}\n", cpu, values.join(" ")));

        for domain in 0..SCENARIO_DOMAINS_PER_CPU {
            let values: Vec<String> = (0..schema.fields.len() as u64)
                .map(|i| (scale * 1000 + i + tick * (i + 1)).to_string())
                .collect();
            let prefix = match version {
                SchemaVersion::V15 | SchemaVersion::V16 => {
                    format!("domain{} {}", domain, DOMAIN_MASKS[domain])
                }
                SchemaVersion::V17 => format!(
                    "domain{} {} {}",
                    domain, DOMAIN_NAMES[domain], DOMAIN_MASKS[domain]
                ),
            };
            out.push_str(&format!("{} {}\n", prefix, values.join(" ")));
        }
    }

    out
}

impl MockFs {
    /// Two successive samples of a version 15 kernel.
    pub fn schedstat_v15() -> Self {
        Self::schedstat_samples(SchemaVersion::V15)
    }

    /// Two successive samples of a version 16 kernel.
    pub fn schedstat_v16() -> Self {
        Self::schedstat_samples(SchemaVersion::V16)
    }

    /// Two successive samples of a version 17 kernel.
    pub fn schedstat_v17() -> Self {
        Self::schedstat_samples(SchemaVersion::V17)
    }

    fn schedstat_samples(version: SchemaVersion) -> Self {
        let mut fs = Self::new();
        fs.push_file(SCHEDSTAT_PATH, schedstat_content(version, 0));
        fs.push_file(SCHEDSTAT_PATH, schedstat_content(version, 1));
        fs
    }

    /// A CPU is hot-added between the samples.
    ///
    /// `cpu2` only appears in the second sample.
    pub fn schedstat_cpu_hotplug() -> Self {
        let mut fs = Self::new();
        fs.push_file(SCHEDSTAT_PATH, schedstat_content(SchemaVersion::V16, 0));
        let mut second = schedstat_content(SchemaVersion::V16, 1);
        second.push_str("cpu2 1 1 1 1 1 1 1 1 1\n");
        fs.push_file(SCHEDSTAT_PATH, second);
        fs
    }

    /// Legacy file without a `version` line.
    pub fn schedstat_unversioned() -> Self {
        let mut fs = Self::new();
        for tick in 0..2 {
            let content: String = schedstat_content(SchemaVersion::V15, tick)
                .lines()
                .filter(|l| !l.starts_with("version"))
                .map(|l| format!("{}\n", l))
                .collect();
            fs.push_file(SCHEDSTAT_PATH, content);
        }
        fs
    }

    /// A kernel reporting a layout this crate does not know.
    pub fn schedstat_unsupported() -> Self {
        let mut fs = Self::new();
        let content =
            schedstat_content(SchemaVersion::V17, 0).replacen("version 17", "version 99", 1);
        fs.add_file(SCHEDSTAT_PATH, content);
        fs
    }
}
