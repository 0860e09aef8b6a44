//! Reader for the kernel scheduler statistics file, `/proc/schedstat`.
//!
//! Three layouts are in use (versions 15, 16 and 17). They differ in the
//! number of domain counters, the order of the idle-type groups and the
//! number of label tokens preceding the counters. The layout is chosen from
//! the `version` line; unknown versions are rejected outright.

pub mod parser;
pub mod reader;
pub mod schema;

pub use parser::{ParseError, decode_cpu_line, decode_domain_line, detect_version, parse_schedstat};
pub use reader::{CollectError, DEFAULT_SCHEDSTAT_PATH, SnapshotReader};
pub use schema::{CPU_FIELDS, FieldSchema, SchemaVersion};
