//! Scheduler statistics collector for Linux.
//!
//! This module reads `/proc/schedstat` into immutable snapshots, with
//! support for mocking so the decoders can be tested off Linux.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   SnapshotReader                     │
//! │  ┌──────────────────┐    ┌────────────────────────┐  │
//! │  │  detect_version  │───▶│  schema (v15/v16/v17)  │  │
//! │  └──────────────────┘    └───────────┬────────────┘  │
//! │  ┌────────────────────┐  ┌───────────▼────────────┐  │
//! │  │  decode_cpu_line   │  │   decode_domain_line   │  │
//! │  └─────────┬──────────┘  └───────────┬────────────┘  │
//! │            └────────────┬────────────┘               │
//! │                  ┌──────▼──────┐                     │
//! │                  │  FileSystem │ (trait)             │
//! │                  └──────┬──────┘                     │
//! └─────────────────────────┼────────────────────────────┘
//!                  ┌────────┴────────┐
//!           ┌──────▼──────┐   ┌──────▼──────┐
//!           │   RealFs    │   │   MockFs    │
//!           │  (Linux)    │   │  (Testing)  │
//!           └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use schedstat_diff::collector::MockFs;
//! use schedstat_diff::collector::schedstat::{DEFAULT_SCHEDSTAT_PATH, SnapshotReader};
//!
//! let reader = SnapshotReader::new(MockFs::schedstat_v16(), DEFAULT_SCHEDSTAT_PATH);
//! let snapshot = reader.read().unwrap();
//! assert!(!snapshot.cpus().is_empty());
//! ```

pub mod mock;
pub mod schedstat;
pub mod traits;

pub use mock::MockFs;
pub use schedstat::{CollectError, ParseError, SnapshotReader};
pub use traits::{FileSystem, RealFs};
