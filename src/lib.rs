//! schedstat-diff - scheduler statistics interval sampler.
//!
//! Reads `/proc/schedstat` twice, some interval apart, and reports how much
//! each load-balancing, wake-up and per-CPU counter moved in between.
//!
//! - [`collector`] - version detection, layout decoding, snapshot reading
//! - [`delta`] - aggregate and per-CPU differencing
//! - [`report`] - report assembly and text rendering

pub mod collector;
pub mod delta;
pub mod model;
pub mod report;
pub mod util;
