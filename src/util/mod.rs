//! Utility modules for schedstat-diff.

mod interval;

pub use interval::{IntervalParseError, interval_duration, parse_interval};
