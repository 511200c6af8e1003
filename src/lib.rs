//! A Nagios/Icinga plugin that checks the request latency distribution of an
//! Elasticsearch index.
//!
//! One invocation issues a single range-aggregation search over a trailing
//! time window, one sub-range per configured latency bucket, compares each
//! bucket's document count against its warning/critical thresholds and
//! prints the plugin output line (`<report>|<perf-data>`). The process exit
//! code is the worst status across all buckets: 0 OK, 1 WARNING, 2 CRITICAL.
//!
//! - **`config`**: validated runtime configuration and search URL construction
//! - **`range`**: the `--range` bucket mini-language parser
//! - **`search`**: the single Elasticsearch request
//! - **`report`**: bucket matching, threshold evaluation, output rendering

#[macro_use]
extern crate tracing;

pub mod config;
pub mod range;
pub mod report;
pub mod search;

pub use config::Config;
pub use range::{
    parse_ranges,
    Range,
};
pub use report::{
    build_report,
    CheckReport,
    Status,
};
pub use search::{
    LatencyBucket,
    SearchClient,
};
