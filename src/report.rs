use crate::{
    range::Range,
    search::LatencyBucket,
};
use eyre::{
    eyre,
    Result,
};
use std::fmt;

/// Plugin status, ordered so that the "worst wins" reduction is `Ord::max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    /// The process exit code the monitoring supervisor expects.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
        }
    }
}

/// The reduced check result: the worst status across all ranges plus the
/// rendered plugin output, one human-readable line per range followed by
/// `|` and the performance-data tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    status: Status,
    stdout: String,
    perf_data: String,
}

impl CheckReport {
    pub fn status(&self) -> Status {
        self.status
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.stdout, self.perf_data)
    }
}

/// Matches the fetched buckets back to their range definitions, evaluates
/// each count against its thresholds and renders the report blocks in range
/// input order.
///
/// A range with no matching bucket is an error: the field or index pattern
/// is misconfigured, and reporting a made-up count would hide that.
pub fn build_report(ranges: &[Range], buckets: &[LatencyBucket]) -> Result<CheckReport> {
    let mut status = Status::Ok;
    let mut stdout = String::new();
    let mut perf_data = String::new();

    for range in ranges {
        let bucket = find_bucket(buckets, range)
            .ok_or_else(|| eyre!("no aggregation bucket matched range '{range}'"))?;
        let (range_status, message) = evaluate(range, bucket.doc_count);

        stdout.push_str(&format!("{} = {} {}\n", bucket.key, bucket.doc_count, message));
        perf_data.push_str(&format!(
            "'{}'={};{};{};0; ",
            bucket.key,
            bucket.doc_count,
            display_threshold(range.warning),
            display_threshold(range.critical),
        ));
        status = status.max(range_status);
    }

    Ok(CheckReport {
        status,
        stdout,
        perf_data,
    })
}

/// First bucket whose bounds equal the range's bounds, both-absent included.
fn find_bucket<'a>(buckets: &'a [LatencyBucket], range: &Range) -> Option<&'a LatencyBucket> {
    buckets
        .iter()
        .find(|bucket| bucket.from == Some(range.low) && bucket.to == range.high)
}

/// Strict greater-than: a count exactly on the threshold is not an alert.
/// Critical is checked first so it always wins over warning.
fn evaluate(range: &Range, doc_count: u64) -> (Status, String) {
    if let Some(critical) = range.critical {
        if doc_count as f64 > critical {
            return (Status::Critical, format!("CRITICAL: {doc_count} > {critical}"));
        }
    }
    if let Some(warning) = range.warning {
        if doc_count as f64 > warning {
            return (Status::Warning, format!("WARNING: {doc_count} > {warning}"));
        }
    }
    (Status::Ok, String::new())
}

fn display_threshold(threshold: Option<f64>) -> String {
    threshold.map(|value| value.to_string()).unwrap_or_default()
}
