use crate::{
    config::Config,
    range::Range,
};
use chrono::Utc;
use eyre::{
    Context as _,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// One entry of the range aggregation: how many documents fell within the
/// given latency interval. Absent bounds mirror the unbounded side of the
/// requested range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatencyBucket {
    pub key: String,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    pub doc_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    aggregations: Aggregations,
}

#[derive(Debug, Deserialize)]
struct Aggregations {
    latency: RangeAggregation,
}

#[derive(Debug, Deserialize)]
struct RangeAggregation {
    buckets: Vec<LatencyBucket>,
}

#[derive(Debug, Serialize)]
struct AggregationRange {
    from: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<f64>,
}

/// Issues the one search request a check invocation makes.
pub struct SearchClient {
    http: reqwest::blocking::Client,
    config: Config,
}

impl SearchClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    /// Fetches the per-range document counts for the trailing time window.
    pub fn latency_buckets(&self, ranges: &[Range]) -> Result<Vec<LatencyBucket>> {
        let date_to = Utc::now().timestamp_millis();
        let date_from = date_to - self.config.minutes * 60_000;
        let body = build_query(&self.config.request_time_field, ranges, date_from, date_to);

        debug!(url = %self.config.search_url, from = date_from, to = date_to, "querying latency buckets");

        let mut request = self.http.post(self.config.search_url.clone()).json(&body);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response: SearchResponse = request
            .send()
            .wrap_err_with(|| format!("search request to {} failed", self.config.search_url))?
            .error_for_status()?
            .json()
            .context("failed to decode search response")?;

        Ok(response.aggregations.latency.buckets)
    }
}

/// The request body: a keyed-off range aggregation over the latency field,
/// filtered to the epoch-millis window. No hits are returned, only buckets.
fn build_query(field: &str, ranges: &[Range], date_from: i64, date_to: i64) -> serde_json::Value {
    let ranges: Vec<AggregationRange> = ranges
        .iter()
        .map(|range| AggregationRange {
            from: range.low,
            to: range.high,
        })
        .collect();

    serde_json::json!({
        "aggs": {
            "latency": {
                "range": {
                    "field": field,
                    "ranges": ranges,
                    "keyed": false
                }
            }
        },
        "size": 0,
        "query": {
            "bool": {
                "must": [
                    {
                        "range": {
                            "@timestamp": {
                                "gte": date_from,
                                "lte": date_to,
                                "format": "epoch_millis"
                            }
                        }
                    }
                ]
            }
        }
    })
}
