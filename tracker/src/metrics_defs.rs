//! Metrics definitions for the tracker client.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const LOOKUP_FETCH_FAILED: MetricDef = MetricDef {
    name: "tracker.lookup_fetch.failed",
    metric_type: MetricType::Counter,
    description: "Reference-map fetches that failed and degraded to an empty map",
};

pub const UPSTREAM_REQUEST_FAILED: MetricDef = MetricDef {
    name: "tracker.upstream_request.failed",
    metric_type: MetricType::Counter,
    description: "Upstream API calls that returned an error or non-success status",
};

pub const ALL_METRICS: &[MetricDef] = &[LOOKUP_FETCH_FAILED, UPSTREAM_REQUEST_FAILED];
