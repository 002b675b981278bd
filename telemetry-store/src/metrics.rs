use crate::errors::Result;
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref RECORDS_INGESTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "telemetry_store_records_ingested_total",
        "Total GPS records persisted"
    ))
    .expect("valid metric opts");
    pub static ref RECORDS_REJECTED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "telemetry_store_records_rejected_total",
        "Total ingest requests rejected by validation"
    ))
    .expect("valid metric opts");
    pub static ref RECORDS_DELETED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "telemetry_store_records_deleted_total",
        "Total GPS records removed by delete-all"
    ))
    .expect("valid metric opts");
    pub static ref STORE_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "telemetry_store_store_failures_total",
        "Total storage operations that failed"
    ))
    .expect("valid metric opts");
    pub static ref STORE_LATENCY_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "telemetry_store_store_latency_seconds",
            "Time taken by storage operations"
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0
        ]),
        &["operation"]
    )
    .expect("valid metric opts");
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECORDS_INGESTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECORDS_REJECTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECORDS_DELETED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(STORE_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(STORE_LATENCY_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
