// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化 Prometheus 指标导出
///
/// # 参数
///
/// * `listen` - 导出器监听地址，例如 `0.0.0.0:9000`
pub fn init_metrics(listen: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = listen.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return Ok(());
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

fn describe_metrics() {
    describe_counter!("scans_total", "Scans started");
    describe_counter!("scans_failed_total", "Scans aborted with an error");
    describe_histogram!(
        "scan_duration_seconds",
        Unit::Seconds,
        "Wall-clock duration of a full scan"
    );
    describe_counter!("probe_attempts_total", "HTTP probe attempts by retry mode");
    describe_counter!(
        "probe_blocked_total",
        "Probe attempts rejected with a retryable status"
    );
    describe_counter!("artifacts_found_total", "Artifacts detected by kind");
}
