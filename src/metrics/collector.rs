//! Metrics collector - thread-safe collection with latency tracking
//!
//! This is the statistics sink every user stream reports into: success and
//! failure signals per operation, a global latency histogram, and system
//! CPU/memory readings for the console reporter.

use super::types::TrafficMetrics;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

#[derive(Clone, Debug)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TrafficMetrics>>,
    latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Create histogram with 3 significant digits of precision
        let hist = Histogram::new(3).expect("Failed to create latency histogram");

        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TrafficMetrics::default())),
            latencies: Arc::new(RwLock::new(hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn user_started(&self) {
        self.metrics.write().users_active += 1;
    }

    pub fn user_stopped(&self) {
        let mut metrics = self.metrics.write();
        metrics.users_active = metrics.users_active.saturating_sub(1);
    }

    pub fn request_started(&self, operation: &'static str) {
        let mut metrics = self.metrics.write();
        metrics.total.sent += 1;
        metrics.total.in_flight += 1;
        metrics.per_operation.entry(operation).or_default().sent += 1;
    }

    pub fn request_succeeded(&self, operation: &'static str, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.total.succeeded += 1;
        metrics.total.in_flight = metrics.total.in_flight.saturating_sub(1);
        metrics.per_operation.entry(operation).or_default().succeeded += 1;
        drop(metrics);

        if let Some(mut hist) = self.latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    pub fn request_failed(&self, operation: &'static str, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.total.failed += 1;
        metrics.total.in_flight = metrics.total.in_flight.saturating_sub(1);
        metrics.per_operation.entry(operation).or_default().failed += 1;
        drop(metrics);

        // Still record latency for failed requests
        if let Some(mut hist) = self.latencies.try_write() {
            let _ = hist.record(duration_ms);
        }
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();
        metrics.system.cpu_usage = system.global_cpu_usage();
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TrafficMetrics {
        self.metrics.read().clone()
    }

    pub fn get_latency_percentiles(&self) -> LatencyStats {
        let hist = self.latencies.read();
        LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_operation_counters_track_outcomes() {
        let collector = MetricsCollector::new();
        collector.request_started("quote");
        collector.request_succeeded("quote", 12);
        collector.request_started("quote");
        collector.request_failed("quote", 30);
        collector.request_started("health");
        collector.request_succeeded("health", 5);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.total.sent, 3);
        assert_eq!(snapshot.total.succeeded, 2);
        assert_eq!(snapshot.total.failed, 1);
        assert_eq!(snapshot.total.in_flight, 0);
        assert_eq!(snapshot.per_operation["quote"].sent, 2);
        assert_eq!(snapshot.per_operation["quote"].failed, 1);
        assert_eq!(snapshot.per_operation["health"].succeeded, 1);
    }

    #[test]
    fn user_gauge_never_underflows() {
        let collector = MetricsCollector::new();
        collector.user_started();
        collector.user_stopped();
        collector.user_stopped();
        assert_eq!(collector.get_snapshot().users_active, 0);
    }

    #[test]
    fn latency_percentiles_reflect_recorded_samples() {
        let collector = MetricsCollector::new();
        for ms in [10, 20, 30, 40, 50] {
            collector.request_started("quote");
            collector.request_succeeded("quote", ms);
        }
        let stats = collector.get_latency_percentiles();
        assert_eq!(stats.count, 5);
        assert!(stats.min <= 10);
        assert!(stats.max >= 50);
    }
}
