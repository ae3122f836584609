//! Metric types

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct OpStats {
    pub sent: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTotals {
    pub sent: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub in_flight: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TrafficMetrics {
    pub total: RequestTotals,
    pub per_operation: BTreeMap<&'static str, OpStats>,
    pub users_active: usize,
    pub system: SystemMetrics,
}
