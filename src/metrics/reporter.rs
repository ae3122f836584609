//! Console reporter for metrics with real-time updates

use super::collector::MetricsCollector;
use std::io::{self, Write};
use tokio::time::{interval, Duration};

/// Start periodic metrics reporting (every N seconds)
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_latency_percentiles();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║            Stock API Load Test - Live Metrics                  ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}    Active Users: {}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60,
        metrics.users_active
    );

    // Requests
    println!("\n┌─ REQUESTS ──────────────────────────────────────────────────┐");
    println!(
        "│  Sent:         {:>8}    In-Flight:  {:>8}              │",
        metrics.total.sent, metrics.total.in_flight
    );
    println!(
        "│  Succeeded:    {:>8}    Failed:     {:>8}              │",
        metrics.total.succeeded, metrics.total.failed
    );

    if metrics.total.sent > 0 {
        let success_rate = (metrics.total.succeeded as f64 / metrics.total.sent as f64) * 100.0;
        let throughput = if elapsed > 0 {
            metrics.total.succeeded as f64 / elapsed as f64
        } else {
            0.0
        };
        println!(
            "│  Success Rate: {:>7.2}%    Throughput: {:>7.2}/sec        │",
            success_rate, throughput
        );
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    // Latencies
    if latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!(
            "│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
            latency.min, latency.p50, latency.p95, latency.p99, latency.max
        );
        println!(
            "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            latency.mean, latency.count
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    // System metrics
    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

/// Print final summary report with the per-operation breakdown
pub fn print_final_report(collector: &MetricsCollector) {
    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_latency_percentiles();

    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n📊 REQUESTS");
    println!("   Total Sent:           {:>10}", metrics.total.sent);
    println!("   Total Succeeded:      {:>10}", metrics.total.succeeded);
    println!("   Total Failed:         {:>10}", metrics.total.failed);

    if elapsed > 0 {
        let throughput = metrics.total.succeeded as f64 / elapsed as f64;
        println!("   Throughput:           {:>10.2} requests/sec", throughput);
    }

    if metrics.total.sent > 0 {
        let success_rate = (metrics.total.succeeded as f64 / metrics.total.sent as f64) * 100.0;
        println!("   Success Rate:         {:>10.2}%", success_rate);
    }

    if !metrics.per_operation.is_empty() {
        println!("\n📋 PER OPERATION");
        println!(
            "   {:<22} {:>10} {:>10} {:>10}",
            "operation", "sent", "succeeded", "failed"
        );
        for (name, stats) in &metrics.per_operation {
            println!(
                "   {:<22} {:>10} {:>10} {:>10}",
                name, stats.sent, stats.succeeded, stats.failed
            );
        }
    }

    if latency.count > 0 {
        println!("\n📈 REQUEST LATENCY");
        println!("   Min:                  {:>10} ms", latency.min);
        println!("   P50 (Median):         {:>10} ms", latency.p50);
        println!("   P95:                  {:>10} ms", latency.p95);
        println!("   P99:                  {:>10} ms", latency.p99);
        println!("   Max:                  {:>10} ms", latency.max);
        println!("   Mean:                 {:>10.2} ms", latency.mean);
    }

    println!("\n⏱️  Test Duration: {} seconds", elapsed);
    println!("════════════════════════════════════════════════════════════════\n");
}
