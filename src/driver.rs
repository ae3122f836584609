//! Scenario driver - the engine loop behind the `run` and `probe` modes.
//!
//! One tokio task per simulated user. Each stream runs strictly
//! sequentially: select an operation by weight, build a concrete request
//! from the parameter pool, send it, classify the outcome, record it, then
//! sleep for the think time. Per-request failures never terminate a stream;
//! only configuration errors abort, and those fire before any traffic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

use crate::classify::{self, AcceptPolicy, FollowUp, Outcome};
use crate::config::RunConfig;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::ops::{self, catalog, BodyData, Method, Operation, RequestSpec};
use crate::params::ParamPool;
use crate::users::{self, CompiledUser, Roster, UserType};

/// Run the load test with the built-in user roster.
pub async fn run(config: RunConfig) -> Result<MetricsCollector> {
    run_with_roster(config, users::default_roster()).await
}

/// Run the load test with an explicit roster.
///
/// Returns the metrics collector so the caller can print the final report
/// or inspect the counters.
pub async fn run_with_roster(
    config: RunConfig,
    roster: Vec<UserType>,
) -> Result<MetricsCollector> {
    let pool = Arc::new(catalog::default_pool());
    let roster = Roster::compile(roster, &pool)?;
    let client = Client::builder().timeout(config.request_timeout).build()?;
    let collector = MetricsCollector::new();

    let reporter_handle = if config.report_interval > 0 {
        let collector = collector.clone();
        let interval = config.report_interval;
        Some(tokio::spawn(async move {
            reporter::start_periodic_reporter(collector, interval).await;
        }))
    } else {
        None
    };

    let deadline = Instant::now() + config.duration;
    let spawn_gap = Duration::from_secs_f64(1.0 / config.ramp_rate.max(0.001));
    let mut rng = StdRng::from_entropy();
    let mut streams = JoinSet::new();

    tracing::info!(
        users = config.users,
        ramp_rate = config.ramp_rate,
        "spawning user streams"
    );

    for spawned in 0..config.users {
        if Instant::now() >= deadline {
            tracing::warn!(
                spawned,
                target = config.users,
                "run deadline reached during ramp-up"
            );
            break;
        }
        let user = roster.pick_user_type(&mut rng);
        streams.spawn(user_stream(
            user,
            Arc::clone(&pool),
            client.clone(),
            config.host.clone(),
            collector.clone(),
            deadline,
        ));
        if spawned + 1 < config.users {
            tokio::time::sleep(spawn_gap).await;
        }
    }

    while let Some(joined) = streams.join_next().await {
        if let Err(e) = joined {
            tracing::error!("user stream panicked: {}", e);
        }
    }

    if let Some(handle) = reporter_handle {
        handle.abort();
    }

    Ok(collector)
}

/// Execute every operation of every user type exactly once.
///
/// Smoke-tests the target before a real run; outcomes land in the returned
/// collector's per-operation counters.
pub async fn probe(config: RunConfig) -> Result<MetricsCollector> {
    probe_with_roster(config, users::default_roster()).await
}

pub async fn probe_with_roster(
    config: RunConfig,
    roster: Vec<UserType>,
) -> Result<MetricsCollector> {
    let pool = catalog::default_pool();
    let roster = Roster::compile(roster, &pool)?;
    let client = Client::builder().timeout(config.request_timeout).build()?;
    let collector = MetricsCollector::new();
    let mut rng = StdRng::from_entropy();

    for user in &roster.users {
        tracing::info!(user_type = user.spec.name, "probing user type");
        for &op in &user.spec.operations {
            execute_operation(&client, &config.host, op, &pool, &mut rng, &collector).await;
        }
    }

    Ok(collector)
}

/// One simulated user: sequential select → build → send → classify → wait.
async fn user_stream(
    user: Arc<CompiledUser>,
    pool: Arc<ParamPool>,
    client: Client,
    base: Url,
    collector: MetricsCollector,
    deadline: Instant,
) {
    collector.user_started();
    let mut rng = StdRng::from_entropy();

    if let Some(op) = user.spec.on_start {
        execute_operation(&client, &base, op, &pool, &mut rng, &collector).await;
    }

    while Instant::now() < deadline {
        let op = user.select_operation(&mut rng);
        execute_operation(&client, &base, op, &pool, &mut rng, &collector).await;

        let think = rng.gen_range(user.spec.think_time.clone());
        let wake = Instant::now() + Duration::from_secs(think);
        tokio::time::sleep_until(wake.min(deadline)).await;
    }

    collector.user_stopped();
}

/// Execute one operation: build, send, classify, record, and run the
/// accepted-async follow-up when the response triggers one.
async fn execute_operation(
    client: &Client,
    base: &Url,
    op: &'static Operation,
    pool: &ParamPool,
    rng: &mut StdRng,
    collector: &MetricsCollector,
) {
    // Templates are prevalidated at roster compile; a build failure here
    // still must not take the stream down
    let request = match ops::build_request(op, pool, rng) {
        Ok(request) => request,
        Err(e) => {
            collector.request_started(op.name);
            collector.request_failed(op.name, 0);
            tracing::error!(operation = op.name, error = %e, "request build failed");
            return;
        }
    };

    let Some(response) = issue(client, base, op.name, request, collector).await else {
        return;
    };

    match classify::classify(op.name, op.accept, response.status) {
        Outcome::Success => {
            collector.request_succeeded(op.name, response.latency_ms);
            if let Some(follow_up) = op.accept.follow_up() {
                match classify::extract_job_id(&response.body) {
                    Some(job_id) => {
                        run_follow_up(client, base, follow_up, &job_id, collector).await;
                    }
                    None => tracing::debug!(
                        operation = op.name,
                        "accepted response carried no jobId, skipping status poll"
                    ),
                }
            }
        }
        Outcome::Failure(msg) => {
            collector.request_failed(op.name, response.latency_ms);
            tracing::debug!(
                operation = op.name,
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "{}",
                msg
            );
        }
    }
}

/// Poll the job-status endpoint once after an accepted-async response.
async fn run_follow_up(
    client: &Client,
    base: &Url,
    follow_up: &'static FollowUp,
    job_id: &str,
    collector: &MetricsCollector,
) {
    let request = RequestSpec {
        method: Method::Get,
        path: follow_up.path.replace("{jobId}", job_id),
        query: Vec::new(),
        headers: Vec::new(),
        body: BodyData::Empty,
    };

    let Some(response) = issue(client, base, follow_up.name, request, collector).await else {
        return;
    };

    match classify::classify(
        follow_up.name,
        AcceptPolicy::AnyOf(follow_up.accept),
        response.status,
    ) {
        Outcome::Success => collector.request_succeeded(follow_up.name, response.latency_ms),
        Outcome::Failure(msg) => {
            collector.request_failed(follow_up.name, response.latency_ms);
            tracing::debug!(job_id, status = response.status, "{}", msg);
        }
    }
}

struct IssuedResponse {
    status: u16,
    body: Vec<u8>,
    latency_ms: u64,
}

/// Send a built request. Transport errors (connect, timeout, DNS) are
/// recorded as failures here and yield `None`; the stream continues.
async fn issue(
    client: &Client,
    base: &Url,
    name: &'static str,
    request: RequestSpec,
    collector: &MetricsCollector,
) -> Option<IssuedResponse> {
    let url = match base.join(&request.path) {
        Ok(url) => url,
        Err(e) => {
            collector.request_started(name);
            collector.request_failed(name, 0);
            tracing::error!(operation = name, path = request.path, error = %e, "invalid request URL");
            return None;
        }
    };

    let mut builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
    };
    if !request.query.is_empty() {
        builder = builder.query(&request.query);
    }
    for (key, value) in &request.headers {
        builder = builder.header(*key, value);
    }
    builder = match request.body {
        BodyData::Empty => builder,
        BodyData::Json(value) => builder.json(&value),
        BodyData::Csv(text) => builder.header("Content-Type", "text/csv").body(text),
    };

    collector.request_started(name);
    let start = Instant::now();

    match builder.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            Some(IssuedResponse {
                status,
                body,
                latency_ms: start.elapsed().as_millis() as u64,
            })
        }
        Err(e) => {
            collector.request_failed(name, start.elapsed().as_millis() as u64);
            tracing::warn!(operation = name, error = %e, "transport error");
            None
        }
    }
}
