//! Engine loop integration tests against a mock HTTP server.

use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_load::config::RunConfig;
use stock_load::driver;
use stock_load::error::ConfigError;
use stock_load::ops::catalog;
use stock_load::users::UserType;

fn test_config(host: &str, duration_secs: u64) -> RunConfig {
    RunConfig {
        host: Url::parse(host).unwrap(),
        users: 2,
        ramp_rate: 50.0,
        duration: Duration::from_secs(duration_secs),
        report_interval: 0,
        request_timeout: Duration::from_secs(5),
        verbose: false,
    }
}

fn fast_user(operations: Vec<&'static stock_load::ops::Operation>) -> UserType {
    UserType {
        name: "fast",
        population_weight: 1,
        think_time: 0..=0,
        on_start: None,
        operations,
    }
}

#[tokio::test]
async fn mixed_run_records_successes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let roster = vec![fast_user(vec![&catalog::QUOTE, &catalog::HEALTH])];
    let collector = driver::run_with_roster(test_config(&server.uri(), 1), roster)
        .await
        .unwrap();

    let snapshot = collector.get_snapshot();
    assert!(snapshot.total.sent > 0);
    assert_eq!(snapshot.total.failed, 0);
    assert_eq!(snapshot.total.sent, snapshot.total.succeeded);
    assert!(snapshot.per_operation.contains_key("quote"));
    assert_eq!(snapshot.users_active, 0, "all streams must have stopped");
}

#[tokio::test]
async fn unacceptable_status_is_recorded_and_run_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stocks/quote"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let roster = vec![fast_user(vec![&catalog::QUOTE])];
    let collector = driver::run_with_roster(test_config(&server.uri(), 1), roster)
        .await
        .unwrap();

    let snapshot = collector.get_snapshot();
    let quote = &snapshot.per_operation["quote"];
    assert!(quote.failed > 0);
    assert_eq!(quote.succeeded, 0);
    // Several iterations happened despite every response failing
    assert!(quote.sent > 1);
}

#[tokio::test]
async fn csv_import_202_triggers_job_status_follow_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/listed-stocks/import-jobs/abc-123"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1..)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/listed-stocks/import-csv"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(serde_json::json!({"jobId": "abc-123"})),
        )
        .mount(&server)
        .await;

    let roster = vec![fast_user(vec![&catalog::IMPORT_CSV])];
    let collector = driver::run_with_roster(test_config(&server.uri(), 1), roster)
        .await
        .unwrap();

    let snapshot = collector.get_snapshot();
    // 202 is success, and the 404 on the status poll is tolerated
    assert!(snapshot.per_operation["import-csv"].succeeded > 0);
    assert_eq!(snapshot.per_operation["import-csv"].failed, 0);
    assert!(snapshot.per_operation["job-status"].succeeded > 0);
    assert_eq!(snapshot.per_operation["job-status"].failed, 0);
}

#[tokio::test]
async fn accepted_response_without_job_id_skips_the_poll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/listed-stocks/import-csv"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let roster = vec![fast_user(vec![&catalog::IMPORT_CSV])];
    let collector = driver::run_with_roster(test_config(&server.uri(), 1), roster)
        .await
        .unwrap();

    let snapshot = collector.get_snapshot();
    assert!(snapshot.per_operation["import-csv"].succeeded > 0);
    assert!(!snapshot.per_operation.contains_key("job-status"));
}

#[tokio::test]
async fn transport_errors_do_not_abort_the_run() {
    // Nothing listens on port 1; every request is a connection failure
    let roster = vec![fast_user(vec![&catalog::HEALTH])];
    let mut config = test_config("http://127.0.0.1:1", 1);
    config.users = 1;
    config.request_timeout = Duration::from_secs(1);

    let collector = driver::run_with_roster(config, roster).await.unwrap();

    let snapshot = collector.get_snapshot();
    assert!(snapshot.total.failed > 0);
    assert_eq!(snapshot.total.succeeded, 0);
    assert_eq!(snapshot.users_active, 0);
}

#[tokio::test]
async fn empty_operation_set_aborts_before_any_request() {
    let server = MockServer::start().await;

    let roster = vec![fast_user(vec![])];
    let err = driver::run_with_roster(test_config(&server.uri(), 1), roster)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::EmptyOperationSet { user_type: "fast" })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn probe_executes_every_operation_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/listed-stocks/import-csv"))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(serde_json::json!({"jobId": "abc-123"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = RunConfig::from_probe_args(&stock_load::cli::ProbeArgs {
        host: server.uri(),
        request_timeout: 5,
        verbose: false,
    })
    .unwrap();
    let collector = driver::probe(config).await.unwrap();

    let snapshot = collector.get_snapshot();
    // 14 catalog operations plus the job-status follow-up
    assert_eq!(snapshot.per_operation.len(), 15);
    assert_eq!(snapshot.total.failed, 0);
    for (name, stats) in &snapshot.per_operation {
        assert_eq!(stats.sent, 1, "operation '{}' probed more than once", name);
    }
}
