//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: task → paginated requests → creation calls

use motel_traffic::enrichment;
use motel_traffic::health::PingStatus;
use motel_traffic::http::{HttpClient, HttpClientConfig};
use motel_traffic::pagination::StopReason;
use motel_traffic::retry::RetryPolicy;
use motel_traffic::scenarios::{chain_lookup, motel_chain_name};
use motel_traffic::{run_task, ScenarioConfig, ScenarioContext, Task, TaskOutcome};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context(server: &MockServer, config: ScenarioConfig) -> ScenarioContext {
    let http = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_token("test-token")
        .build();
    ScenarioContext::new(HttpClient::with_config(http).unwrap(), config)
        .with_retry(RetryPolicy::no_retry())
}

fn offset_page(items: Value, page: u32, total_pages: u32) -> Value {
    json!({"response": {"http_code": "200", "data": {
        "content": items,
        "pagination": {"page": page, "total_pages": total_pages, "last": page + 1 >= total_pages}
    }}})
}

fn cursor_page(items: Value, current_page: u32, has_next: bool) -> Value {
    json!({"response": {"http_code": "200", "data": {
        "data": items,
        "pagination": {"current_page": current_page, "has_next": has_next, "total_pages": 2}
    }}})
}

fn motel_count(n: u64) -> Value {
    json!({"response": {"http_code": "200", "data": {
        "postgresql_tables": {"motels": n},
        "total_postgresql_records": n
    }}})
}

async fn traversal(task: Task, ctx: &ScenarioContext) -> motel_traffic::engine::TraversalReport {
    match run_task(task, ctx).await.unwrap() {
        TaskOutcome::Traversal(report) => report,
        other => panic!("expected a traversal report, got {other:?}"),
    }
}

// ============================================================================
// Health Checks
// ============================================================================

#[tokio::test]
async fn test_ping_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/ping"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": {"http_code": 200, "data": "pong"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let outcome = run_task(Task::PingOnce, &ctx).await.unwrap();
    assert_eq!(outcome, TaskOutcome::Ping(PingStatus::Ok));
}

#[tokio::test]
async fn test_reservation_ping_body_mismatch_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": {
            "http_code": "200", "data": {"database": "degraded", "message": "pong"}
        }})))
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let outcome = run_task(Task::ReservationPingOnce, &ctx).await.unwrap();
    assert_eq!(outcome, TaskOutcome::Ping(PingStatus::Unexpected));
}

// ============================================================================
// Crawls
// ============================================================================

#[tokio::test]
async fn test_get_motels_survives_failed_chain_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motelChains"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motels"))
        .and(query_param("page", "0"))
        .and(query_param("size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            json!([{"motelId": "m1", "motelChainId": "c1"}, {"motelId": "m2"}]),
            0,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motels"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            json!([{"motelId": "m3", "motelChainId": "c9"}]),
            1,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let report = traversal(Task::GetMotels, &ctx).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.items_emitted, 3);
    assert_eq!(report.stop_reason, Some(StopReason::LastPage));

    // Same lookup the crawl used: empty, so every chain resolves to unknown
    let chains = chain_lookup(&ctx).await;
    assert!(chains.is_empty());
    for chain_id in ["c1", "c9"] {
        let motel = json!({"motelId": "m1", "motelChainId": chain_id});
        assert_eq!(motel_chain_name(&motel, &chains), enrichment::UNKNOWN);
    }
}

#[tokio::test]
async fn test_malformed_page_is_treated_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motelRooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let report = traversal(Task::GetMotelRooms, &ctx).await;

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.items_seen, 0);
    assert_eq!(report.stop_reason, Some(StopReason::NoPagination));
}

#[tokio::test]
async fn test_rejected_page_fetch_fails_the_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allbookings"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such page"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let err = run_task(Task::ReservationAllBookings, &ctx).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_reservation_cursor_crawl_follows_has_next() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allMotels"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cursor_page(
            json!([{"room_type": "Deluxe", "price": "120.50"}, {"room_type": "Suite", "price": 300}]),
            1,
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allMotels"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cursor_page(
            json!([{"room_type": "Economy"}]),
            2,
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let report = traversal(Task::ReservationAllMotels, &ctx).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.items_emitted, 3);
    assert_eq!(report.last_page_index, Some(2));
}

// ============================================================================
// Guarded Creation
// ============================================================================

#[tokio::test]
async fn test_post_motel_from_chain_skips_at_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/allMotels/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(motel_count(50)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motelChains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(json!([]), 0, 1)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let report = traversal(Task::PostMotelFromChain, &ctx).await;

    assert!(report.was_skipped());
    let guard = report.guard.unwrap();
    assert_eq!(guard.current_count, 50);
    assert_eq!(guard.ceiling, 50);
    assert_eq!(report.pages_visited, 0);
}

#[tokio::test]
async fn test_post_motel_from_chain_filters_and_counts_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/allMotels/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(motel_count(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motelChains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            json!([
                {"motelChainId": "c1", "motelChainName": "Alpha", "status": "Active", "state": "CA"},
                {"motelChainId": "c2", "motelChainName": "Beta", "status": "Inactive"},
                {"motelChainId": "c3", "motelChainName": "Gamma", "status": "ACTIVE"}
            ]),
            0,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .and(body_partial_json(json!({"motelChainId": "c1", "motelName": "Alpha - Motel1", "state": "CA"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"response": {
            "http_code": "201", "data": {"data": {"motelId": "m1", "createdAt": "2025-01-01T00:00:00Z"}}
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .and(body_partial_json(json!({"motelChainId": "c3"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ScenarioConfig {
        chain_allowed_status: vec!["Active".to_string()],
        ..ScenarioConfig::default()
    };
    let ctx = context(&server, config);
    let report = traversal(Task::PostMotelFromChain, &ctx).await;

    assert!(!report.was_skipped());
    assert_eq!(report.items_seen, 3);
    assert_eq!(report.items_emitted, 1);
    assert_eq!(report.items_failed, 1);
    assert!(report.guard.unwrap().verified);
}

#[tokio::test]
async fn test_guard_fails_open_when_count_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/allMotels/count"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/motelApi/v1/motelChains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            json!([{"motelChainId": "c1", "motelChainName": "Alpha"}]),
            0,
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/motelApi/v1/motels"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"motelId": "m1"})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let report = traversal(Task::PostMotelFromChain, &ctx).await;

    let guard = report.guard.unwrap();
    assert!(guard.proceed);
    assert!(!guard.verified);
    assert_eq!(guard.current_count, 0);
    assert_eq!(report.items_emitted, 1);
}

// ============================================================================
// Reservations
// ============================================================================

#[tokio::test]
async fn test_reservation_from_availability_posts_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allMotels"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cursor_page(
            json!([
                {"status": "Active", "available_room_number": 0, "motel_id": "full"},
                {"status": "Inactive", "available_room_number": 4, "motel_id": "closed"}
            ]),
            1,
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allMotels"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cursor_page(
            json!([
                {"status": "Active", "available_room_number": "2", "motel_id": "m1",
                 "motel_chain_id": "c1", "motel_room_category_id": "rc1",
                 "room_type": "Deluxe", "price": 120, "date": "2025-08-16"},
                {"status": "Active", "available_room_number": 5, "motel_id": "m2"}
            ]),
            2,
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/reservationApi/v1/reservation"))
        .and(body_partial_json(json!({
            "motel_id": "m1",
            "motel_room_category_name": "Deluxe",
            "price": "120",
            "check_in": "2025-08-16",
            "check_out": "2025-08-17",
            "status": "Confirmed"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"response": {
            "http_code": "201", "data": {"data": {"motel_reservation_id": "r1"}}
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let outcome = run_task(Task::ReservationFromAvailability, &ctx).await.unwrap();
    let TaskOutcome::Search {
        search,
        found,
        emitted,
        failed,
    } = outcome
    else {
        panic!("expected a search outcome");
    };

    assert!(found);
    assert_eq!((emitted, failed), (1, 0));
    assert_eq!(search.pages_visited, 2);
    assert_eq!(search.stop_reason, Some(StopReason::Halted));
}

#[tokio::test]
async fn test_reservation_create_failure_is_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservationApi/v1/allMotels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cursor_page(
            json!([{"status": "active", "available_room_number": 1, "motel_id": "m1", "date": "soon"}]),
            1,
            false,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/reservationApi/v1/reservation"))
        .respond_with(ResponseTemplate::new(409).set_body_string("taken"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, ScenarioConfig::default());
    let outcome = run_task(Task::ReservationFromAvailability, &ctx).await.unwrap();
    assert!(matches!(
        outcome,
        TaskOutcome::Search {
            found: true,
            emitted: 0,
            failed: 1,
            ..
        }
    ));
}
