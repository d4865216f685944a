use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use farescout_alert::{AlertEngine, AlertSettings};
use farescout_api::{app, AppState, Metrics};
use farescout_catalog::{AirportDirectory, Catalog, DestinationScorer, Discovery};
use farescout_core::clock::ManualClock;
use farescout_core::notifier::{MockNotifier, SentMessage};
use farescout_quote::{BookingLinks, FlightSearch, MockPriceLookup, QuoteAdapter, QuoteCache, QuoteSettings};
use farescout_store::MemoryStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    lookup: Arc<MockPriceLookup>,
    notifier: Arc<MockNotifier>,
    engine: Arc<AlertEngine>,
}

fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()));
    let store = Arc::new(MemoryStore::new());
    let lookup = Arc::new(MockPriceLookup::new());
    let notifier = Arc::new(MockNotifier::new());

    let quotes = Arc::new(QuoteAdapter::new(
        lookup.clone(),
        QuoteCache::new(ChronoDuration::hours(1), clock.clone()),
        BookingLinks::default(),
        QuoteSettings::default(),
    ));
    let discovery = Discovery::new(
        Arc::new(Catalog::embedded().unwrap()),
        AirportDirectory::embedded().unwrap(),
        DestinationScorer::default(),
    );
    let engine = Arc::new(AlertEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        quotes.clone(),
        notifier.clone(),
        clock.clone(),
        AlertSettings::default(),
    ));

    let state = AppState {
        discovery: Arc::new(discovery),
        flights: Arc::new(FlightSearch::new(quotes, clock.clone())),
        searches: store.clone(),
        alerts: store,
        notifier: notifier.clone(),
        clock,
        metrics: Arc::new(Metrics::new().unwrap()),
    };

    TestApp {
        router: app(state),
        lookup,
        notifier,
        engine,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn search_body() -> Value {
    json!({
        "name": "Caucasus weekends",
        "originAirport": "cdg",
        "budget": 300,
        "pattern": { "type": "weekend", "duration": 2 },
        "selectedDestinations": ["tbs", "EVN"],
        "email": "jane@example.com"
    })
}

#[tokio::test]
async fn test_health() {
    let t = test_app();
    let (status, body) = send(&t.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_discover_destinations_from_cdg() {
    let t = test_app();
    let (status, body) = send(&t.router, "GET", "/api/destinations?origin=cdg&budget=300", None).await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 20);
    assert_eq!(list[0]["iataCode"], "KIV");
    let scores: Vec<f64> = list.iter().map(|d| d["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let (_, near) = send(&t.router, "GET", "/api/destinations?origin=CDG&budget=300&maxDistance=1600", None).await;
    let near = near.as_array().unwrap();
    assert!(near.iter().all(|d| d["distance"].as_f64().unwrap() <= 1600.0));
    assert!(near.iter().all(|d| d["iataCode"] != "KIV"));
}

#[tokio::test]
async fn test_discover_rejects_bad_input() {
    let t = test_app();
    for uri in [
        "/api/destinations?budget=300",
        "/api/destinations?origin=CDG",
        "/api/destinations?origin=XXX&budget=300",
        "/api/destinations?origin=CDG&budget=cheap",
        "/api/destinations?origin=CDG&budget=0",
    ] {
        let (status, body) = send(&t.router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_flight_search_skips_failing_destinations() {
    let t = test_app();
    t.lookup.set_price("TBS", 180);
    t.lookup.set_price("EVN", 150);
    t.lookup.fail_destination("GYD");

    // destinations=["TBS","GYD","EVN"], pattern={"type":"weekend","duration":2}
    let uri = "/api/flights?origin=CDG\
               &destinations=%5B%22TBS%22%2C%22GYD%22%2C%22EVN%22%5D\
               &pattern=%7B%22type%22%3A%22weekend%22%2C%22duration%22%3A2%7D";
    let (status, body) = send(&t.router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let offers = body.as_array().unwrap();
    assert_eq!(offers.len(), 6);
    assert_eq!(offers[0]["price"], 150);
    assert_eq!(offers[5]["price"], 180);

    let (status, _) = send(&t.router, "GET", "/api/flights?origin=CDG&destinations=TBS&pattern=%7B%7D", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlong_duration_is_rejected() {
    let t = test_app();
    t.lookup.set_price("TBS", 180);

    // pattern={"type":"custom","duration":100000000}
    let uri = "/api/flights?origin=CDG&destinations=TBS\
               &pattern=%7B%22type%22%3A%22custom%22%2C%22duration%22%3A100000000%7D";
    let (status, _) = send(&t.router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = search_body();
    body["pattern"] = json!({ "type": "custom", "duration": 337 });
    let (status, _) = send(&t.router, "POST", "/api/searches", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_lifecycle() {
    let t = test_app();
    let (status, created) = send(&t.router, "POST", "/api/searches", Some(search_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["originAirport"], "CDG");
    assert_eq!(created["selectedDestinations"], json!(["TBS", "EVN"]));
    assert_eq!(created["isActive"], true);
    assert_eq!(
        t.notifier.sent(),
        vec![SentMessage::Welcome {
            to: "jane@example.com".to_string(),
            search_name: "Caucasus weekends".to_string(),
        }]
    );

    let id = created["id"].as_str().unwrap().to_string();
    let (_, listed) = send(&t.router, "GET", "/api/searches", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, fetched) = send(&t.router, "GET", &format!("/api/searches/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Caucasus weekends");

    let (status, deleted) = send(&t.router, "DELETE", &format!("/api/searches/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true }));

    let (status, _) = send(&t.router, "GET", &format!("/api/searches/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&t.router, "DELETE", &format!("/api/searches/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&t.router, "GET", "/api/searches/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_search_is_rejected_without_side_effects() {
    let t = test_app();
    let mut body = search_body();
    body["budget"] = json!(0);
    let (status, _) = send(&t.router, "POST", "/api/searches", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = search_body();
    body["selectedDestinations"] = json!(["TIA", "SKP", "SOF", "KTW", "TLL", "RIX"]);
    let (status, _) = send(&t.router, "POST", "/api/searches", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&t.router, "POST", "/api/searches", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&t.router, "GET", "/api/searches", None).await;
    assert!(listed.as_array().unwrap().is_empty());
    assert!(t.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_failed_welcome_email_keeps_search() {
    let t = test_app();
    t.notifier.set_failing(true);
    let (status, _) = send(&t.router, "POST", "/api/searches", Some(search_body())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&t.router, "GET", "/api/searches", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_manual_alert_and_listing() {
    let t = test_app();
    let (_, created) = send(&t.router, "POST", "/api/searches", Some(search_body())).await;
    let search_id = created["id"].as_str().unwrap().to_string();

    let alert = json!({
        "searchId": search_id,
        "destination": "tbs",
        "currentPrice": 180,
        "targetPrice": 270,
        "flightDetails": {
            "id": "manual-1",
            "price": 180,
            "currency": "EUR",
            "origin": "CDG",
            "destination": "TBS",
            "outboundDate": "2025-03-07",
            "returnDate": "2025-03-09",
            "durationMinutes": 300,
            "stops": 0,
            "airlines": ["W6"],
            "bookingLink": ""
        }
    });
    let (status, body) = send(&t.router, "POST", "/api/alerts", Some(alert.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "TBS");
    assert_eq!(body["sent"], false);

    let mut orphan = alert;
    orphan["searchId"] = json!(uuid::Uuid::new_v4().to_string());
    let (status, _) = send(&t.router, "POST", "/api/alerts", Some(orphan)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, by_search) = send(&t.router, "GET", &format!("/api/alerts?searchId={}", search_id), None).await;
    assert_eq!(by_search.as_array().unwrap().len(), 1);
    let (_, other) = send(
        &t.router,
        "GET",
        &format!("/api/alerts?searchId={}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert!(other.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_alert_tick_results_are_visible_through_the_api() {
    let t = test_app();
    t.lookup.set_price("TBS", 200);
    t.lookup.set_price("EVN", 210);
    let (_, created) = send(&t.router, "POST", "/api/searches", Some(search_body())).await;
    let search_id = created["id"].as_str().unwrap().to_string();

    let summary = t.engine.run_alert_tick().await.unwrap();
    assert_eq!(summary.alerts_created, 2);
    assert_eq!(summary.alerts_sent, 2);
    assert_eq!(t.notifier.alerts_sent(), 2);

    let (_, alerts) = send(&t.router, "GET", &format!("/api/alerts?searchId={}", search_id), None).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a["sent"] == true && a["targetPrice"] == 270));

    // cascade
    send(&t.router, "DELETE", &format!("/api/searches/{}", search_id), None).await;
    let (_, alerts) = send(&t.router, "GET", "/api/alerts", None).await;
    assert!(alerts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_holidays_and_metrics() {
    let t = test_app();
    let (status, body) = send(&t.router, "GET", "/api/holidays?year=2025", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (status, _) = send(&t.router, "GET", "/api/holidays", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&t.router, "GET", "/api/holidays?year=2147483647", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let response = t
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("farescout_alert_ticks_total"));
}
