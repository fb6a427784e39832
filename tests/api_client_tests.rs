use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use url::Url;

use coin_dashboard::alert::{AlertCondition, NewAlert};
use coin_dashboard::api::DashboardClient;
use coin_dashboard::error::AppError;

type Store = Arc<Mutex<Vec<Value>>>;

async fn prices() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": [
            {"coin": "bitcoin", "price": 43250.5, "timestamp": "2024-01-15 10:30:00"},
            {"coin": "ethereum", "price": 2250.75, "timestamp": 1705314600000_i64}
        ]
    }))
}

async fn history(Path(coin): Path<String>) -> (StatusCode, Json<Value>) {
    match coin.as_str() {
        "bitcoin" => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "coin": "bitcoin",
                "prices": [43000.0, 43100.0, 43250.5],
                "timestamps": [
                    "2024-01-15 10:20:00",
                    "2024-01-15 10:25:00",
                    "2024-01-15T10:30:00Z"
                ]
            })),
        ),
        "ghost" => (
            StatusCode::OK,
            Json(json!({"status": "success", "coin": "ghost", "prices": [], "timestamps": []})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Unknown coin"})),
        ),
    }
}

async fn list_alerts(State(store): State<Store>) -> Json<Value> {
    let alerts = store.lock().unwrap().clone();
    Json(json!({ "alerts": alerts }))
}

async fn add_alert(State(store): State<Store>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut alerts = store.lock().unwrap();
    body["id"] = json!(alerts.len() as i64 + 1);
    alerts.push(body);
    Json(json!({"status": "success", "message": "Alert added successfully"}))
}

async fn delete_alert(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut alerts = store.lock().unwrap();
    let before = alerts.len();
    alerts.retain(|a| a["id"].as_i64() != Some(id));
    if alerts.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Alert not found"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"status": "success", "message": "Alert deleted"})),
    )
}

fn backend(store: Store) -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async { Json(json!({"status": "healthy", "timestamp": "2024-01-15T10:30:00"})) }),
        )
        .route("/api/prices", get(prices))
        .route("/api/history/{coin}", get(history))
        .route("/api/alerts", get(list_alerts))
        .route("/api/alerts/add", post(add_alert))
        .route("/api/alerts/{id}", delete(delete_alert))
        .with_state(store)
}

async fn spawn(router: Router) -> DashboardClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    DashboardClient::new(base, Duration::from_secs(5)).unwrap()
}

fn api_status(err: &anyhow::Error) -> Option<(u16, String)> {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Api { status, message }) => Some((*status, message.clone())),
        _ => None,
    }
}

#[tokio::test]
async fn health_reports_backend_status() {
    let client = spawn(backend(Store::default())).await;
    assert_eq!(assert_ok!(client.health().await), "healthy");
}

#[tokio::test]
async fn prices_accept_both_timestamp_encodings() {
    let client = spawn(backend(Store::default())).await;
    let prices = assert_ok!(client.fetch_prices().await);

    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].coin, "bitcoin");
    assert!((prices[0].price - 43250.5).abs() < f64::EPSILON);
    assert_eq!(prices[0].timestamp.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    assert_eq!(prices[1].timestamp.timestamp_millis(), 1_705_314_600_000);
}

#[tokio::test]
async fn history_builds_aligned_series() {
    let client = spawn(backend(Store::default())).await;
    let series = assert_ok!(client.fetch_history("bitcoin").await);

    assert_eq!(series.prices(), &[43000.0, 43100.0, 43250.5]);
    assert_eq!(series.timestamps().len(), 3);
    assert_eq!(series.last_price(), Some(43250.5));

    let empty = assert_ok!(client.fetch_history("ghost").await);
    assert!(empty.is_empty());
}

#[tokio::test]
async fn unknown_coin_maps_to_api_error() {
    let client = spawn(backend(Store::default())).await;
    let err = assert_err!(client.fetch_history("unobtainium").await);
    assert_eq!(api_status(&err), Some((404, "Unknown coin".to_string())));
}

#[tokio::test]
async fn alert_add_list_delete_round_trip() {
    let store = Store::default();
    let client = spawn(backend(store.clone())).await;

    let new_alert = NewAlert {
        email: "me@example.com".to_string(),
        coin: "ethereum".to_string(),
        condition: AlertCondition::Below,
        price: 2000.0,
    };
    let message = assert_ok!(client.add_alert(&new_alert).await);
    assert_eq!(message, "Alert added successfully");

    {
        let stored = store.lock().unwrap();
        assert_eq!(stored[0]["condition"], "below");
        assert_eq!(stored[0]["coin"], "ethereum");
        assert_eq!(stored[0]["email"], "me@example.com");
    }

    let alerts = assert_ok!(client.fetch_alerts().await);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, 1);
    assert_eq!(alerts[0].condition, AlertCondition::Below);

    assert_ok!(client.delete_alert(1).await);
    assert!(assert_ok!(client.fetch_alerts().await).is_empty());

    let err = assert_err!(client.delete_alert(1).await);
    assert_eq!(api_status(&err), Some((404, "Alert not found".to_string())));
}

#[tokio::test]
async fn error_status_in_success_reply_is_rejected() {
    let router = Router::new().route(
        "/api/prices",
        get(|| async { Json(json!({"status": "error", "message": "database is locked"})) }),
    );
    let client = spawn(router).await;
    let err = assert_err!(client.fetch_prices().await);
    assert_eq!(api_status(&err), Some((200, "database is locked".to_string())));
}

#[tokio::test]
async fn unreachable_backend_is_an_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    let client = DashboardClient::new(base, Duration::from_secs(2)).unwrap();
    let err = assert_err!(client.fetch_prices().await);
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::Http(_))));
}

#[tokio::test]
async fn garbled_body_is_a_json_error() {
    let router = Router::new().route("/api/alerts", get(|| async { "<html>maintenance</html>" }));
    let client = spawn(router).await;
    let err = assert_err!(client.fetch_alerts().await);
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::Json(_))));
}
