//! Integration tests for the HTTP gateway against an in-process backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use neraca_client::http::IDEMPOTENCY_KEY_HEADER;
use neraca_client::{
    ApiClient, HttpGateway, Invalidator, LedgerController, LedgerQuery, OrderingPolicy,
    PostingController, RetryConfig, Session,
};
use neraca_core::auth::UserRole;
use neraca_core::ledger::PostingStatus;
use neraca_core::posting::NeracaBalanceForm;
use neraca_shared::AppError;
use neraca_shared::config::ApiConfig;
use neraca_shared::types::Money;

#[derive(Debug, Clone)]
struct Recorded {
    path: &'static str,
    authorization: Option<String>,
    idempotency_key: Option<String>,
    body: Value,
}

#[derive(Default)]
struct Backend {
    requests: Mutex<Vec<Recorded>>,
    hits: AtomicU32,
}

type Shared = Arc<Backend>;

impl Backend {
    fn record(&self, path: &'static str, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            path,
            authorization: header("authorization"),
            idempotency_key: header(IDEMPOTENCY_KEY_HEADER),
            body,
        });
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        add_jitter: false,
    }
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway(base_url: &str, role: UserRole) -> HttpGateway {
    let session = Arc::new(Session::signed_in("test-token", role));
    let client = ApiClient::new(&ApiConfig::new(base_url), session)
        .unwrap()
        .with_retry(fast_retry());
    HttpGateway::new(client)
}

fn posting(base_url: &str, role: UserRole) -> PostingController<HttpGateway> {
    let gateway = gateway(base_url, role);
    let session = Arc::clone(gateway.client().session());
    PostingController::new(gateway, session, Invalidator::default(), OrderingPolicy::Advisory)
}

fn ledger_entry(status: &str) -> Value {
    json!({
        "id": "0191e3a4-8c2f-7d3e-9a1b-2c3d4e5f6a7b",
        "ledgerDate": "2025-08-25T00:00:00.000Z",
        "description": "Setoran simpanan pokok",
        "ledgerType": "Kas",
        "transactionType": "DEBIT",
        "accountDetailId": "0191e3a4-8c2f-7d3e-9a1b-2c3d4e5f6a7c",
        "accountGeneralId": "0191e3a4-8c2f-7d3e-9a1b-2c3d4e5f6a7d",
        "amount": "100000.00",
        "postingStatus": status,
        "postingAt": null
    })
}

#[tokio::test]
async fn test_post_buku_besar_sends_iso_date_with_token_and_key() {
    async fn handler(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        backend.record("/posting/buku-besar", &headers, body);
        Json(json!({"success": true, "message": "3 ledger berhasil diposting"}))
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/posting/buku-besar", post(handler))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;

    let outcome = posting(&base_url, UserRole::Accountant)
        .post_buku_besar(date())
        .await
        .unwrap();
    assert_eq!(outcome.message, "3 ledger berhasil diposting");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/posting/buku-besar");
    assert_eq!(requests[0].body, json!({"ledgerDate": "2025-08-25"}));
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer test-token"));
    let key = requests[0].idempotency_key.as_deref().unwrap();
    assert!(uuid::Uuid::parse_str(key).is_ok());
}

#[tokio::test]
async fn test_listing_reflects_posted_status() {
    async fn handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("ledgerDate").map(String::as_str), Some("2025-08-25"));
        assert_eq!(params.get("postingStatus").map(String::as_str), Some("POSTED"));
        Json(json!({
            "success": true,
            "data": [ledger_entry("POSTED")],
            "meta": {"page": 1, "limit": 20, "total": 1, "totalPages": 1}
        }))
    }

    let base_url = spawn(Router::new().route("/ledgers", get(handler))).await;
    let gateway = gateway(&base_url, UserRole::Viewer);
    let session = Arc::clone(gateway.client().session());
    let controller = LedgerController::new(gateway, session, Invalidator::default());

    let page = controller
        .list(&LedgerQuery {
            ledger_date: Some(date()),
            posting_status: Some(PostingStatus::Posted),
            ..LedgerQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(page.data[0].is_posted());
    assert_eq!(page.data[0].ledger_date, date());
    assert_eq!(page.data[0].amount, Money::from_minor(10_000_000));
}

#[tokio::test]
async fn test_write_not_retried_on_server_error() {
    async fn handler(State(backend): State<Shared>) -> (StatusCode, Json<Value>) {
        backend.hits.fetch_add(1, Ordering::SeqCst);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Database timeout"})),
        )
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/posting/neraca-detail", post(handler))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;

    let err = posting(&base_url, UserRole::Admin)
        .post_neraca_detail(date())
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Unavailable("Database timeout".into()));
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_retried_on_server_error() {
    async fn handler(State(backend): State<Shared>) -> (StatusCode, Json<Value>) {
        if backend.hits.fetch_add(1, Ordering::SeqCst) == 0 {
            return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "busy"})));
        }
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": [ledger_entry("PENDING")]})),
        )
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/ledgers", get(handler))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;
    let gateway = gateway(&base_url, UserRole::Staff);
    let session = Arc::clone(gateway.client().session());
    let controller = LedgerController::new(gateway, session, Invalidator::default());

    let summary = controller.posting_summary(Some(date())).await.unwrap();
    assert_eq!(summary.pending_count, 1);
    assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rejection_message_passed_through() {
    async fn handler() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Neraca detail belum diposting"})),
        )
    }

    let base_url = spawn(Router::new().route("/posting/neraca-akhir", post(handler))).await;

    let err = posting(&base_url, UserRole::Admin)
        .post_neraca_akhir(date())
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Rejected("Neraca detail belum diposting".into()));
}

#[tokio::test]
async fn test_neraca_balance_calculated_then_posted() {
    async fn calculate(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("date").map(String::as_str), Some("25-08-2025"));
        Json(json!({
            "success": true,
            "data": {
                "calculationDetails": {
                    "sisaHasilUsaha": 12500000.5,
                    "totalPendapatan": "40000000",
                    "totalBiaya": "27499999.50",
                    "accountsProcessed": 14
                },
                "existingRecord": null,
                "canSave": true
            }
        }))
    }

    async fn save(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        backend.record("/posting/neraca-balance", &headers, body);
        Json(json!({"success": true, "message": "Neraca balance berhasil disimpan"}))
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/posting/neraca-balance/calculate", get(calculate))
        .route("/posting/neraca-balance", post(save))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;
    let controller = posting(&base_url, UserRole::Accountant);

    let mut form = NeracaBalanceForm::new(date());
    let amount = controller.calculate_neraca_balance(&mut form).await.unwrap();
    assert_eq!(amount, Money::from_minor(1_250_000_050));

    controller.post_neraca_balance(&form).await.unwrap();
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        json!({"date": "25-08-2025", "sisaHasilUsahaAmount": 12500000.5})
    );
}

#[tokio::test]
async fn test_neraca_akhir_uses_day_month_year() {
    async fn handler(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        backend.record("/posting/neraca-akhir", &headers, body);
        Json(json!({"success": true}))
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/posting/neraca-akhir", post(handler))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;

    let outcome = posting(&base_url, UserRole::Admin)
        .post_neraca_akhir(date())
        .await
        .unwrap();
    assert_eq!(outcome.message, "Neraca Akhir posted successfully");
    assert_eq!(backend.requests()[0].body, json!({"date": "25-08-2025"}));
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_rejection() {
    async fn handler() -> Json<Value> {
        Json(json!({"success": false, "message": "Periode sudah ditutup"}))
    }

    let base_url = spawn(Router::new().route("/posting/unposting/buku-besar", post(handler))).await;

    let err = posting(&base_url, UserRole::Admin)
        .unpost_buku_besar(date())
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Rejected("Periode sudah ditutup".into()));
}

#[tokio::test]
async fn test_logout_clears_session_when_backend_fails() {
    async fn handler(State(backend): State<Shared>, headers: HeaderMap) -> StatusCode {
        backend.hits.fetch_add(1, Ordering::SeqCst);
        backend.record("/auth/logout", &headers, Value::Null);
        StatusCode::INTERNAL_SERVER_ERROR
    }

    let backend = Shared::default();
    let router = Router::new()
        .route("/auth/logout", post(handler))
        .with_state(Arc::clone(&backend));
    let base_url = spawn(router).await;

    let gateway = gateway(&base_url, UserRole::Staff);
    let client = gateway.client();
    client.logout().await;

    assert!(!client.session().is_authenticated());
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        backend.requests()[0].authorization.as_deref(),
        Some("Bearer test-token")
    );

    // Nothing left to revoke
    client.logout().await;
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}
