//! HTTP boundary. Translates resolver outcomes to status codes and JSON;
//! all conversion semantics live in `resolver`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::core::ConvertError;
use crate::resolver::Resolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/convert", get(convert_handler))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn healthz_handler() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    currency: Option<String>,
    amount: Option<String>,
    year: Option<String>,
}

async fn convert_handler(
    State(state): State<AppState>,
    Query(params): Query<ConvertParams>,
) -> Response {
    // Absent parameters flow through as empty strings and fail validation
    // in the resolver, keeping one error path.
    let currency = params.currency.as_deref().unwrap_or("");
    let amount = params.amount.as_deref().unwrap_or("");
    let year = params.year.as_deref().unwrap_or("");

    match state.resolver.convert(currency, amount, year).await {
        Ok(conversion) => (StatusCode::OK, Json(conversion)).into_response(),
        Err(err) => error_response(err),
    }
}

fn status_for(err: &ConvertError) -> StatusCode {
    match err {
        ConvertError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ConvertError::UnsupportedYear(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ConvertError::ProvidersExhausted { .. } => StatusCode::BAD_GATEWAY,
        ConvertError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ConvertError) -> Response {
    let status = status_for(&err);
    let body = json!({
        "kind": err.kind(),
        "message": err.to_string(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;
    use crate::rate_provider::RateProvider;
    use crate::resolver::ProviderSet;
    use crate::store::{MemoryRateStore, RateRecord, RateStore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::ServiceExt;

    struct DeadProvider;

    #[async_trait]
    impl RateProvider for DeadProvider {
        fn id(&self) -> &'static str {
            "dead"
        }

        async fn rate_on(&self, _currency: Currency, _date: NaiveDate) -> anyhow::Result<f64> {
            Err(anyhow!("unreachable in this test"))
        }
    }

    async fn app_with_store(store: Arc<dyn RateStore>) -> Router {
        let resolver = Resolver::new(
            store,
            ProviderSet {
                frankfurter: Arc::new(DeadProvider),
                exchangerate_host: Arc::new(DeadProvider),
            },
        );
        router(AppState {
            resolver: Arc::new(resolver),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_identity_conversion_omits_source() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let (status, body) =
            get_json(app, "/convert?currency=NOK&amount=100&year=2010").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["convertedAmount"], 100.0);
        assert_eq!(body["rate"], 1.0);
        assert!(body.get("source").is_none());
    }

    #[tokio::test]
    async fn test_cached_conversion() {
        let store = Arc::new(MemoryRateStore::new());
        store
            .upsert(RateRecord {
                base: Currency::Nok,
                currency: Currency::Usd,
                rate_date: crate::core::snapshot_date(2010),
                rate: 0.8,
                source: "seed".to_string(),
            })
            .await
            .unwrap();

        let app = app_with_store(store).await;
        let (status, body) =
            get_json(app, "/convert?currency=USD&amount=100&year=2010").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["convertedAmount"], 125.0);
        assert_eq!(body["rate"], 0.8);
        assert_eq!(body["source"], "db");
    }

    #[tokio::test]
    async fn test_invalid_currency_maps_to_400() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let (status, body) =
            get_json(app, "/convert?currency=GBP&amount=100&year=2010").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_input");
        assert_eq!(body["message"], "invalid input: unsupported currency: GBP");
    }

    #[tokio::test]
    async fn test_missing_parameter_maps_to_400() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let (status, body) = get_json(app, "/convert?currency=USD&year=2010").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_input");
    }

    #[tokio::test]
    async fn test_early_year_maps_to_422() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let (status, body) =
            get_json(app, "/convert?currency=USD&amount=100&year=1998").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "unsupported_year");
    }

    #[tokio::test]
    async fn test_exhausted_providers_map_to_502() {
        let app = app_with_store(Arc::new(MemoryRateStore::new())).await;
        let (status, body) =
            get_json(app, "/convert?currency=USD&amount=100&year=2010").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "providers_exhausted");
    }
}
