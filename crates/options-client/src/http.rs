//! HTTP implementation of [`OptionsApi`]

use std::time::Duration;

use async_trait::async_trait;
use common::{CustomLegRequest, OptionChain, Strategy, StrategyDefinition, StrategyPayoff};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::api::OptionsApi;
use crate::error::{ApiError, ApiResult};
use crate::wire::{
    AssetsResponse, ChainResponse, ConstructRequest, CustomStrategyRequest, ErrorBody,
    PayoffRequest,
};

/// reqwest-based client for the backend REST API
pub struct HttpOptionsClient {
    client: Client,
    base_url: String,
}

impl HttpOptionsClient {
    /// Create a client without a request timeout
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client, optionally bounding every request by `timeout`
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(base_url, e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` plus `segments`, each percent-encoded as one path segment
    fn url(&self, endpoint: &str, segments: &[&str]) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::network(endpoint, format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::network(endpoint, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, segments: &[&str]) -> ApiResult<T> {
        let request = self.client.get(self.url(endpoint, segments)?);
        self.send(endpoint, request).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_vec(body).map_err(|e| ApiError::encode(endpoint, e.to_string()))?;
        let request = self.client.post(self.url(endpoint, segments)?).body(body);
        self.send(endpoint, request).await
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<T> {
        debug!(endpoint, "Calling backend");

        let result = self.execute(endpoint, request).await;
        if let Err(e) = &result {
            error!(endpoint, error = %e, "Backend request failed");
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<T> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(endpoint, e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) if !body.error.is_empty() => ApiError::api(status.as_u16(), body.error),
                _ => ApiError::status_only(status.as_u16()),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(endpoint, e.to_string()))
    }
}

#[async_trait]
impl OptionsApi for HttpOptionsClient {
    async fn list_assets(&self) -> ApiResult<Vec<String>> {
        let response: AssetsResponse = self.get("/options/assets", &["options", "assets"]).await?;
        Ok(response.assets)
    }

    async fn get_option_chain(&self, asset: &str) -> ApiResult<OptionChain> {
        let response: ChainResponse = self.get("/options/{asset}", &["options", asset]).await?;
        let chain = response.into_chain();
        debug!(
            asset,
            expiries = chain.expiries.len(),
            contracts = chain.contract_count(),
            "Option chain received"
        );
        Ok(chain)
    }

    async fn get_strategy_definitions(&self) -> ApiResult<Vec<StrategyDefinition>> {
        self.get("/strategies/definitions", &["strategies", "definitions"]).await
    }

    async fn construct_strategy(
        &self,
        definition_name: &str,
        asset: &str,
        base_quantity: f64,
    ) -> ApiResult<Strategy> {
        let body = ConstructRequest {
            definition_name: definition_name.to_string(),
            underlying_asset: asset.to_string(),
            base_quantity,
        };
        self.post("/strategies/construct", &["strategies", "construct"], &body).await
    }

    async fn construct_custom_strategy(
        &self,
        asset: &str,
        legs: &[CustomLegRequest],
    ) -> ApiResult<Strategy> {
        let body = CustomStrategyRequest {
            underlying_asset: asset.to_string(),
            legs: legs.to_vec(),
        };
        self.post("/strategies/custom", &["strategies", "custom"], &body).await
    }

    async fn calculate_payoff(
        &self,
        strategy: &Strategy,
        price_min: f64,
        price_max: f64,
        num_points: u32,
    ) -> ApiResult<StrategyPayoff> {
        let body = PayoffRequest {
            strategy: strategy.clone(),
            price_min,
            price_max,
            num_points,
        };
        self.post("/strategies/payoff", &["strategies", "payoff"], &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::expiry_payoff;
    use crate::sample;
    use assert_matches::assert_matches;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn chain(Path(asset): Path<String>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
        match asset.as_str() {
            "BTC" | "BTC/USD" => {
                let chain = sample::chain("BTC", 54_800.0, &[54_000.0, 55_000.0], &["2026-10-30T08:00:00Z"]);
                let flat = chain.flat();
                Ok(Json(json!({
                    "asset": flat.asset,
                    "underlying_price": flat.underlying_price,
                    "last_updated": flat.last_updated,
                    "calls": flat.calls,
                    "puts": flat.puts,
                })))
            }
            "BROKEN" => Ok(Json(json!({ "unexpected": true }))),
            _ => Err((StatusCode::NOT_FOUND, Json(json!({})))),
        }
    }

    async fn construct(
        headers: HeaderMap,
        Json(request): Json<ConstructRequest>,
    ) -> Result<Json<Strategy>, (StatusCode, Json<Value>)> {
        assert_eq!(
            headers.get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        if request.definition_name != "Iron Condor" {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Unknown strategy definition: {}", request.definition_name) })),
            ));
        }
        let (mut strategy, _) = sample::iron_condor();
        strategy.base_quantity = request.base_quantity;
        Ok(Json(strategy))
    }

    async fn payoff(Json(request): Json<PayoffRequest>) -> Json<StrategyPayoff> {
        Json(expiry_payoff(
            &request.strategy,
            request.price_min,
            request.price_max,
            request.num_points,
        ))
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/api/v1/options/assets", get(|| async { Json(json!({ "assets": ["BTC", "ETH"] })) }))
            .route("/api/v1/options/:asset", get(chain))
            .route(
                "/api/v1/strategies/definitions",
                get(|| async { Json(sample::definitions()) }),
            )
            .route("/api/v1/strategies/construct", post(construct))
            .route("/api/v1/strategies/payoff", post(payoff));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api/v1/", addr)
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_trimmed() {
        let client = HttpOptionsClient::new("http://localhost:8080/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[tokio::test]
    async fn test_catalog_endpoints() {
        let client = HttpOptionsClient::new(&spawn_backend().await);

        assert_eq!(client.list_assets().await.unwrap(), vec!["BTC", "ETH"]);

        let definitions = client.get_strategy_definitions().await.unwrap();
        assert_eq!(definitions[0].name, "Iron Condor");
    }

    #[tokio::test]
    async fn test_chain_normalized() {
        let client = HttpOptionsClient::new(&spawn_backend().await);
        let chain = client.get_option_chain("BTC").await.unwrap();

        assert_eq!(chain.asset, "BTC");
        assert_eq!(chain.contract_count(), 4);
        assert_eq!(chain.expiry_keys(), vec!["2026-10-30T08:00:00Z"]);
    }

    #[tokio::test]
    async fn test_asset_is_one_path_segment() {
        let client = HttpOptionsClient::new(&spawn_backend().await);
        let chain = client.get_option_chain("BTC/USD").await.unwrap();
        assert_eq!(chain.contract_count(), 4);

        let url = client.url("/options/{asset}", &["options", "BTC USD?x=1"]).unwrap();
        assert!(url.path().ends_with("/api/v1/options/BTC%20USD%3Fx=1"));
        assert_eq!(url.query(), None);
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    #[tokio::test]
    async fn test_request_body_failure_is_encode_error() {
        let client = HttpOptionsClient::new("http://localhost:8080/api/v1");
        let result: ApiResult<Value> = client
            .post("/strategies/payoff", &["strategies", "payoff"], &Unencodable)
            .await;
        assert_matches!(result, Err(ApiError::Encode { .. }));
    }

    #[tokio::test]
    async fn test_status_without_error_body() {
        let client = HttpOptionsClient::new(&spawn_backend().await);
        let err = client.get_option_chain("DOGE").await.unwrap_err();
        assert_eq!(err, ApiError::api(404, "API error: 404"));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let client = HttpOptionsClient::new(&spawn_backend().await);
        assert_matches!(
            client.get_option_chain("BROKEN").await,
            Err(ApiError::Decode { .. })
        );
    }

    #[tokio::test]
    async fn test_backend_error_message_surfaced() {
        let client = HttpOptionsClient::new(&spawn_backend().await);
        let err = client
            .construct_strategy("Butterfly", "BTC", 1.0)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Unknown strategy definition: Butterfly");
    }

    #[tokio::test]
    async fn test_construct_then_payoff() {
        let client = HttpOptionsClient::with_timeout(&spawn_backend().await, Some(Duration::from_secs(5))).unwrap();

        let strategy = client.construct_strategy("Iron Condor", "BTC", 2.0).await.unwrap();
        assert_eq!(strategy.base_quantity, 2.0);
        assert_eq!(strategy.legs.len(), 4);

        let payoff = client
            .calculate_payoff(&strategy, 46_580.0, 63_020.0, 100)
            .await
            .unwrap();
        assert_eq!(payoff.len(), 100);
        assert_eq!(payoff.payoff[0].underlying_price, 46_580.0);
    }

    #[tokio::test]
    async fn test_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpOptionsClient::new(&format!("http://{}/api/v1", addr));
        assert_matches!(client.list_assets().await, Err(ApiError::Network { .. }));
    }
}
