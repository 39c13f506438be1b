//! HTTP client for the enterprise-lookup backend
//!
//! One client instance serves the whole app: connection pooling, client-side
//! rate limiting, and retry with exponential backoff live here so callers
//! deal only in typed requests and responses. Payment and search consumers
//! depend on the [`PaymentApi`] and [`SearchApi`] traits, which keeps the
//! session controller and search flow testable without a server.

use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::app::models::{
    AckResponse, AlipayPayCreateResponse, AlipayPayParams, Channel, ExportLimitResponse,
    FieldFilter, MembershipResponse, OrderStatusResponse, PaymentStatus, PurchaseCreateResponse,
    SearchRequest, SearchResponse, WechatPayCreateResponse, WechatPayParams,
};
use crate::constants::{api, env as env_constants, http, limits};
use crate::errors::{ApiError, ApiResult};

/// Payment-side backend operations
///
/// The session controller takes this as `Arc<dyn PaymentApi>` so tests can
/// script responses without a network.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Create a purchase intent; returns the order id (out_trade_no)
    async fn create_purchase(&self, plan_id: i64, channel: Channel) -> ApiResult<String>;

    /// Create the order record for a purchase intent
    async fn create_order(
        &self,
        plan_id: i64,
        channel: Channel,
        out_trade_no: &str,
    ) -> ApiResult<()>;

    /// Request WeChat gateway parameters for an order
    async fn create_wechat_payment(&self, out_trade_no: &str) -> ApiResult<WechatPayParams>;

    /// Request Alipay gateway parameters for an order
    async fn create_alipay_payment(&self, out_trade_no: &str) -> ApiResult<AlipayPayParams>;

    /// Poll the current status of an order
    async fn order_status(&self, order_id: &str) -> ApiResult<PaymentStatus>;
}

/// Search-side backend operations
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Run a compiled faceted search
    async fn search_multi(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;

    /// Run the plain keyword search used on first load
    async fn search(&self, keyword: &str, page: u32) -> ApiResult<SearchResponse>;

    /// Submit an export job for the current query
    async fn submit_export(&self, keyword: &str, filters: &[FieldFilter]) -> ApiResult<()>;

    /// Remaining export allowance for today
    async fn export_limit_today(&self) -> ApiResult<i64>;

    /// Whether the current account holds an active membership
    async fn membership_status(&self) -> ApiResult<bool>;
}

/// Configuration for HTTP client optimizations
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API
    pub base_url: String,
    /// Bearer token presented on every request, if any
    pub token: Option<String>,
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of connections per host
    pub pool_max_per_host: usize,
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            token: None,
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

impl ClientConfig {
    /// Default configuration with environment overrides applied
    ///
    /// `ENTLOOKUP_API_BASE_URL` replaces the base URL and
    /// `ENTLOOKUP_API_TOKEN` supplies the bearer token.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var(env_constants::API_BASE_URL) {
            config.base_url = base_url;
        }
        if let Ok(token) = env::var(env_constants::API_TOKEN) {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        config
    }
}

/// HTTP client for the enterprise-lookup backend
///
/// Handles rate limiting, retries, and response envelope unwrapping.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client from environment configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if HTTP client creation fails or the base URL is
    /// not a valid URL.
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Creates a client with explicit configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let client = Self::build_http_client(&config)?;
        let rate_limiter = Self::build_rate_limiter(config.rate_limit_rps)?;
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            error: e.to_string(),
        })?;

        tracing::debug!(base_url = %base_url, "created api client");

        Ok(Self {
            client,
            rate_limiter,
            base_url,
            token: config.token,
        })
    }

    /// Builds the HTTP client with the specified configuration
    fn build_http_client(config: &ClientConfig) -> ApiResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(config.tcp_nodelay)
            .pool_max_idle_per_host(config.pool_max_per_host);

        if let Some(keepalive) = config.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }
        if let Some(idle_timeout) = config.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(ApiError::Http)
    }

    /// Builds the rate limiter with the specified rate limit
    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> ApiResult<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>> {
        let rps = NonZeroU32::new(rate_limit_rps.max(1)).expect("max(1) is non-zero");
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    fn endpoint_url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            error: e.to_string(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a JSON endpoint with rate limiting and retry
    ///
    /// Retries 429/503 and transport errors with exponential backoff. GETs
    /// are idempotent so this is safe; POSTs are never retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.get_json_at(endpoint, endpoint, query).await
    }

    /// Variant of [`Self::get_json`] for endpoints whose path carries an
    /// identifier; `endpoint` stays the static label used in logs and errors.
    async fn get_json_at<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.endpoint_url(path)?;
        let mut retries = 0;
        loop {
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
                .await;

            let request = self.authorize(self.client.get(url.clone()).query(query));
            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == 429 || status == 503 {
                        if retries >= limits::MAX_RETRIES {
                            return Err(ApiError::MaxRetriesExceeded {
                                max_retries: limits::MAX_RETRIES,
                            });
                        }
                        retries += 1;
                        let delay = Duration::from_millis(
                            limits::RETRY_BASE_DELAY_MS * 2_u64.pow(retries),
                        );
                        tracing::warn!(
                            endpoint,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis() as u64,
                            "server pushed back; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if status.is_server_error() {
                        return Err(ApiError::ServerError {
                            status: status.as_u16(),
                        });
                    }
                    return response.json::<T>().await.map_err(|e| ApiError::Decode {
                        endpoint,
                        reason: e.to_string(),
                    });
                }
                Err(e) if retries < limits::MAX_RETRIES => {
                    retries += 1;
                    let delay =
                        Duration::from_millis(limits::RETRY_BASE_DELAY_MS * 2_u64.pow(retries));
                    tracing::warn!(endpoint, error = %e, "request failed; retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::warn!(endpoint, error = %e, "request failed after retries");
                    return Err(ApiError::Http(e));
                }
            }
        }
    }

    /// POST a JSON body and decode the JSON response; no retries
    ///
    /// Order-creating endpoints are not idempotent, so a transport failure
    /// surfaces immediately rather than risking a duplicate order.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> ApiResult<T> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        let url = self.endpoint_url(endpoint)?;
        let response = self
            .authorize(self.client.post(url).json(body))
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == 429 {
            return Err(ApiError::ServerError {
                status: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

/// Body for the purchase-intent endpoint; the channel travels as
/// `payment_method` on the wire.
fn purchase_body(plan_id: i64, channel: Channel) -> serde_json::Value {
    json!({ "plan_id": plan_id, "payment_method": channel.as_str() })
}

/// Body for the order-creation endpoint
fn order_body(plan_id: i64, channel: Channel, out_trade_no: &str) -> serde_json::Value {
    json!({
        "plan_id": plan_id,
        "payment_method": channel.as_str(),
        "out_trade_no": out_trade_no,
    })
}

/// Status polls address the order directly by path segment
fn order_status_path(out_trade_no: &str) -> String {
    format!("{}/{}", api::ORDERS, out_trade_no)
}

#[async_trait]
impl PaymentApi for ApiClient {
    async fn create_purchase(&self, plan_id: i64, channel: Channel) -> ApiResult<String> {
        let body = purchase_body(plan_id, channel);
        let response: PurchaseCreateResponse = self.post_json(api::PURCHASES, &body).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::PURCHASES,
            });
        }
        response.out_trade_no.ok_or(ApiError::Decode {
            endpoint: api::PURCHASES,
            reason: "missing out_trade_no".to_string(),
        })
    }

    async fn create_order(
        &self,
        plan_id: i64,
        channel: Channel,
        out_trade_no: &str,
    ) -> ApiResult<()> {
        let body = order_body(plan_id, channel, out_trade_no);
        let response: AckResponse = self.post_json(api::ORDERS_CREATE, &body).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::ORDERS_CREATE,
            });
        }
        Ok(())
    }

    async fn create_wechat_payment(&self, out_trade_no: &str) -> ApiResult<WechatPayParams> {
        let body = json!({ "out_trade_no": out_trade_no });
        let response: WechatPayCreateResponse =
            self.post_json(api::PAY_WECHAT_CREATE, &body).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::PAY_WECHAT_CREATE,
            });
        }
        response.result.ok_or(ApiError::Decode {
            endpoint: api::PAY_WECHAT_CREATE,
            reason: "missing payment parameters".to_string(),
        })
    }

    async fn create_alipay_payment(&self, out_trade_no: &str) -> ApiResult<AlipayPayParams> {
        let body = json!({ "out_trade_no": out_trade_no });
        let response: AlipayPayCreateResponse =
            self.post_json(api::PAY_ALIPAY_CREATE, &body).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::PAY_ALIPAY_CREATE,
            });
        }
        response.result.ok_or(ApiError::Decode {
            endpoint: api::PAY_ALIPAY_CREATE,
            reason: "missing payment parameters".to_string(),
        })
    }

    async fn order_status(&self, order_id: &str) -> ApiResult<PaymentStatus> {
        let response: OrderStatusResponse = self
            .get_json_at(api::ORDERS, &order_status_path(order_id), &[])
            .await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::ORDERS,
            });
        }
        Ok(response
            .order
            .map(|order| order.status)
            .unwrap_or(PaymentStatus::Unknown))
    }
}

#[async_trait]
impl SearchApi for ApiClient {
    async fn search_multi(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
        self.post_json(api::SEARCH_MULTI, request).await
    }

    async fn search(&self, keyword: &str, page: u32) -> ApiResult<SearchResponse> {
        let page_index = page.saturating_sub(1);
        self.get_json(
            api::SEARCH,
            &[
                ("keyword", keyword.to_string()),
                ("page_index", page_index.to_string()),
            ],
        )
        .await
    }

    async fn submit_export(&self, keyword: &str, filters: &[FieldFilter]) -> ApiResult<()> {
        let body = json!({ "keyword": keyword, "field_filters": filters });
        let response: AckResponse = self.post_json(api::SEARCH_MULTI_EXPORT, &body).await?;
        if !response.success {
            return Err(ApiError::Unsuccessful {
                endpoint: api::SEARCH_MULTI_EXPORT,
            });
        }
        Ok(())
    }

    async fn export_limit_today(&self) -> ApiResult<i64> {
        let response: ExportLimitResponse = self.get_json(api::EXPORT_LIMIT_TODAY, &[]).await?;
        Ok(response.available_limit)
    }

    async fn membership_status(&self) -> ApiResult<bool> {
        let response: MembershipResponse = self.get_json(api::MEMBERSHIP, &[]).await?;
        Ok(response.is_member)
    }
}
