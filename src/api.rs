use fraudwatch_shared::protocol::{
    ApiRequest, CheckAuthRequest, HistoryRequest, HttpMethod, LoginRequest, LogoutRequest,
    RegisterRequest,
};
use fraudwatch_shared::{Credentials, TransactionFeatures};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::request::{HttpClient, HttpRequest};

pub const CONNECTION_ERROR: &str = "Unable to connect to server. Please try again.";
const JSON_CONTENT_TYPE: &str = "application/json";

// =========================================================
// 统一结果 (Uniform Result)
// =========================================================

/// 所有后端调用的统一结果形状
///
/// 传输失败时 `status` 为 0，`data` 为 `{"error": ...}`；响应体不是 JSON 时
/// `data` 为空对象。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub ok: bool,
    pub status: u16,
    pub data: Value,
}

impl ApiResult {
    fn network_failure() -> Self {
        Self {
            ok: false,
            status: 0,
            data: json!({ "error": CONNECTION_ERROR }),
        }
    }

    /// 后端给出的错误信息：优先 `error`，其次 `message`
    pub fn error_message(&self) -> Option<&str> {
        self.data
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| self.data.get("message").and_then(Value::as_str))
    }

    /// 将 `data` 解析为具体类型，形状不符时返回 None
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.data.clone()).ok()
    }

    /// 按请求声明的响应类型解析 `data`
    pub fn response<R: ApiRequest>(&self) -> Option<R::Response> {
        self.json()
    }
}

/// 调用方提供的请求选项
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

// =========================================================
// API 客户端 (Transport Client)
// =========================================================

pub struct FraudApi<C: HttpClient> {
    client: C,
    config: ClientConfig,
}

impl<C: HttpClient> FraudApi<C> {
    pub fn new(client: C, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 发送请求，永不返回错误
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResult {
        let mut req = HttpRequest::new(&self.config.url(endpoint), options.method)
            .with_header("Content-Type", JSON_CONTENT_TYPE);
        for (key, value) in &options.headers {
            req = req.with_header(key, value);
        }
        if let Some(body) = options.body {
            req = req.with_body(body);
        }

        match self.client.send(req).await {
            Ok(resp) => {
                let data = serde_json::from_str(&resp.body).unwrap_or_else(|_| json!({}));
                debug!(endpoint, status = resp.status, "API response");
                ApiResult {
                    ok: resp.ok(),
                    status: resp.status,
                    data,
                }
            }
            Err(e) => {
                error!(endpoint, error = %e, "API request failed");
                ApiResult::network_failure()
            }
        }
    }

    pub async fn get(&self, endpoint: &str) -> ApiResult {
        self.request(endpoint, RequestOptions::new(HttpMethod::Get))
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ApiResult {
        match serde_json::to_string(body) {
            Ok(text) => {
                self.request(endpoint, RequestOptions::new(HttpMethod::Post).body(text))
                    .await
            }
            Err(e) => {
                error!(endpoint, error = %e, "failed to encode request body");
                ApiResult {
                    ok: false,
                    status: 0,
                    data: json!({ "error": e.to_string() }),
                }
            }
        }
    }

    /// 不带请求体的 POST
    pub async fn post_empty(&self, endpoint: &str) -> ApiResult {
        self.request(endpoint, RequestOptions::new(HttpMethod::Post))
            .await
    }

    /// 按 `ApiRequest` 声明的路径与方法发送
    ///
    /// 序列化为 `null` 的请求（单元结构体）不带请求体。
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult {
        match R::METHOD {
            HttpMethod::Get => self.get(R::PATH).await,
            HttpMethod::Post if serde_json::to_value(request).is_ok_and(|v| v.is_null()) => {
                self.post_empty(R::PATH).await
            }
            HttpMethod::Post => self.post(R::PATH, request).await,
        }
    }

    // --- Auth endpoints ---

    pub async fn login(&self, credentials: &Credentials) -> ApiResult {
        self.call(&LoginRequest(credentials.clone())).await
    }

    pub async fn register(&self, credentials: &Credentials) -> ApiResult {
        self.call(&RegisterRequest(credentials.clone())).await
    }

    pub async fn logout(&self) -> ApiResult {
        self.call(&LogoutRequest).await
    }

    pub async fn check_auth(&self) -> ApiResult {
        self.call(&CheckAuthRequest).await
    }

    // --- Prediction endpoints ---

    pub async fn predict(&self, features: &TransactionFeatures) -> ApiResult {
        self.call(features).await
    }

    pub async fn get_history(&self) -> ApiResult {
        self.call(&HistoryRequest).await
    }
}
