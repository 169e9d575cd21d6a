use std::collections::HashMap;
use std::rc::Rc;

use fraudwatch_shared::protocol::HttpMethod;
use tracing::warn;

use crate::error::TransportError;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 设置请求头，名称大小写不敏感，后写入的覆盖先写入的
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为整个客户端运行在单线程协作式调度上
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}

// =========================================================
// 实现层: Reqwest 客户端 (Production)
// =========================================================

/// 带 Cookie 存储的 reqwest 客户端，会话 Cookie 随每个请求自动携带
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        // 状态码已经到达，响应体读不完整时按空响应体处理
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %req.url, status, error = %e, "Failed to read response body.");
                String::new()
            }
        };

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Clone)]
enum MockReply {
    Respond {
        status: u16,
        body: String,
        // 响应前让出执行权的次数，用于构造交错的异步续延
        suspend: usize,
    },
    Fail,
}

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> 排队的响应；只剩一个时反复使用
    responses: RefCell<HashMap<String, VecDeque<MockReply>>>,
    // 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(url, status, &body.to_string(), 0);
    }

    pub fn mock_delayed(&self, url: &str, status: u16, body: serde_json::Value, suspend: usize) {
        self.mock_raw(url, status, &body.to_string(), suspend);
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str, suspend: usize) {
        self.push(
            url,
            MockReply::Respond {
                status,
                body: body.to_string(),
                suspend,
            },
        );
    }

    /// 模拟无法建立连接
    pub fn mock_network_failure(&self, url: &str) {
        self.push(url, MockReply::Fail);
    }

    fn push(&self, url: &str, reply: MockReply) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut responses = self.responses.borrow_mut();
        let queue = responses.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.0 == url)
            .count()
    }

    pub fn last_body(&self, url: &str) -> Option<String> {
        self.requests
            .borrow()
            .iter()
            .rev()
            .find(|r| r.0 == url)
            .and_then(|r| r.3.clone())
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method.as_str().to_string(),
            req.headers.clone(),
            req.body.clone(),
        ));

        match self.next_reply(&req.url) {
            Some(MockReply::Respond {
                status,
                body,
                suspend,
            }) => {
                for _ in 0..suspend {
                    tokio::task::yield_now().await;
                }
                Ok(HttpResponse { status, body })
            }
            Some(MockReply::Fail) => Err(TransportError::Network("connection refused".into())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
