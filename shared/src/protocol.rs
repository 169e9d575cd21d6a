use crate::{Credentials, HistoryRecord, PredictionResult, TransactionFeatures};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path relative to the API base.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Authenticate and receive a session cookie
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LoginRequest(pub Credentials);

impl ApiRequest for LoginRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Create an account; success is signalled by 201 only
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RegisterRequest(pub Credentials);

impl ApiRequest for RegisterRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Clear the server session. Sent without a body.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/logout";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Ask whether the current session cookie is still valid
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuthRequest;

impl ApiRequest for CheckAuthRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/check-auth";
    const METHOD: HttpMethod = HttpMethod::Get;
}

impl ApiRequest for TransactionFeatures {
    type Response = PredictionResult;
    const PATH: &'static str = "/predict";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Newest-first list of the user's past predictions
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRequest;

impl ApiRequest for HistoryRequest {
    type Response = Vec<HistoryRecord>;
    const PATH: &'static str = "/history";
    const METHOD: HttpMethod = HttpMethod::Get;
}
