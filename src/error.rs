use thiserror::Error;

/// 传输层错误
///
/// 只在 `HttpClient` 实现与 `FraudApi` 之间流动，`FraudApi` 会把它吸收为
/// 统一的 `ApiResult`，上层调用方永远看不到它。
#[derive(Debug, Error)]
pub enum TransportError {
    /// 无法获得任何响应（连接失败、DNS、TLS 等）
    #[error("network error: {0}")]
    Network(String),
}

/// 运行时配置解析错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
