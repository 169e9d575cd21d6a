use std::time::Duration;

use fraudwatch_shared::DEFAULT_API_BASE_URL;

use crate::error::ConfigError;

// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

/// 环境变量未设置时使用这些默认值
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

const ENV_API_URL: &str = "FRAUDWATCH_API_URL";
const ENV_REDIRECT_DELAY_MS: &str = "FRAUDWATCH_REDIRECT_DELAY_MS";

/// 客户端配置
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 后端 API 根地址，不带结尾的 `/`
    pub api_base_url: String,
    /// 注册成功后跳转登录页前的等待时间
    pub register_redirect_delay: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_base_url,
            ..Self::default()
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.register_redirect_delay = delay;
        self
    }

    /// 从环境变量读取配置，读不到就用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let delay_ms = match lookup(ENV_REDIRECT_DELAY_MS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: ENV_REDIRECT_DELAY_MS,
                    value: raw,
                })?,
            None => DEFAULT_REDIRECT_DELAY_MS,
        };

        Ok(Self::new(base).with_redirect_delay(Duration::from_millis(delay_ms)))
    }

    /// 拼接完整 URL
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.api_base_url, endpoint)
        } else {
            format!("{}/{}", self.api_base_url, endpoint)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            register_redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.url("/login"), "http://127.0.0.1:5000/api/login");
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://fraud.example/api/"),
            (ENV_REDIRECT_DELAY_MS, "10"),
        ]))
        .unwrap();
        assert_eq!(config.url("history"), "https://fraud.example/api/history");
        assert_eq!(config.register_redirect_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_bad_delay_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_REDIRECT_DELAY_MS, "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }
}
