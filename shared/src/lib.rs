use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const FEATURE_COUNT: usize = 30;

/// 特征字段，顺序即后端期望的列顺序
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 登录 / 注册请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// 定宽交易特征向量
///
/// 始终携带全部 30 个字段；缺失或无法解析的输入一律记为 `0.0`。
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFeatures {
    values: [f64; FEATURE_COUNT],
}

impl TransactionFeatures {
    /// 全零向量
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// 从表单条目构建，未知字段名被忽略
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut features = Self::zeroed();
        for (name, raw) in entries {
            if let Some(index) = Self::index_of(name) {
                features.values[index] = coerce_number(raw);
            }
        }
        features
    }

    pub fn index_of(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|f| *f == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        Self::index_of(name).map(|i| self.values[i])
    }
}

impl Default for TransactionFeatures {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Serialize for TransactionFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in FEATURE_NAMES.iter().zip(self.values.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// 宽松的数值解析：空串、非数字、NaN 与无穷大都记为 0
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `/predict` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub is_fraud: bool,
    pub prediction_label: String,
}

/// `/history` 中的单条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    #[serde(alias = "result")]
    pub prediction_result: String,
    #[serde(default)]
    pub is_fraud: bool,
}

/// 分类结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Fraud,
    Legitimate,
}

impl Verdict {
    pub fn from_flag(is_fraud: bool) -> Self {
        if is_fraud {
            Verdict::Fraud
        } else {
            Verdict::Legitimate
        }
    }

    pub fn badge_label(&self) -> &'static str {
        match self {
            Verdict::Fraud => "Fraud",
            Verdict::Legitimate => "Legitimate",
        }
    }
}
