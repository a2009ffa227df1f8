use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// 批次大小（并发宽度）的合法范围
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 20;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 默认并发数（每批关键词数量）
    pub default_concurrency: usize,
    /// 批次之间的等待时间（毫秒）
    pub batch_delay_ms: u64,
    /// 单个关键词分析的超时时间（秒），0 表示不限时
    pub keyword_timeout_secs: u64,
    /// HTTP 请求超时时间（秒）
    pub http_timeout_secs: u64,
    /// 相似应用数量上限
    pub similar_app_limit: usize,
    /// 随机抽样的关键词数量
    pub sample_size: usize,
    /// 发送给 LLM 的截图数量上限
    pub max_screenshots: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 应用商店配置 ---
    pub app_store_base_url: String,
    pub app_store_country: String,
    pub similar_apps_url: String,
    // --- ASO 评分服务配置 ---
    pub aso_api_base_url: String,
    pub aso_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_concurrency: 3,
            batch_delay_ms: 1000,
            keyword_timeout_secs: 30,
            http_timeout_secs: 20,
            similar_app_limit: 3,
            sample_size: 5,
            max_screenshots: 4,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            app_store_base_url: "https://itunes.apple.com".to_string(),
            app_store_country: "us".to_string(),
            similar_apps_url: "http://localhost:3000/similar".to_string(),
            aso_api_base_url: "http://localhost:3000".to_string(),
            aso_api_key: None,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的字段使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            default_concurrency: parse_env("DEFAULT_CONCURRENCY", default.default_concurrency)?,
            batch_delay_ms: parse_env("BATCH_DELAY_MS", default.batch_delay_ms)?,
            keyword_timeout_secs: parse_env("KEYWORD_TIMEOUT_SECS", default.keyword_timeout_secs)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", default.http_timeout_secs)?,
            similar_app_limit: parse_env("SIMILAR_APP_LIMIT", default.similar_app_limit)?,
            sample_size: parse_env("SAMPLE_SIZE", default.sample_size)?,
            max_screenshots: parse_env("MAX_SCREENSHOTS", default.max_screenshots)?,
            verbose_logging: parse_env("VERBOSE_LOGGING", default.verbose_logging)?,
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            app_store_base_url: std::env::var("APP_STORE_BASE_URL")
                .unwrap_or(default.app_store_base_url),
            app_store_country: std::env::var("APP_STORE_COUNTRY")
                .unwrap_or(default.app_store_country),
            similar_apps_url: std::env::var("SIMILAR_APPS_URL").unwrap_or(default.similar_apps_url),
            aso_api_base_url: std::env::var("ASO_API_BASE_URL").unwrap_or(default.aso_api_base_url),
            aso_api_key: std::env::var("ASO_API_KEY").ok().or(default.aso_api_key),
        })
    }

    /// 批次间隔
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// 单个关键词分析超时，0 表示不限时
    pub fn keyword_timeout(&self) -> Option<Duration> {
        (self.keyword_timeout_secs > 0).then(|| Duration::from_secs(self.keyword_timeout_secs))
    }
}

/// 读取并解析单个环境变量
fn parse_env<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// 经过校验的并发宽度，取值范围 [1, 20]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(value: i64) -> Result<Self, ConfigError> {
        if value < MIN_BATCH_SIZE as i64 || value > MAX_BATCH_SIZE as i64 {
            return Err(ConfigError::ConcurrencyOutOfRange {
                value,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }
        Ok(Self(value as usize))
    }

    /// 校验来自配置的并发数
    pub fn from_usize(value: usize) -> Result<Self, ConfigError> {
        let value = i64::try_from(value).map_err(|_| ConfigError::ConcurrencyOutOfRange {
            value: i64::MAX,
            min: MIN_BATCH_SIZE,
            max: MAX_BATCH_SIZE,
        })?;
        Self::new(value)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(3)
    }
}

impl std::fmt::Display for BatchSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
