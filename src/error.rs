use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("输入错误: {0}")]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
}

/// 输入校验错误
///
/// 在入口处立即报告，不做任何部分工作
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 应用ID不是正整数
    #[error("无效的应用ID '{value}': 必须是正整数")]
    InvalidAppId { value: String },
    /// 关键词列表为空
    #[error("关键词列表为空: 至少需要一个非空关键词")]
    EmptyKeywordList,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 并发数超出范围
    #[error("并发数 {value} 超出范围 [{min}, {max}]")]
    ConcurrencyOutOfRange { value: i64, min: usize, max: usize },
    /// 并发数不是整数
    #[error("并发数 '{value}' 不是整数")]
    InvalidConcurrency { value: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 应用不存在
    #[error("应用 {app_id} 不存在")]
    AppNotFound { app_id: u64 },
    /// 响应结构不符合约定
    #[error("API响应格式错误 ({endpoint}): {reason}")]
    MalformedResponse { endpoint: String, reason: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 调用超时
    #[error("API调用超时 ({endpoint}): 超过 {limit_ms} 毫秒")]
    Timeout { endpoint: String, limit_ms: u64 },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建LLM请求失败: {0}")]
    RequestBuildFailed(#[source] async_openai::error::OpenAIError),
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容无法使用
    #[error("LLM未返回可用的关键词 (模型: {model}): {reason}")]
    NoUsableResult { model: String, reason: String },
}

impl From<async_openai::error::OpenAIError> for LlmError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        LlmError::RequestBuildFailed(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建响应格式错误
    pub fn malformed_response(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Api(ApiError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        })
    }

    /// 创建LLM无可用结果错误
    pub fn llm_no_usable_result(model: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Llm(LlmError::NoUsableResult {
            model: model.into(),
            reason: reason.into(),
        })
    }

    /// 是否为入口处的致命配置/输入错误
    pub fn is_usage_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Config(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
