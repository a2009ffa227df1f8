//! 业务能力层（Services）
//!
//! 描述"我能做什么"，每个能力只处理单个应用或单个关键词。
//! 外部协作方（应用商店、LLM、ASO 评分）都以 trait 暴露，
//! 由调用方在一次运行开始时构造并注入。

pub mod keyword_sampler;
pub mod llm_service;
pub mod similar_apps;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{AppMetadata, KeywordScore, Platform, SimilarApp};

pub use keyword_sampler::sample_keywords;
pub use llm_service::LlmService;
pub use similar_apps::expand_similar_apps;

/// 应用数据源：获取应用元数据和相似应用列表
#[async_trait]
pub trait AppDataSource: Send + Sync {
    async fn fetch_app(&self, app_id: u64) -> AppResult<AppMetadata>;

    /// 按相似度排序的相似应用
    async fn fetch_similar(&self, app_id: u64) -> AppResult<Vec<SimilarApp>>;
}

/// 关键词生成器：根据应用文本和截图给出候选搜索关键词
#[async_trait]
pub trait KeywordGenerator: Send + Sync {
    async fn generate(&self, app: &AppMetadata, similar: &[AppMetadata])
        -> AppResult<Vec<String>>;
}

/// ASO 评分器：对单个关键词给出流量与难度评分
#[async_trait]
pub trait KeywordScorer: Send + Sync {
    async fn score(&self, keyword: &str, platform: Platform) -> AppResult<KeywordScore>;
}
