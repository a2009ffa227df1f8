//! 单个应用分析流程 - 编排层
//!
//! 主应用元数据 → 相似应用（失败隔离）→ LLM 生成关键词 → 批量评分
//!
//! 主应用获取和关键词生成失败会直接终止本次运行

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::config::{BatchSize, Config};
use crate::error::{AppResult, ValidationError};
use crate::models::{AppMetadata, Platform};
use crate::orchestrator::batch_processor::{AnalysisRun, BatchProcessor};
use crate::orchestrator::pacing::Pacing;
use crate::services::{
    expand_similar_apps, sample_keywords, AppDataSource, KeywordGenerator, KeywordScorer,
};

/// 单个应用的分析结果
#[derive(Debug, Clone)]
pub struct AppAnalysis {
    pub app: AppMetadata,
    pub similar_apps: Vec<AppMetadata>,
    /// LLM 生成的全部关键词（抽样模式下多于实际分析的数量）
    pub generated_keywords: Vec<String>,
    pub run: AnalysisRun,
}

/// 应用分析流程
pub struct AppPipeline {
    data_source: Arc<dyn AppDataSource>,
    generator: Arc<dyn KeywordGenerator>,
    scorer: Arc<dyn KeywordScorer>,
    platform: Platform,
    batch_size: BatchSize,
    pacing: Pacing,
    keyword_timeout: Option<Duration>,
    similar_app_limit: usize,
}

impl AppPipeline {
    pub fn new(
        data_source: Arc<dyn AppDataSource>,
        generator: Arc<dyn KeywordGenerator>,
        scorer: Arc<dyn KeywordScorer>,
    ) -> Self {
        Self {
            data_source,
            generator,
            scorer,
            platform: Platform::default(),
            batch_size: BatchSize::default(),
            pacing: Pacing::default(),
            keyword_timeout: None,
            similar_app_limit: 3,
        }
    }

    /// 按配置设置批次间隔、超时和相似应用数量
    pub fn configured(mut self, config: &Config) -> Self {
        self.pacing = Pacing::fixed(config.batch_delay());
        self.keyword_timeout = config.keyword_timeout();
        self.similar_app_limit = config.similar_app_limit;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_similar_app_limit(mut self, limit: usize) -> Self {
        self.similar_app_limit = limit;
        self
    }

    /// 分析应用的全部生成关键词
    pub async fn analyze_app(&self, app_id: u64) -> AppResult<AppAnalysis> {
        let (app, similar_apps, generated_keywords) = self.prepare(app_id).await?;
        let run = self.batch_processor().run(&generated_keywords).await;

        Ok(AppAnalysis {
            app,
            similar_apps,
            generated_keywords,
            run,
        })
    }

    /// 只随机分析 `sample_size` 个生成关键词
    pub async fn analyze_app_sampled<R: Rng + ?Sized>(
        &self,
        app_id: u64,
        sample_size: usize,
        rng: &mut R,
    ) -> AppResult<AppAnalysis> {
        let (app, similar_apps, generated_keywords) = self.prepare(app_id).await?;

        let sampled = sample_keywords(&generated_keywords, sample_size, rng);
        info!(
            "🎲 从 {} 个关键词中随机抽取 {} 个: {:?}",
            generated_keywords.len(),
            sampled.len(),
            sampled
        );

        let run = self.batch_processor().run(&sampled).await;

        Ok(AppAnalysis {
            app,
            similar_apps,
            generated_keywords,
            run,
        })
    }

    /// 获取主应用、相似应用并生成关键词
    async fn prepare(&self, app_id: u64) -> AppResult<(AppMetadata, Vec<AppMetadata>, Vec<String>)> {
        info!("📱 正在获取应用 {} 的信息...", app_id);
        let app = self.data_source.fetch_app(app_id).await?;
        info!("✓ 应用: {} ({} 张截图)", app.title, app.screenshots.len());
        info!("  描述: {}", app.description_preview(80));

        info!("🔍 正在获取相似应用...");
        let similar_apps =
            expand_similar_apps(self.data_source.as_ref(), app_id, self.similar_app_limit).await;

        info!("🤖 正在调用 LLM 生成关键词...");
        let keywords = self.generator.generate(&app, &similar_apps).await?;
        if keywords.is_empty() {
            return Err(ValidationError::EmptyKeywordList.into());
        }
        info!("✓ 生成了 {} 个关键词", keywords.len());

        Ok((app, similar_apps, keywords))
    }

    fn batch_processor(&self) -> BatchProcessor {
        let processor =
            BatchProcessor::new(Arc::clone(&self.scorer), self.platform, self.batch_size)
                .with_pacing(self.pacing.clone());

        match self.keyword_timeout {
            Some(timeout) => processor.with_keyword_timeout(timeout),
            None => processor,
        }
    }
}
