//! 批量关键词分析器 - 编排层
//!
//! ## 职责
//!
//! 对一组关键词调用 ASO 评分服务，按固定大小分批：
//!
//! 1. **分批**：关键词按顺序切成连续批次，最后一批可以不满
//! 2. **批内并发**：同一批的评分请求同时发出，全部完成后才进入下一批
//! 3. **失败隔离**：单个关键词失败只产生降级结果，不影响其他关键词
//! 4. **批次间隔**：除最后一批外，每批完成后按 [`Pacing`] 等待
//! 5. **顺序保持**：结果顺序与输入顺序一致，而不是完成顺序
//!
//! 不做重试，失败的关键词只报告一次。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BatchSize;
use crate::error::ApiError;
use crate::models::{KeywordResult, Platform};
use crate::orchestrator::pacing::Pacing;
use crate::services::KeywordScorer;
use crate::utils::logging;
use crate::workflow::rank_results;

/// 一次批量分析的完整记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub keywords: Vec<String>,
    pub platform: Platform,
    pub batch_size: usize,
    /// 每批实际处理的关键词数量
    pub batch_sizes: Vec<usize>,
    /// 批次间等待次数
    pub pauses: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// 与输入顺序一致的结果
    pub results: Vec<KeywordResult>,
}

impl AnalysisRun {
    /// 排序后的结果
    pub fn ranked(&self) -> Vec<KeywordResult> {
        rank_results(&self.results)
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    pub fn success_count(&self) -> usize {
        self.results.len() - self.failed_count()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// 批量关键词分析器
pub struct BatchProcessor {
    scorer: Arc<dyn KeywordScorer>,
    platform: Platform,
    batch_size: BatchSize,
    pacing: Pacing,
    keyword_timeout: Option<Duration>,
}

impl BatchProcessor {
    /// 创建分析器，默认批次间隔 1 秒，不设单个关键词超时
    pub fn new(scorer: Arc<dyn KeywordScorer>, platform: Platform, batch_size: BatchSize) -> Self {
        Self {
            scorer,
            platform,
            batch_size,
            pacing: Pacing::default(),
            keyword_timeout: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// 单个关键词评分超时，超时按失败处理
    pub fn with_keyword_timeout(mut self, timeout: Duration) -> Self {
        self.keyword_timeout = Some(timeout);
        self
    }

    /// 分析全部关键词
    pub async fn run(&self, keywords: &[String]) -> AnalysisRun {
        let started_at = Local::now();
        let width = self.batch_size.get();
        let total = keywords.len();
        let total_batches = total.div_ceil(width);

        logging::log_keywords_loaded(total, width);

        let mut results = Vec::with_capacity(total);
        let mut batch_sizes = Vec::with_capacity(total_batches);
        let mut pauses = 0;

        for (batch_index, batch) in keywords.chunks(width).enumerate() {
            let batch_start = batch_index * width;
            logging::log_batch_start(
                batch_index + 1,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_results = self.process_batch(batch).await;
            let success = batch_results.iter().filter(|r| !r.is_failed()).count();
            logging::log_batch_complete(batch_index + 1, success, batch.len());

            batch_sizes.push(batch.len());
            results.extend(batch_results);

            if batch_index + 1 < total_batches {
                pauses += 1;
                let delay = self.pacing.delay_after(batch_index);
                if !delay.is_zero() {
                    info!("⏳ 等待 {} ms 后开始下一批", delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let run = AnalysisRun {
            keywords: keywords.to_vec(),
            platform: self.platform,
            batch_size: width,
            batch_sizes,
            pauses,
            started_at,
            finished_at: Local::now(),
            results,
        };

        logging::print_final_stats(
            run.success_count(),
            run.failed_count(),
            run.results.len(),
            run.elapsed_ms(),
        );

        run
    }

    /// 并发处理单个批次，等待全部完成
    ///
    /// `join_all` 按发出顺序返回结果
    async fn process_batch(&self, batch: &[String]) -> Vec<KeywordResult> {
        join_all(batch.iter().map(|keyword| self.analyze_keyword(keyword))).await
    }

    /// 分析单个关键词，任何错误都转换为降级结果
    async fn analyze_keyword(&self, keyword: &str) -> KeywordResult {
        let scoring = self.scorer.score(keyword, self.platform);

        let outcome = match self.keyword_timeout {
            Some(limit) => match tokio::time::timeout(limit, scoring).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::Timeout {
                    endpoint: format!("score '{}'", keyword),
                    limit_ms: limit.as_millis() as u64,
                }
                .into()),
            },
            None => scoring.await,
        };

        match outcome {
            Ok(score) => {
                debug!(
                    "✓ '{}': 流量 {} / 难度 {}",
                    keyword, score.traffic_score, score.difficulty_score
                );
                KeywordResult::scored(keyword, score)
            }
            Err(e) => {
                warn!("⚠️ 关键词 '{}' 分析失败: {}", keyword, e);
                KeywordResult::failed(keyword, e.to_string())
            }
        }
    }
}
