//! 编排层集成测试
//!
//! 使用进程内的假协作方，不访问网络；除专门验证等待的用例外，批次间等待设为 0

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_test::{assert_err, assert_ok};

use aso_keywords::error::{ApiError, AppError, AppResult, LlmError};
use aso_keywords::models::{
    AppMetadata, CompetitionLevel, KeywordScore, Platform, Recommendation, SimilarApp,
};
use aso_keywords::services::{AppDataSource, KeywordGenerator, KeywordScorer};
use aso_keywords::{AppPipeline, BatchProcessor, BatchSize, Pacing};

// ---------------------------------------------------------------------------
// 假协作方
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeScorer {
    scores: HashMap<String, (u8, u8)>,
    delays_ms: HashMap<String, u64>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeScorer {
    fn with_scores(scores: &[(&str, u8, u8)]) -> Self {
        Self {
            scores: scores
                .iter()
                .map(|(k, t, d)| (k.to_string(), (*t, *d)))
                .collect(),
            ..Self::default()
        }
    }

    fn failing(mut self, keywords: &[&str]) -> Self {
        self.failing = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    fn hanging(mut self, keywords: &[&str]) -> Self {
        self.hanging = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    fn delays(mut self, delays: &[(&str, u64)]) -> Self {
        self.delays_ms = delays.iter().map(|(k, d)| (k.to_string(), *d)).collect();
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeywordScorer for FakeScorer {
    async fn score(&self, keyword: &str, _platform: Platform) -> AppResult<KeywordScore> {
        self.calls.lock().unwrap().push(keyword.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = if self.hanging.contains(keyword) {
            Duration::from_secs(30)
        } else {
            Duration::from_millis(self.delays_ms.get(keyword).copied().unwrap_or(5))
        };
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(keyword) {
            return Err(AppError::malformed_response("/scores", "缺少 traffic 字段"));
        }
        let (traffic, difficulty) = self.scores.get(keyword).copied().unwrap_or((10, 10));
        Ok(KeywordScore::from_scores(traffic, difficulty))
    }
}

#[derive(Default)]
struct FakeAppStore {
    apps: HashMap<u64, AppMetadata>,
    similar: Vec<SimilarApp>,
    similar_fails: bool,
}

impl FakeAppStore {
    fn with_apps(ids: &[u64]) -> Self {
        Self {
            apps: ids.iter().map(|&id| (id, app(id))).collect(),
            ..Self::default()
        }
    }

    fn similar(mut self, ids: &[u64]) -> Self {
        self.similar = ids.iter().map(|&id| SimilarApp { id }).collect();
        self
    }
}

#[async_trait]
impl AppDataSource for FakeAppStore {
    async fn fetch_app(&self, app_id: u64) -> AppResult<AppMetadata> {
        self.apps
            .get(&app_id)
            .cloned()
            .ok_or_else(|| ApiError::AppNotFound { app_id }.into())
    }

    async fn fetch_similar(&self, app_id: u64) -> AppResult<Vec<SimilarApp>> {
        if self.similar_fails {
            return Err(ApiError::BadStatus {
                endpoint: format!("/similar?id={}", app_id),
                status: 503,
            }
            .into());
        }
        Ok(self.similar.clone())
    }
}

struct FakeGenerator {
    keywords: Option<Vec<String>>,
    seen_similar: Mutex<Vec<u64>>,
}

impl FakeGenerator {
    fn returning(keywords: &[&str]) -> Self {
        Self {
            keywords: Some(keywords.iter().map(|k| k.to_string()).collect()),
            seen_similar: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            keywords: None,
            seen_similar: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl KeywordGenerator for FakeGenerator {
    async fn generate(&self, _app: &AppMetadata, similar: &[AppMetadata]) -> AppResult<Vec<String>> {
        *self.seen_similar.lock().unwrap() = similar.iter().map(|a| a.id).collect();
        match &self.keywords {
            Some(keywords) => Ok(keywords.clone()),
            None => Err(LlmError::EmptyContent {
                model: "fake".to_string(),
            }
            .into()),
        }
    }
}

fn app(id: u64) -> AppMetadata {
    AppMetadata {
        id,
        title: format!("App {}", id),
        description: format!("Description of app {}", id),
        screenshots: vec![format!("https://example.com/{}/1.png", id)],
    }
}

fn keywords(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("kw{}", i)).collect()
}

fn counting_pacing() -> (Pacing, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let pacing = Pacing::from_fn(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Duration::ZERO
    });
    (pacing, counter)
}

fn processor(scorer: Arc<FakeScorer>, width: i64) -> BatchProcessor {
    BatchProcessor::new(scorer, Platform::AppStore, BatchSize::new(width).unwrap())
        .with_pacing(Pacing::none())
}

// ---------------------------------------------------------------------------
// 批量分析
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seven_keywords_width_three_runs_three_batches_with_two_pauses() {
    let scorer = Arc::new(FakeScorer::default());
    let (pacing, pauses) = counting_pacing();
    let run = processor(Arc::clone(&scorer), 3)
        .with_pacing(pacing)
        .run(&keywords(7))
        .await;

    assert_eq!(run.batch_sizes, vec![3, 3, 1]);
    assert_eq!(run.pauses, 2);
    assert_eq!(pauses.load(Ordering::SeqCst), 2);
    assert_eq!(run.results.len(), 7);
}

#[tokio::test]
async fn batch_and_pause_counts_follow_ceiling_division() {
    for (len, width) in [(0usize, 3i64), (1, 3), (3, 3), (4, 3), (10, 1), (20, 20), (21, 20)] {
        let scorer = Arc::new(FakeScorer::default());
        let (pacing, pauses) = counting_pacing();
        let run = processor(scorer, width)
            .with_pacing(pacing)
            .run(&keywords(len))
            .await;

        let expected_batches = len.div_ceil(width as usize);
        assert_eq!(run.batch_sizes.len(), expected_batches, "len={len} width={width}");
        assert_eq!(
            pauses.load(Ordering::SeqCst),
            expected_batches.saturating_sub(1),
            "len={len} width={width}"
        );
        assert_eq!(run.results.len(), len);
    }
}

#[tokio::test(start_paused = true)]
async fn default_pacing_sleeps_between_batches_only() {
    let scorer = Arc::new(FakeScorer::default());
    let processor = BatchProcessor::new(scorer, Platform::AppStore, BatchSize::new(3).unwrap())
        .with_pacing(Pacing::default());

    let start = tokio::time::Instant::now();
    let run = processor.run(&keywords(7)).await;
    let elapsed = start.elapsed();

    // 两次 1 秒等待加三批各 5 毫秒的评分，最后一批之后不等待
    assert_eq!(run.pauses, 2);
    assert!(elapsed >= Duration::from_millis(2015), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2100), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn single_batch_never_sleeps() {
    let scorer = Arc::new(FakeScorer::default());
    let processor = BatchProcessor::new(scorer, Platform::AppStore, BatchSize::new(3).unwrap())
        .with_pacing(Pacing::default());

    let start = tokio::time::Instant::now();
    let run = processor.run(&keywords(3)).await;

    assert_eq!(run.pauses, 0);
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn concurrency_is_bounded_by_batch_width() {
    let scorer = Arc::new(FakeScorer::default().delays(&[("kw1", 20), ("kw4", 20)]));
    processor(Arc::clone(&scorer), 3).run(&keywords(7)).await;

    assert_eq!(scorer.max_in_flight.load(Ordering::SeqCst), 3);
    // 批次按顺序发出
    assert_eq!(scorer.calls(), keywords(7));
}

#[tokio::test]
async fn results_follow_input_order_not_completion_order() {
    // 批内第一个最慢、最后一个最快
    let scorer = Arc::new(FakeScorer::default().delays(&[("kw1", 40), ("kw2", 20), ("kw3", 1)]));
    let run = processor(scorer, 3).run(&keywords(3)).await;

    let order: Vec<&str> = run.results.iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(order, vec!["kw1", "kw2", "kw3"]);
}

#[tokio::test]
async fn failing_keyword_degrades_without_affecting_others() {
    let scorer = Arc::new(
        FakeScorer::with_scores(&[("kw1", 60, 20), ("kw3", 30, 5), ("kw4", 80, 70)])
            .failing(&["kw2", "kw5"]),
    );
    let run = processor(scorer, 2).run(&keywords(5)).await;

    assert_eq!(run.results.len(), 5);
    assert_eq!(run.failed_count(), 2);

    let failed = &run.results[1];
    assert_eq!(failed.keyword, "kw2");
    assert_eq!(failed.traffic_score, 0);
    assert_eq!(failed.difficulty_score, 0);
    assert_eq!(failed.competition_level, CompetitionLevel::Unknown);
    assert_eq!(failed.recommendation, Recommendation::AnalysisFailed);
    assert!(failed.error.as_deref().unwrap().contains("traffic"));

    assert_eq!(run.results[3].traffic_score, 80);
    assert!(run.results[3].error.is_none());
}

#[tokio::test]
async fn every_keyword_failing_still_yields_one_result_each() {
    let scorer = Arc::new(FakeScorer::default().failing(&["kw1", "kw2", "kw3", "kw4"]));
    let run = processor(scorer, 3).run(&keywords(4)).await;

    assert_eq!(run.results.len(), 4);
    assert_eq!(run.success_count(), 0);
}

#[tokio::test]
async fn duplicate_keywords_are_analyzed_once_per_occurrence() {
    let scorer = Arc::new(FakeScorer::default());
    let input = vec!["budget".to_string(), "budget".to_string(), "savings".to_string()];
    let run = processor(Arc::clone(&scorer), 3).run(&input).await;

    assert_eq!(run.results.len(), 3);
    assert_eq!(scorer.calls().len(), 3);
}

#[tokio::test]
async fn hung_call_times_out_into_degraded_result() {
    let scorer = Arc::new(FakeScorer::with_scores(&[("kw1", 50, 50)]).hanging(&["kw2"]));
    let run = processor(scorer, 2)
        .with_keyword_timeout(Duration::from_millis(50))
        .run(&keywords(2))
        .await;

    assert!(run.results[0].error.is_none());
    assert_eq!(run.results[0].traffic_score, 50);

    let timed_out = &run.results[1];
    assert_eq!(timed_out.recommendation, Recommendation::AnalysisFailed);
    assert!(timed_out.error.as_deref().unwrap().contains("50 毫秒"));
}

#[tokio::test]
async fn ranked_output_matches_traffic_then_difficulty() {
    let scorer = Arc::new(FakeScorer::with_scores(&[
        ("a", 50, 30),
        ("b", 70, 10),
        ("c", 50, 20),
    ]));
    let input: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let run = processor(scorer, 3).run(&input).await;

    let ranked: Vec<String> = run.ranked().into_iter().map(|r| r.keyword).collect();
    assert_eq!(ranked, vec!["b", "c", "a"]);
}

// ---------------------------------------------------------------------------
// 单个应用流程
// ---------------------------------------------------------------------------

fn pipeline(store: FakeAppStore, generator: Arc<FakeGenerator>, scorer: Arc<FakeScorer>) -> AppPipeline {
    AppPipeline::new(Arc::new(store), generator, scorer).with_pacing(Pacing::none())
}

#[tokio::test]
async fn one_failed_similar_app_is_omitted() {
    // 相似应用 30 不存在
    let store = FakeAppStore::with_apps(&[1, 10, 20, 40]).similar(&[10, 30, 20, 40]);
    let generator = Arc::new(FakeGenerator::returning(&["budget", "savings"]));
    let scorer = Arc::new(FakeScorer::default());

    let analysis = assert_ok!(
        pipeline(store, Arc::clone(&generator), scorer)
            .analyze_app(1)
            .await
    );

    let similar_ids: Vec<u64> = analysis.similar_apps.iter().map(|a| a.id).collect();
    assert_eq!(similar_ids, vec![10, 20]);
    assert_eq!(*generator.seen_similar.lock().unwrap(), vec![10, 20]);
    assert_eq!(analysis.app.id, 1);
    assert_eq!(analysis.run.results.len(), 2);
}

#[tokio::test]
async fn similar_list_failure_does_not_abort_run() {
    let store = FakeAppStore {
        similar_fails: true,
        ..FakeAppStore::with_apps(&[1])
    };
    let generator = Arc::new(FakeGenerator::returning(&["budget"]));
    let analysis = assert_ok!(
        pipeline(store, generator, Arc::new(FakeScorer::default()))
            .analyze_app(1)
            .await
    );
    assert!(analysis.similar_apps.is_empty());
    assert_eq!(analysis.run.results.len(), 1);
}

#[tokio::test]
async fn similar_apps_are_limited_in_returned_order() {
    let store = FakeAppStore::with_apps(&[1, 5, 4, 3, 2]).similar(&[5, 4, 3, 2]);
    let generator = Arc::new(FakeGenerator::returning(&["budget"]));
    let analysis = assert_ok!(
        pipeline(store, generator, Arc::new(FakeScorer::default()))
            .analyze_app(1)
            .await
    );
    let ids: Vec<u64> = analysis.similar_apps.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

#[tokio::test]
async fn missing_primary_app_aborts_before_scoring() {
    let store = FakeAppStore::with_apps(&[10]).similar(&[10]);
    let scorer = Arc::new(FakeScorer::default());
    let result = pipeline(
        store,
        Arc::new(FakeGenerator::returning(&["budget"])),
        Arc::clone(&scorer),
    )
    .analyze_app(1)
    .await;

    let err = assert_err!(result);
    assert!(matches!(err, AppError::Api(ApiError::AppNotFound { app_id: 1 })));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn generator_failure_aborts_before_scoring() {
    let store = FakeAppStore::with_apps(&[1]);
    let scorer = Arc::new(FakeScorer::default());
    let result = pipeline(store, Arc::new(FakeGenerator::failing()), Arc::clone(&scorer))
        .analyze_app(1)
        .await;

    let err = assert_err!(result);
    assert!(matches!(err, AppError::Llm(_)));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn sampled_analysis_scores_five_distinct_generated_keywords() {
    let generated: Vec<String> = keywords(12);
    let refs: Vec<&str> = generated.iter().map(String::as_str).collect();
    let store = FakeAppStore::with_apps(&[1]);
    let scorer = Arc::new(FakeScorer::default());
    let mut rng = StdRng::seed_from_u64(99);

    let analysis = assert_ok!(
        pipeline(store, Arc::new(FakeGenerator::returning(&refs)), Arc::clone(&scorer))
            .analyze_app_sampled(1, 5, &mut rng)
            .await
    );

    assert_eq!(analysis.generated_keywords.len(), 12);
    assert_eq!(analysis.run.results.len(), 5);
    let unique: HashSet<String> = scorer.calls().into_iter().collect();
    assert_eq!(unique.len(), 5);
    assert!(unique.iter().all(|k| generated.contains(k)));
}
