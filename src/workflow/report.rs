//! 分析报告输出

use serde::Serialize;

use crate::models::{AppMetadata, KeywordResult};
use crate::orchestrator::AnalysisRun;
use crate::utils::logging::truncate_text;

const KEYWORD_COLUMN_WIDTH: usize = 28;

/// JSON 报告
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<&'a AppMetadata>,
    #[serde(skip_serializing_if = "is_empty_slice")]
    similar_apps: &'a [AppMetadata],
    platform: String,
    batch_size: usize,
    analyzed: usize,
    failed: usize,
    elapsed_ms: i64,
    keywords: Vec<KeywordResult>,
}

fn is_empty_slice(apps: &&[AppMetadata]) -> bool {
    apps.is_empty()
}

/// 渲染文本表格报告（已排序）
pub fn render_text(run: &AnalysisRun, app: Option<&AppMetadata>) -> String {
    let mut out = String::new();
    let rule = "=".repeat(96);

    out.push_str(&rule);
    out.push('\n');
    match app {
        Some(app) => out.push_str(&format!(
            "关键词分析报告 - {} ({}) [{}]\n",
            app.title, app.id, run.platform
        )),
        None => out.push_str(&format!("关键词分析报告 [{}]\n", run.platform)),
    }
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&format!(
        "{:>4}  {:<width$}  {:>7}  {:>10}  {:<9}  {:<11}  {}\n",
        "#",
        "keyword",
        "traffic",
        "difficulty",
        "traffic",
        "competition",
        "recommendation",
        width = KEYWORD_COLUMN_WIDTH
    ));
    out.push_str(&"-".repeat(96));
    out.push('\n');

    for (rank, result) in run.ranked().iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<width$}  {:>7}  {:>10}  {:<9}  {:<11}  {}\n",
            rank + 1,
            truncate_text(&result.keyword, KEYWORD_COLUMN_WIDTH - 3),
            result.traffic_score,
            result.difficulty_score,
            result.traffic_level.label(),
            result.competition_level.label(),
            result.recommendation.label(),
            width = KEYWORD_COLUMN_WIDTH
        ));
        if let Some(error) = &result.error {
            out.push_str(&format!("{:>6}↳ {}\n", "", error));
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(
        "分析 {} 个关键词，成功 {}，失败 {}，{} 批，耗时 {} ms\n",
        run.results.len(),
        run.success_count(),
        run.failed_count(),
        run.batch_sizes.len(),
        run.elapsed_ms()
    ));

    out
}

/// 渲染 JSON 报告（已排序）
pub fn render_json(
    run: &AnalysisRun,
    app: Option<&AppMetadata>,
    similar_apps: &[AppMetadata],
) -> serde_json::Result<String> {
    let report = JsonReport {
        app,
        similar_apps,
        platform: run.platform.store_code().to_string(),
        batch_size: run.batch_size,
        analyzed: run.results.len(),
        failed: run.failed_count(),
        elapsed_ms: run.elapsed_ms(),
        keywords: run.ranked(),
    };
    serde_json::to_string_pretty(&report)
}
