//! 相似应用扩展 - 业务能力层
//!
//! 单个相似应用获取失败只记录警告并跳过，不影响其他应用和主应用

use futures::future::join_all;
use tracing::{info, warn};

use crate::models::AppMetadata;
use crate::services::AppDataSource;

/// 获取主应用的前 `limit` 个相似应用的元数据
///
/// 保持相似度顺序，不重新排序；获取失败的应用被直接省略
pub async fn expand_similar_apps<D>(source: &D, app_id: u64, limit: usize) -> Vec<AppMetadata>
where
    D: AppDataSource + ?Sized,
{
    let similar = match source.fetch_similar(app_id).await {
        Ok(similar) => similar,
        Err(e) => {
            warn!("⚠️ 获取应用 {} 的相似应用列表失败: {}", app_id, e);
            return Vec::new();
        }
    };

    let selected: Vec<u64> = similar.iter().take(limit).map(|s| s.id).collect();
    info!(
        "🔗 找到 {} 个相似应用，取前 {} 个: {:?}",
        similar.len(),
        selected.len(),
        selected
    );

    let fetches = selected.iter().map(|&id| source.fetch_app(id));
    let results = join_all(fetches).await;

    selected
        .into_iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(app) => {
                info!("  ✓ 相似应用 {}: {}", id, app.title);
                Some(app)
            }
            Err(e) => {
                warn!("  ⚠️ 相似应用 {} 获取失败，已跳过: {}", id, e);
                None
            }
        })
        .collect()
}
