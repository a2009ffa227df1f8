//! 结果排序

use std::cmp::Reverse;

use crate::models::KeywordResult;

/// 按流量降序、难度升序排序
///
/// 稳定排序：两项都相同时保持输入顺序。不修改输入，返回新的列表
pub fn rank_results(results: &[KeywordResult]) -> Vec<KeywordResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by_key(|r| (Reverse(r.traffic_score), r.difficulty_score));
    ranked
}
