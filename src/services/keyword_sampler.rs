//! 随机关键词抽样
//!
//! 结果不可复现；需要确定性结果的场景应直接对显式关键词列表做批量分析

use rand::seq::IndexedRandom;
use rand::Rng;

/// 从候选池中无放回地均匀抽取 `size` 个关键词
///
/// 候选池不足 `size` 个时返回全部（顺序随机）
pub fn sample_keywords<R: Rng + ?Sized>(pool: &[String], size: usize, rng: &mut R) -> Vec<String> {
    pool.choose_multiple(rng, size).cloned().collect()
}
