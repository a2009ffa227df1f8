//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式描述
/// - `concurrency`: 每批并发数
pub fn log_startup(mode: &str, concurrency: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("📊 每批并发数: {}", concurrency);
    info!("{}", "=".repeat(60));
}

/// 记录关键词加载信息
pub fn log_keywords_loaded(total: usize, batch_size: usize) {
    info!("✓ 共 {} 个待分析的关键词", total);
    info!("📋 将以每批 {} 个的方式处理", batch_size);
    info!("💡 每批完成后再开始下一批");
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号（从1开始）
/// - `total_batches`: 批次总数
/// - `start`: 起始关键词编号
/// - `end`: 结束关键词编号
/// - `total`: 关键词总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批关键词: {}-{} / 共 {} 个", start, end, total);
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, elapsed_ms: i64) {
    info!("{}", "=".repeat(60));
    info!("📊 关键词分析完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("⏱️ 耗时: {} ms", elapsed_ms);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
