//! 批次间节奏控制
//!
//! 批次编号 → 等待时长。生产环境固定 1 秒，测试中可以设为 0 跳过等待

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 默认批次间隔
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

/// 批次间等待策略
#[derive(Clone)]
pub struct Pacing {
    delay_for: Arc<dyn Fn(usize) -> Duration + Send + Sync>,
}

impl Pacing {
    /// 每批之后固定等待
    pub fn fixed(delay: Duration) -> Self {
        Self::from_fn(move |_| delay)
    }

    /// 不等待
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// 自定义策略，参数为刚完成的批次编号（从0开始）
    pub fn from_fn(f: impl Fn(usize) -> Duration + Send + Sync + 'static) -> Self {
        Self {
            delay_for: Arc::new(f),
        }
    }

    /// 第 `batch_index` 批完成后应等待的时长
    pub fn delay_after(&self, batch_index: usize) -> Duration {
        (self.delay_for)(batch_index)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::fixed(DEFAULT_BATCH_DELAY)
    }
}

impl fmt::Debug for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacing")
            .field("first_delay", &self.delay_after(0))
            .finish()
    }
}
