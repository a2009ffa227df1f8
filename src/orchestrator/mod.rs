//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量关键词分析器
//! - 把关键词切成固定大小的批次
//! - 批内并发调用评分服务，批间按节奏等待
//! - 单个关键词失败降级，不影响整体
//!
//! ### `app_pipeline` - 单个应用分析流程
//! - 主应用 → 相似应用 → 关键词生成 → 批量分析
//!
//! ### `pacing` - 批次间等待策略
//!
//! ## 层次关系
//!
//! ```text
//! app_pipeline (处理单个应用)
//!     ↓
//! batch_processor (处理 Vec<关键词>)
//!     ↓
//! services (能力层：应用数据 / LLM / ASO 评分)
//!     ↓
//! clients (HTTP 客户端)
//! ```

pub mod app_pipeline;
pub mod batch_processor;
pub mod pacing;

pub use app_pipeline::{AppAnalysis, AppPipeline};
pub use batch_processor::{AnalysisRun, BatchProcessor};
pub use pacing::Pacing;
