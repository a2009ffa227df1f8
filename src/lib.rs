//! # ASO Keywords
//!
//! App Store 关键词研究工具：获取应用信息和相似应用，
//! 让 LLM 根据文字和截图提出搜索关键词，再调用 ASO 评分服务给出流量与难度。
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只负责 HTTP 请求和响应结构校验
//! - `AppStoreClient` - 应用元数据、相似应用
//! - `AsoClient` - 关键词评分
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，以 trait 暴露外部协作方
//! - `LlmService` - 关键词生成
//! - `expand_similar_apps` - 相似应用扩展（失败隔离）
//! - `sample_keywords` - 随机抽样
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 关键词规范化、排序、报告输出
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分批并发评分，批间等待
//! - `orchestrator/app_pipeline` - 单个应用的完整流程

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use cli::Cli;
pub use config::{BatchSize, Config};
pub use error::{AppError, AppResult};
pub use models::{AppMetadata, KeywordResult, Platform};
pub use orchestrator::{AnalysisRun, AppPipeline, BatchProcessor, Pacing};
pub use workflow::{normalize_keywords, rank_results};
