//! 流程层（Workflow）
//!
//! 关键词列表的输入规范化、结果排序与报告输出，均为纯函数

pub mod keyword_list;
pub mod ranker;
pub mod report;

pub use keyword_list::normalize_keywords;
pub use ranker::rank_results;
pub use report::{render_json, render_text};
