use serde::{Deserialize, Serialize};

/// 应用元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl AppMetadata {
    /// 描述预览，用于日志显示
    pub fn description_preview(&self, max_len: usize) -> String {
        crate::utils::logging::truncate_text(&self.description, max_len)
    }
}

/// 相似应用引用（只有ID，元数据需要再次获取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarApp {
    pub id: u64,
}
