use serde::{Deserialize, Serialize};

/// 应用商店平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Apple App Store
    #[default]
    AppStore,
    /// Google Play
    GooglePlay,
}

impl Platform {
    /// ASO 评分服务使用的商店代码
    pub fn store_code(self) -> &'static str {
        match self {
            Platform::AppStore => "itunes",
            Platform::GooglePlay => "gplay",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Platform::AppStore => "App Store",
            Platform::GooglePlay => "Google Play",
        }
    }

    /// 从命令行参数或商店代码解析平台
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "app-store" | "appstore" | "itunes" | "ios" => Some(Platform::AppStore),
            "google-play" | "googleplay" | "gplay" | "android" => Some(Platform::GooglePlay),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
