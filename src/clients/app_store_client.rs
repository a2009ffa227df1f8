//! 应用商店 API 客户端
//!
//! 应用元数据走 iTunes lookup 接口，相似应用走单独配置的抓取服务

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{AppMetadata, SimilarApp};
use crate::services::AppDataSource;

/// iTunes lookup 接口的响应
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    result_count: u32,
    #[serde(default)]
    results: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupEntry {
    track_id: Option<u64>,
    track_name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    screenshot_urls: Vec<String>,
    #[serde(default)]
    ipad_screenshot_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SimilarEntry {
    id: u64,
}

/// 应用商店客户端
pub struct AppStoreClient {
    http: reqwest::Client,
    base_url: String,
    similar_apps_url: String,
    country: String,
}

impl AppStoreClient {
    /// 创建新的应用商店客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("http-client", e))?;

        Ok(Self {
            http,
            base_url: config.app_store_base_url.trim_end_matches('/').to_string(),
            similar_apps_url: config.similar_apps_url.clone(),
            country: config.app_store_country.clone(),
        })
    }

    /// 发送 GET 请求并解析 JSON
    async fn get_json<T: DeserializeOwned>(&self, url: &str, app_id: u64) -> AppResult<T> {
        debug!("GET {} (id={})", url, app_id);

        let response = self
            .http
            .get(url)
            .query(&[("id", app_id.to_string()), ("country", self.country.clone())])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(url, e))?;

        serde_json::from_str(&body).map_err(|source| {
            ApiError::JsonParseFailed {
                endpoint: url.to_string(),
                source,
            }
            .into()
        })
    }
}

#[async_trait]
impl AppDataSource for AppStoreClient {
    async fn fetch_app(&self, app_id: u64) -> AppResult<AppMetadata> {
        let url = format!("{}/lookup", self.base_url);
        let response: LookupResponse = self.get_json(&url, app_id).await?;

        if response.result_count == 0 {
            return Err(ApiError::AppNotFound { app_id }.into());
        }

        let entry = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::malformed_response(&url, "resultCount > 0 但 results 为空"))?;

        let title = entry
            .track_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::malformed_response(&url, "缺少 trackName 字段"))?;

        let screenshots = if entry.screenshot_urls.is_empty() {
            entry.ipad_screenshot_urls
        } else {
            entry.screenshot_urls
        };

        Ok(AppMetadata {
            id: entry.track_id.unwrap_or(app_id),
            title,
            description: entry.description.unwrap_or_default(),
            screenshots,
        })
    }

    async fn fetch_similar(&self, app_id: u64) -> AppResult<Vec<SimilarApp>> {
        let entries: Vec<SimilarEntry> = self.get_json(&self.similar_apps_url, app_id).await?;

        debug!("应用 {} 共有 {} 个相似应用", app_id, entries.len());

        Ok(entries
            .into_iter()
            .map(|entry| SimilarApp { id: entry.id })
            .collect())
    }
}
