//! ASO 评分服务客户端
//!
//! 评分算法本身在外部服务中，这里只负责请求和响应校验

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{CompetitionLevel, KeywordScore, Platform, Recommendation, TrafficLevel};
use crate::services::KeywordScorer;

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    keyword: &'a str,
    store: &'static str,
}

/// 评分服务响应，分数可能是小数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    traffic: Option<f64>,
    difficulty: Option<f64>,
    traffic_level: Option<TrafficLevel>,
    competition_level: Option<CompetitionLevel>,
    recommendation: Option<Recommendation>,
}

/// ASO 评分客户端
pub struct AsoClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl AsoClient {
    /// 创建新的评分客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("http-client", e))?;

        Ok(Self {
            http,
            endpoint: format!("{}/scores", config.aso_api_base_url.trim_end_matches('/')),
            api_key: config.aso_api_key.clone(),
        })
    }
}

#[async_trait]
impl KeywordScorer for AsoClient {
    async fn score(&self, keyword: &str, platform: Platform) -> AppResult<KeywordScore> {
        debug!("请求关键词评分: '{}' ({})", keyword, platform);

        let mut request = self.http.post(&self.endpoint).json(&ScoreRequest {
            keyword,
            store: platform.store_code(),
        });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        let parsed: ScoreResponse =
            serde_json::from_str(&body).map_err(|source| ApiError::JsonParseFailed {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        into_keyword_score(parsed, &self.endpoint)
    }
}

/// 校验响应并转换为 KeywordScore，缺失的等级由分数推导
fn into_keyword_score(response: ScoreResponse, endpoint: &str) -> AppResult<KeywordScore> {
    let traffic = validate_score(response.traffic, "traffic", endpoint)?;
    let difficulty = validate_score(response.difficulty, "difficulty", endpoint)?;

    let derived = KeywordScore::from_scores(traffic, difficulty);
    Ok(KeywordScore {
        traffic_score: traffic,
        difficulty_score: difficulty,
        competition_level: response
            .competition_level
            .unwrap_or(derived.competition_level),
        traffic_level: response.traffic_level.unwrap_or(derived.traffic_level),
        recommendation: response.recommendation.unwrap_or(derived.recommendation),
    })
}

/// 分数必须存在、有限且在 [0, 100] 内
fn validate_score(value: Option<f64>, field: &str, endpoint: &str) -> AppResult<u8> {
    let value =
        value.ok_or_else(|| AppError::malformed_response(endpoint, format!("缺少 {} 字段", field)))?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::malformed_response(
            endpoint,
            format!("{} 分数 {} 超出范围 [0, 100]", field, value),
        ));
    }

    Ok(value.round() as u8)
}
