//! LLM 服务 - 业务能力层
//!
//! 只负责"根据应用信息生成关键词"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use std::collections::HashSet;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::models::AppMetadata;
use crate::services::KeywordGenerator;
use crate::utils::logging::truncate_text;

const SYSTEM_MESSAGE: &str = "You are an App Store Optimization (ASO) expert. \
    You study an app's name, description and screenshots and propose the search \
    keywords real users would type to find it. \
    Always answer with a single JSON object of the form {\"keywords\": [\"...\"]} and nothing else.";

/// 描述过长时截断，避免超出上下文
const MAX_DESCRIPTION_CHARS: usize = 4000;

/// LLM 返回的结构化结果
#[derive(Debug, Deserialize)]
struct GeneratedKeywords {
    keywords: Vec<String>,
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 根据应用文本和截图生成关键词
/// - 校验 LLM 返回的 JSON 结构
/// - 不关心关键词如何评分
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_screenshots: usize,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_screenshots: config.max_screenshots,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `imgs`: 图片 URL 列表，非空时以 Vision 格式追加到用户消息中
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        imgs: &[String],
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符, 图片 {} 张", user_message.len(), imgs.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = if imgs.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
        } else {
            let mut content_parts = vec![ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: user_message.to_string(),
                },
            )];

            for url in imgs {
                content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    ChatCompletionRequestMessageContentPartImage {
                        image_url: ImageUrl {
                            url: url.clone(),
                            detail: Some(ImageDetail::Low),
                        },
                    },
                ));
            }

            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
                .build()?
        };
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::ApiCallFailed {
                model: self.model_name.clone(),
                source: e,
            }
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 构建用于关键词生成的用户消息
    fn build_keyword_prompt(&self, app: &AppMetadata, similar: &[AppMetadata]) -> String {
        let similar_info = if similar.is_empty() {
            "  (none)".to_string()
        } else {
            similar
                .iter()
                .enumerate()
                .map(|(i, s)| format!("  {}. {}: {}", i + 1, s.title, s.description_preview(300)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"Propose 15 to 30 App Store search keywords for the app below.

Target app:
  Name: {}
  Description:
{}

Similar apps (for context on the competitive landscape):
{}

Rules:
- Keywords are short search phrases (1 to 3 words), lowercase.
- Mix broad category terms with specific feature terms.
- Do not include the app's brand name or competitor brand names.
- The attached images are the app's screenshots; use them to spot features the description omits.

Answer only with JSON: {{"keywords": ["...", "..."]}}"#,
            app.title,
            truncate_text(&app.description, MAX_DESCRIPTION_CHARS),
            similar_info
        )
    }
}

#[async_trait]
impl KeywordGenerator for LlmService {
    async fn generate(&self, app: &AppMetadata, similar: &[AppMetadata]) -> AppResult<Vec<String>> {
        let user_message = self.build_keyword_prompt(app, similar);
        let screenshots: Vec<String> = app
            .screenshots
            .iter()
            .take(self.max_screenshots)
            .cloned()
            .collect();

        let response = self
            .send_to_llm(&user_message, Some(SYSTEM_MESSAGE), &screenshots)
            .await?;

        let keywords = parse_keywords_response(&response)
            .map_err(|reason| AppError::llm_no_usable_result(&self.model_name, reason))?;

        debug!("LLM 生成了 {} 个关键词", keywords.len());
        Ok(keywords)
    }
}

/// 解析关键词生成的 LLM 响应
///
/// 允许 JSON 被 markdown 代码块包裹；关键词去空白、去重（忽略大小写，保留首次出现）
fn parse_keywords_response(response: &str) -> Result<Vec<String>, String> {
    let json_text = extract_json_object(response)
        .ok_or_else(|| format!("响应中没有 JSON 对象: '{}'", truncate_text(response, 120)))?;

    let parsed: GeneratedKeywords =
        serde_json::from_str(json_text).map_err(|e| format!("JSON 结构不符合约定: {}", e))?;

    let mut seen = HashSet::new();
    let keywords: Vec<String> = parsed
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect();

    if keywords.is_empty() {
        return Err("关键词列表为空".to_string());
    }

    Ok(keywords)
}

/// 从响应中取出 JSON 对象文本
fn extract_json_object(response: &str) -> Option<&str> {
    let fenced = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok()?;
    if let Some(inner) = fenced.captures(response).and_then(|cap| cap.get(1)) {
        return Some(inner.as_str());
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}
