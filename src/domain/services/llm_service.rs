// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::settings::{GroundingSettings, LlmSettings};
use crate::domain::models::competitor::SourceCitation;

/// 搜索增强生成的输出
#[derive(Debug, Clone, Default)]
pub struct GroundedResponse {
    pub text: String,
    pub citations: Vec<SourceCitation>,
}

/// 内容智能服务特质
///
/// 只约定“提示词进、自由文本出”。返回的文本可能被说明文字或代码块包裹，
/// 调用方负责用 `utils::json_extract` 做容错解析。
#[async_trait]
pub trait ContentIntelligence: Send + Sync {
    /// 普通文本生成
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// 带实时网页搜索与引用的文本生成
    async fn generate_grounded(&self, prompt: &str) -> Result<GroundedResponse>;
}

/// LLM服务 - 处理与LLM提供商的交互
///
/// # 功能
///
/// - 普通生成：OpenAI 兼容的 `chat/completions` 接口
/// - 搜索增强生成：Gemini `generateContent` 接口，启用 `google_search` 工具
///
/// # 配置
///
/// 通过 `Settings.llm` 与 `Settings.grounding` 注入，未配置密钥时调用返回错误，
/// 由调用方降级为默认值。
pub struct LLMService {
    client: reqwest::Client,
    llm: LlmSettings,
    grounding: GroundingSettings,
}

impl LLMService {
    pub fn new(llm: LlmSettings, grounding: GroundingSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            llm,
            grounding,
        }
    }

    async fn post_json(&self, url: &str, body: &Value, timeout_secs: u64, bearer: Option<&str>) -> Result<Value> {
        let mut request = self
            .client
            .post(url)
            .timeout(Duration::from_secs(timeout_secs))
            .json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "LLM API returned error: {} - {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse LLM API response")
    }
}

#[async_trait]
impl ContentIntelligence for LLMService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .llm
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let request_body = json!({
            "model": self.llm.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a precise website analyst. When asked for JSON, you output only valid JSON."
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": 0.2
        });

        let url = format!("{}/chat/completions", self.llm.api_base_url.trim_end_matches('/'));
        let body = self
            .post_json(&url, &request_body, self.llm.timeout_secs, Some(api_key))
            .await?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Invalid response format from LLM API"))
    }

    async fn generate_grounded(&self, prompt: &str) -> Result<GroundedResponse> {
        let api_key = self
            .grounding
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Grounding API key not configured"))?;

        let request_body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }]
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.grounding.api_base_url.trim_end_matches('/'),
            self.grounding.model,
            api_key
        );
        let body = self
            .post_json(&url, &request_body, self.grounding.timeout_secs, None)
            .await?;

        let candidate = &body["candidates"][0];
        let text = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Invalid response format from grounding API"))?;

        let citations = candidate["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| {
                        let web = chunk.get("web")?;
                        Some(SourceCitation {
                            title: web["title"].as_str().unwrap_or_default().to_string(),
                            uri: web["uri"].as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GroundedResponse { text, citations })
    }
}
