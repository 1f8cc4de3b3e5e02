// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::warn;

use crate::domain::models::analysis::ContentAnalysis;
use crate::domain::models::profile::CompanyProfile;
use crate::domain::models::report::StageOutcome;
use crate::domain::services::extraction_service::PageExtract;
use crate::domain::services::llm_service::ContentIntelligence;
use crate::utils::json_extract::decode;

const MAX_PROMPT_TEXT: usize = 4_000;

/// 公司画像构建服务
pub struct ProfileBuilder {
    intelligence: Arc<dyn ContentIntelligence>,
}

impl ProfileBuilder {
    pub fn new(intelligence: Arc<dyn ContentIntelligence>) -> Self {
        Self { intelligence }
    }

    /// 构建公司画像
    ///
    /// # 参数
    ///
    /// * `domain` - 目标站点的裸域名，作为名称的最后回退
    /// * `page` - 首页提取结果
    /// * `analysis` - 内容分析结果，提供 NAP 与主题提示
    ///
    /// # 返回值
    ///
    /// 生成服务失败或输出无法解析时，返回基于域名（或 NAP 名称）的回退画像
    pub async fn build(
        &self,
        domain: &str,
        page: &PageExtract,
        analysis: &ContentAnalysis,
    ) -> StageOutcome<CompanyProfile> {
        let fallback_name = analysis
            .nap_data
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(domain)
            .to_string();

        let prompt = build_prompt(domain, page, analysis);
        let reply = match self.intelligence.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(domain, error = %e, "Company profile generation failed");
                return StageOutcome::degraded(
                    CompanyProfile::fallback(&fallback_name),
                    format!("Company profile generation failed: {}", e),
                );
            }
        };

        match decode::<CompanyProfile>(&reply) {
            Some(mut profile) => {
                if profile.company_name.trim().is_empty() {
                    profile.company_name = fallback_name;
                }
                StageOutcome::ok(profile)
            }
            None => {
                warn!(domain, "Company profile output could not be parsed");
                StageOutcome::degraded(
                    CompanyProfile::fallback(&fallback_name),
                    "Company profile returned unparseable output",
                )
            }
        }
    }
}

fn build_prompt(domain: &str, page: &PageExtract, analysis: &ContentAnalysis) -> String {
    let info = page.content_info();
    let nap = &analysis.nap_data;
    let topic = &analysis.topic_recognition;
    let text: String = page.text.chars().take(MAX_PROMPT_TEXT).collect();
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"Build a structured business profile for the website {domain}.

Known signals:
- Title: {title}
- Description: {description}
- Business name (NAP): {name}
- Address (NAP): {address}
- Phone (NAP): {phone}
- Primary topic: {primary_topic}
- Industry hint: {industry}
- Keywords: {keywords}
- Target audience: {audience}

Homepage content:
{text}

Extract the company name, industry, the services or products offered, the physical location
(city, region, country) if any, the target market, unique selling points and the business type
(for example: local service, online store, software company, publisher).

Return ONLY a JSON object with this exact structure:
{{
  "companyName": "name",
  "industry": "industry",
  "services": ["service"],
  "location": {{"city": "city or null", "region": "region or null", "country": "country or null"}},
  "targetMarket": "target market",
  "uniqueSellingPoints": ["differentiator"],
  "businessType": "business type"
}}"#,
        domain = domain,
        title = info.title,
        description = info.description,
        name = or_unknown(&nap.name),
        address = or_unknown(&nap.address),
        phone = or_unknown(&nap.phone),
        primary_topic = topic.primary_topic,
        industry = topic.industry,
        keywords = topic.keywords.join(", "),
        audience = topic.target_audience,
        text = text,
    )
}
