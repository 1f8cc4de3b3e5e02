// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::warn;

use crate::domain::models::analysis::ContentAnalysis;
use crate::domain::models::report::StageOutcome;
use crate::domain::services::extraction_service::PageExtract;
use crate::domain::services::llm_service::ContentIntelligence;
use crate::utils::json_extract::decode;

const MAX_PROMPT_TEXT: usize = 8_000;

/// 内容分析服务
///
/// 一次生成调用同时得到主题识别、内容缺口、NAP、事实核查与用户问题。
/// 任何失败都降级为中性默认值。
pub struct ContentAnalyzer {
    intelligence: Arc<dyn ContentIntelligence>,
    min_content_chars: usize,
}

impl ContentAnalyzer {
    pub fn new(intelligence: Arc<dyn ContentIntelligence>, min_content_chars: usize) -> Self {
        Self {
            intelligence,
            min_content_chars,
        }
    }

    pub async fn analyze(&self, url: &str, page: &PageExtract) -> StageOutcome<ContentAnalysis> {
        if page.text.chars().count() < self.min_content_chars {
            return StageOutcome::degraded(
                ContentAnalysis::default(),
                format!(
                    "Content analysis skipped: page text is shorter than {} characters",
                    self.min_content_chars
                ),
            );
        }

        let prompt = build_prompt(url, page);
        match self.intelligence.generate(&prompt).await {
            Ok(text) => match decode::<ContentAnalysis>(&text) {
                Some(analysis) => StageOutcome::ok(analysis),
                None => {
                    warn!(url, "Content analysis output could not be parsed");
                    StageOutcome::degraded(
                        ContentAnalysis::default(),
                        "Content analysis returned unparseable output",
                    )
                }
            },
            Err(e) => {
                warn!(url, error = %e, "Content analysis failed");
                StageOutcome::degraded(
                    ContentAnalysis::default(),
                    format!("Content analysis failed: {}", e),
                )
            }
        }
    }
}

fn build_prompt(url: &str, page: &PageExtract) -> String {
    let info = page.content_info();
    let text: String = page.text.chars().take(MAX_PROMPT_TEXT).collect();
    let headings = info
        .headings
        .h1
        .iter()
        .chain(info.headings.h2.iter())
        .take(20)
        .cloned()
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"Analyze the following website content and return a JSON object.

URL: {url}
Title: {title}
Description: {description}
Headings: {headings}

Content:
{text}

Return ONLY a JSON object with this exact structure:
{{
  "topicRecognition": {{
    "primaryTopic": "main topic",
    "secondaryTopics": ["topic"],
    "industry": "one of: ecommerce, saas, local_business, media, general",
    "contentType": "e.g. homepage, blog, product page",
    "keywords": ["keyword"],
    "entities": [{{"name": "entity", "type": "organization|person|product|place"}}],
    "targetAudience": "who the content is for"
  }},
  "contentGap": {{
    "missingTopics": ["topic the page should cover"],
    "missingQuestions": ["question users ask that is not answered"],
    "contentScore": 0-100,
    "recommendations": ["actionable recommendation"]
  }},
  "napData": {{
    "name": "business name or null",
    "address": "address or null",
    "phone": "phone or null",
    "email": "email or null",
    "isComplete": true or false
  }},
  "factCheck": {{
    "claims": [{{"claim": "claim text", "verifiable": true, "issue": "problem or null"}}],
    "overallCredibility": 0-100,
    "recommendations": ["recommendation"]
  }},
  "userQuestions": ["question an AI assistant user might ask about this site"]
}}"#,
        url = url,
        title = info.title,
        description = info.description,
        headings = headings,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::extraction_service::ExtractionService;
    use crate::domain::services::llm_service::GroundedResponse;
    use async_trait::async_trait;

    struct Canned(Result<String, String>);

    #[async_trait]
    impl ContentIntelligence for Canned {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }

        async fn generate_grounded(&self, _prompt: &str) -> anyhow::Result<GroundedResponse> {
            Err(anyhow::anyhow!("not used"))
        }
    }

    fn long_page() -> PageExtract {
        ExtractionService::extract(&format!(
            "<html><head><title>Shop</title></head><body><p>{}</p></body></html>",
            "Quality handmade furniture shipped worldwide. ".repeat(5)
        ))
    }

    #[tokio::test]
    async fn test_parses_fenced_analysis() {
        let reply = "Here you go:\n```json\n{\"topicRecognition\": {\"industry\": \"ecommerce\", \"primaryTopic\": \"Furniture\"}, \"contentGap\": {\"contentScore\": 72, \"missingTopics\": [\"Shipping\"]}}\n```";
        let analyzer = ContentAnalyzer::new(Arc::new(Canned(Ok(reply.to_string()))), 100);

        let outcome = analyzer.analyze("https://shop.example", &long_page()).await;

        assert!(outcome.degraded.is_none());
        assert_eq!(outcome.value.topic_recognition.industry, "ecommerce");
        assert_eq!(outcome.value.content_gap.content_score, 72.0);
        assert_eq!(outcome.value.content_gap.missing_topics, vec!["Shipping"]);
    }

    #[tokio::test]
    async fn test_null_fields_take_neutral_defaults() {
        let reply = r#"{"topicRecognition": {"industry": "saas", "targetAudience": null, "keywords": null},
            "contentGap": {"contentScore": null, "missingTopics": ["Pricing"]},
            "napData": {"name": "Acme", "phone": null, "isComplete": null},
            "factCheck": null, "userQuestions": null}"#;
        let analyzer = ContentAnalyzer::new(Arc::new(Canned(Ok(reply.to_string()))), 100);

        let outcome = analyzer.analyze("https://shop.example", &long_page()).await;

        assert!(outcome.degraded.is_none());
        let analysis = outcome.value;
        assert_eq!(analysis.topic_recognition.industry, "saas");
        assert_eq!(analysis.topic_recognition.target_audience, "General audience");
        assert!(analysis.topic_recognition.keywords.is_empty());
        assert_eq!(analysis.content_gap.content_score, 50.0);
        assert_eq!(analysis.content_gap.missing_topics, vec!["Pricing"]);
        assert_eq!(analysis.nap_data.name.as_deref(), Some("Acme"));
        assert!(!analysis.nap_data.is_complete);
        assert_eq!(analysis.fact_check.overall_credibility, 50.0);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_neutral_default() {
        let analyzer = ContentAnalyzer::new(Arc::new(Canned(Err("quota".to_string()))), 100);

        let outcome = analyzer.analyze("https://shop.example", &long_page()).await;

        assert!(outcome.degraded.unwrap().contains("quota"));
        assert_eq!(outcome.value, ContentAnalysis::default());
        assert_eq!(outcome.value.content_gap.content_score, 50.0);
    }

    #[tokio::test]
    async fn test_unparseable_output_degrades() {
        let analyzer =
            ContentAnalyzer::new(Arc::new(Canned(Ok("I cannot help with that".to_string()))), 100);

        let outcome = analyzer.analyze("https://shop.example", &long_page()).await;

        assert!(outcome.degraded.is_some());
        assert_eq!(outcome.value.topic_recognition.industry, "general");
    }

    #[tokio::test]
    async fn test_short_page_skips_the_call() {
        let analyzer = ContentAnalyzer::new(Arc::new(Canned(Err("must not be called".to_string()))), 100);
        let page = ExtractionService::extract("<html><body>tiny</body></html>");

        let outcome = analyzer.analyze("https://shop.example", &page).await;

        assert!(outcome.degraded.unwrap().contains("shorter than 100"));
        assert_eq!(outcome.value, ContentAnalysis::default());
    }
}
