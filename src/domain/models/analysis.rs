// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 内容分析结果
///
/// 字段全部带有默认值：生成服务返回的 JSON 缺失任意字段时，
/// 该字段回落为中性值，而不是让整个解析失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentAnalysis {
    pub topic_recognition: TopicRecognition,
    pub content_gap: ContentGap,
    pub nap_data: NapData,
    pub fact_check: FactCheck,
    pub user_questions: Vec<String>,
}

/// 主题识别
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicRecognition {
    pub primary_topic: String,
    pub secondary_topics: Vec<String>,
    /// ecommerce | saas | local_business | media | general ...
    pub industry: String,
    pub content_type: String,
    pub keywords: Vec<String>,
    pub entities: Vec<Entity>,
    pub target_audience: String,
}

impl Default for TopicRecognition {
    fn default() -> Self {
        Self {
            primary_topic: "Unknown".to_string(),
            secondary_topics: Vec::new(),
            industry: "general".to_string(),
            content_type: "webpage".to_string(),
            keywords: Vec::new(),
            entities: Vec::new(),
            target_audience: "General audience".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// 内容缺口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentGap {
    pub missing_topics: Vec<String>,
    pub missing_questions: Vec<String>,
    /// 0-100
    pub content_score: f64,
    pub recommendations: Vec<String>,
}

impl Default for ContentGap {
    fn default() -> Self {
        Self {
            missing_topics: Vec::new(),
            missing_questions: Vec::new(),
            content_score: 50.0,
            recommendations: vec!["Unable to analyze content".to_string()],
        }
    }
}

/// 名称、地址、电话
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NapData {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_complete: bool,
}

impl NapData {
    /// 缺失的 NAP 字段
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.address) {
            missing.push("address");
        }
        if blank(&self.phone) {
            missing.push("phone");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claim {
    pub claim: String,
    pub verifiable: bool,
    pub issue: Option<String>,
}

/// 事实核查
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactCheck {
    pub claims: Vec<Claim>,
    /// 0-100
    pub overall_credibility: f64,
    pub recommendations: Vec<String>,
}

impl Default for FactCheck {
    fn default() -> Self {
        Self {
            claims: Vec::new(),
            overall_credibility: 50.0,
            recommendations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_neutral_defaults() {
        let analysis: ContentAnalysis = serde_json::from_str(
            r#"{"topicRecognition": {"industry": "saas"}, "contentGap": {"contentScore": 80}}"#,
        )
        .unwrap();

        assert_eq!(analysis.topic_recognition.industry, "saas");
        assert_eq!(analysis.topic_recognition.primary_topic, "Unknown");
        assert_eq!(analysis.content_gap.content_score, 80.0);
        assert_eq!(analysis.fact_check.overall_credibility, 50.0);
    }

    #[test]
    fn test_nap_missing_fields() {
        let nap = NapData {
            name: Some("Joe's Pizza".to_string()),
            phone: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(nap.missing_fields(), vec!["address", "phone"]);
    }
}
