// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use super::artifact::ArtifactBundle;

/// 竞争对手类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum CompetitorType {
    #[default]
    Direct,
    Indirect,
    Aspirational,
}

impl From<String> for CompetitorType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "indirect" => CompetitorType::Indirect,
            "aspirational" => CompetitorType::Aspirational,
            _ => CompetitorType::Direct,
        }
    }
}

impl From<Option<String>> for CompetitorType {
    fn from(value: Option<String>) -> Self {
        value.map(CompetitorType::from).unwrap_or_default()
    }
}

/// 已发现的竞争对手
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    pub description: String,
    pub reason: String,
    pub competitor_type: CompetitorType,
}

/// 预扫描结果，仅作为排序信号
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreScanResult {
    pub url: String,
    /// 命中端点的权重之和
    pub artifact_count: u32,
    pub reachable: bool,
}

/// 搜索增强生成返回的引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCitation {
    pub title: String,
    pub uri: String,
}

/// 已评分实体：目标、竞争对手与参考站点使用同一结构
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEntity {
    pub url: String,
    pub score: u32,
    pub artifact_checks: ArtifactBundle,
    pub crawl_success: bool,
}

/// 报告中的竞争对手条目
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorReport {
    pub name: String,
    pub url: String,
    pub description: String,
    pub reason: String,
    pub competitor_type: CompetitorType,
    pub score: u32,
    pub artifact_checks: ArtifactBundle,
    pub crawled_successfully: bool,
    pub artifacts_found_count: usize,
    pub artifacts_found_percentage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_scan: Option<PreScanResult>,
    /// 该竞争对手拥有而目标缺失的制品
    pub advantages: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_benchmark: bool,
}

impl CompetitorReport {
    pub fn new(competitor: Competitor, scored: ScoredEntity, pre_scan: Option<PreScanResult>) -> Self {
        let artifacts_found_count = scored.artifact_checks.found_count();
        let artifacts_found_percentage = scored.artifact_checks.found_percentage();
        Self {
            name: competitor.name,
            url: scored.url,
            description: competitor.description,
            reason: competitor.reason,
            competitor_type: competitor.competitor_type,
            score: scored.score,
            artifact_checks: scored.artifact_checks,
            crawled_successfully: scored.crawl_success,
            artifacts_found_count,
            artifacts_found_percentage,
            pre_scan,
            advantages: Vec::new(),
            is_benchmark: false,
        }
    }
}
