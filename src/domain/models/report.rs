// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::analysis::ContentAnalysis;
use super::artifact::ArtifactBundle;
use super::competitor::{CompetitorReport, SourceCitation};
use super::profile::CompanyProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
}

/// 发现项
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
    /// 已有多少竞争对手具备该制品
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// 改进机会
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub estimated_score_gain: u32,
}

/// 行业基准与百分位
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    pub industry: String,
    pub average: u32,
    pub top25: u32,
    pub top10: u32,
    /// top10 | top25 | average | below_average
    pub percentile: String,
}

/// 各严重级别的发现数量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Issues {
    pub critical: usize,
    pub warnings: usize,
    pub suggestions: usize,
}

impl Issues {
    pub fn tally(findings: &[Finding]) -> Self {
        let count = |severity| findings.iter().filter(|f| f.severity == severity).count();
        Self {
            critical: count(Severity::Critical),
            warnings: count(Severity::Warning),
            suggestions: count(Severity::Suggestion),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

/// 首页内容概览
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    pub title: String,
    pub description: String,
    pub headings: Headings,
    pub meta_tag_count: usize,
}

/// 扫描报告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub success: bool,
    pub scan_id: Uuid,
    pub url: String,
    pub crawled_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub score: u32,
    pub benchmarks: BenchmarkSummary,
    pub issues: Issues,
    pub findings: Vec<Finding>,
    pub opportunities: Vec<Opportunity>,
    pub artifact_checks: ArtifactBundle,
    pub analysis: ContentAnalysis,
    pub company_profile: CompanyProfile,
    pub content_info: ContentInfo,
    pub competitors: Vec<CompetitorReport>,
    pub competitor_sources: Vec<SourceCitation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub analysis_errors: Vec<String>,
}

/// 可降级阶段的输出
///
/// `degraded` 不为空时，`value` 是该阶段的中性默认值。
#[derive(Debug, Clone)]
pub struct StageOutcome<T> {
    pub value: T,
    pub degraded: Option<String>,
}

impl<T> StageOutcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            degraded: None,
        }
    }

    pub fn degraded(value: T, note: impl Into<String>) -> Self {
        Self {
            value,
            degraded: Some(note.into()),
        }
    }

    /// 取出结果，并把降级说明追加到 `errors`
    pub fn collect_into(self, errors: &mut Vec<String>) -> T {
        if let Some(note) = self.degraded {
            errors.push(note);
        }
        self.value
    }
}
