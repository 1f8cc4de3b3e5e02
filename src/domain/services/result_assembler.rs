// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BenchmarkSettings, IndustryBenchmark, ScoringSettings};
use crate::domain::models::analysis::ContentAnalysis;
use crate::domain::models::artifact::{ArtifactBundle, ArtifactKind};
use crate::domain::models::competitor::CompetitorReport;
use crate::domain::models::report::{BenchmarkSummary, Finding, Impact, Opportunity, Severity};

/// 结果组装服务
///
/// 把评分后的制品表转换为发现项、改进机会、行业百分位与竞争优势
pub struct ResultAssembler {
    benchmarks: BenchmarkSettings,
    weights: ScoringSettings,
}

impl ResultAssembler {
    pub fn new(benchmarks: BenchmarkSettings, weights: ScoringSettings) -> Self {
        Self {
            benchmarks,
            weights,
        }
    }

    /// 生成发现项
    ///
    /// 每个缺失的制品产生一条发现；已有竞争对手具备该制品时附带说明
    pub fn findings(
        &self,
        target: &ArtifactBundle,
        analysis: &ContentAnalysis,
        competitors: &[CompetitorReport],
    ) -> Vec<Finding> {
        let having = |kind: ArtifactKind| {
            competitors
                .iter()
                .filter(|c| c.crawled_successfully && c.artifact_checks.is_found(kind))
                .count()
        };
        let mut findings = Vec::new();

        if !target.json_ld_schema.status.is_found() {
            findings.push(Finding {
                id: "no-schema".to_string(),
                title: "Missing JSON-LD Structured Data".to_string(),
                category: "schema".to_string(),
                severity: Severity::Critical,
                description: "No JSON-LD structured data was found on the homepage. AI assistants rely on schema.org markup to understand who you are and what you offer.".to_string(),
                recommendation: "Add Organization and WebSite JSON-LD to the homepage, plus Product, Service or LocalBusiness types where relevant.".to_string(),
                competitor_note: competitor_note(having(ArtifactKind::JsonLdSchema), "has structured data", "have structured data"),
            });
        }

        if !target.robots_txt.status.is_found() {
            findings.push(Finding {
                id: "no-robots".to_string(),
                title: "Missing robots.txt".to_string(),
                category: "crawlability".to_string(),
                severity: Severity::Warning,
                description: "No robots.txt file was found. Crawlers have no guidance about what they may access.".to_string(),
                recommendation: "Publish a robots.txt at the site root that references your sitemap.".to_string(),
                competitor_note: competitor_note(having(ArtifactKind::RobotsTxt), "has a robots.txt", "have a robots.txt"),
            });
        } else if !target.robots_txt.directives.has_ai_directives {
            let with_directives = competitors
                .iter()
                .filter(|c| c.crawled_successfully && c.artifact_checks.robots_txt.directives.has_ai_directives)
                .count();
            findings.push(Finding {
                id: "no-ai-directives".to_string(),
                title: "No AI Crawler Directives".to_string(),
                category: "ai".to_string(),
                severity: Severity::Suggestion,
                description: "robots.txt does not address AI crawlers such as GPTBot or ClaudeBot.".to_string(),
                recommendation: "Add explicit User-agent blocks for AI crawlers stating what they may access.".to_string(),
                competitor_note: competitor_note(with_directives, "defines AI crawler rules", "define AI crawler rules"),
            });
        }

        if !target.sitemap.status.is_found() {
            findings.push(Finding {
                id: "no-sitemap".to_string(),
                title: "Missing XML Sitemap".to_string(),
                category: "crawlability".to_string(),
                severity: Severity::Warning,
                description: "No XML sitemap was found at the standard locations.".to_string(),
                recommendation: "Generate /sitemap.xml listing every public page and reference it from robots.txt.".to_string(),
                competitor_note: competitor_note(having(ArtifactKind::Sitemap), "has an XML sitemap", "have an XML sitemap"),
            });
        }

        if !target.llms_txt.status.is_found() {
            findings.push(Finding {
                id: "no-llms-txt".to_string(),
                title: "Missing llms.txt".to_string(),
                category: "ai".to_string(),
                severity: Severity::Critical,
                description: "No llms.txt file was found. This file tells language models what your site is about and where the important content lives.".to_string(),
                recommendation: "Create /llms.txt with a short summary of the business and links to key pages.".to_string(),
                competitor_note: competitor_note(having(ArtifactKind::LlmsTxt), "already has llms.txt", "already have llms.txt"),
            });
        }

        if !target.rss_feed.status.is_found() {
            findings.push(Finding {
                id: "no-rss".to_string(),
                title: "Missing RSS Feed".to_string(),
                category: "content".to_string(),
                severity: Severity::Suggestion,
                description: "No RSS or Atom feed was found.".to_string(),
                recommendation: "Publish a feed for news or blog content so agents can follow updates.".to_string(),
                competitor_note: competitor_note(having(ArtifactKind::RssFeed), "publishes an RSS feed", "publish an RSS feed"),
            });
        }

        let gap = &analysis.content_gap;
        if !gap.missing_topics.is_empty() {
            findings.push(Finding {
                id: "content-gaps".to_string(),
                title: "Content Gaps Identified".to_string(),
                category: "content".to_string(),
                severity: Severity::Warning,
                description: format!("Topics not covered: {}", gap.missing_topics.join(", ")),
                recommendation: gap
                    .recommendations
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "Add content that answers these topics directly.".to_string()),
                competitor_note: None,
            });
        }

        if analysis.topic_recognition.industry == "local_business" && !analysis.nap_data.is_complete {
            let missing = analysis.nap_data.missing_fields();
            let description = if missing.is_empty() {
                "Business name, address and phone are not presented consistently.".to_string()
            } else {
                format!("Missing business information: {}", missing.join(", "))
            };
            findings.push(Finding {
                id: "incomplete-nap".to_string(),
                title: "Incomplete Business Information (NAP)".to_string(),
                category: "local".to_string(),
                severity: Severity::Critical,
                description,
                recommendation: "Show the business name, full address and phone number on the homepage and in LocalBusiness schema.".to_string(),
                competitor_note: None,
            });
        }

        findings
    }

    /// 生成改进机会，按预估加分排列最高杠杆的缺口
    pub fn opportunities(&self, target: &ArtifactBundle) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();

        if !target.json_ld_schema.status.is_found() {
            opportunities.push(Opportunity {
                id: "add-schema".to_string(),
                title: "Add Structured Data".to_string(),
                description: "Describe the business with schema.org JSON-LD so AI systems can cite it accurately.".to_string(),
                impact: Impact::High,
                estimated_score_gain: self.weights.json_ld_cap,
            });
        }

        if !target.llms_txt.status.is_found() {
            opportunities.push(Opportunity {
                id: "add-llms-txt".to_string(),
                title: "Create llms.txt".to_string(),
                description: "Give language models a curated map of the site's most important content.".to_string(),
                impact: Impact::High,
                estimated_score_gain: self.weights.llms_txt_found,
            });
        }

        if !target.open_api.status.is_found() {
            opportunities.push(Opportunity {
                id: "add-openapi".to_string(),
                title: "Add OpenAPI Specification".to_string(),
                description: "Publish an OpenAPI document so agents can discover and call your API.".to_string(),
                impact: Impact::Medium,
                estimated_score_gain: self.weights.open_api_found,
            });
        }

        opportunities
    }

    /// 行业基准与百分位标签
    pub fn benchmark_summary(&self, industry: &str, score: u32) -> BenchmarkSummary {
        let (industry, bench) = match self.benchmarks.industries.get(industry) {
            Some(bench) => (industry.to_string(), *bench),
            None => ("general".to_string(), self.benchmarks.for_industry("general")),
        };
        BenchmarkSummary {
            industry,
            average: bench.average,
            top25: bench.top25,
            top10: bench.top10,
            percentile: percentile(score, &bench).to_string(),
        }
    }
}

pub fn percentile(score: u32, bench: &IndustryBenchmark) -> &'static str {
    if score >= bench.top10 {
        "top10"
    } else if score >= bench.top25 {
        "top25"
    } else if score >= bench.average {
        "average"
    } else {
        "below_average"
    }
}

/// 竞争对手拥有而目标缺失的制品
pub fn competitor_advantages(target: &ArtifactBundle, competitor: &ArtifactBundle) -> Vec<String> {
    [
        (ArtifactKind::JsonLdSchema, "Has structured data (JSON-LD)"),
        (ArtifactKind::LlmsTxt, "Has llms.txt"),
        (ArtifactKind::Sitemap, "Has XML sitemap"),
        (ArtifactKind::RssFeed, "Has RSS feed"),
        (ArtifactKind::OpenApi, "Has OpenAPI specification"),
    ]
    .into_iter()
    .filter(|(kind, _)| competitor.is_found(*kind) && !target.is_found(*kind))
    .map(|(_, label)| label.to_string())
    .collect()
}

fn competitor_note(count: usize, singular: &str, plural: &str) -> Option<String> {
    match count {
        0 => None,
        1 => Some(format!("1 of your competitors {}", singular)),
        n => Some(format!("{} of your competitors {}", n, plural)),
    }
}

#[cfg(test)]
#[path = "result_assembler_test.rs"]
mod tests;
