// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScoringSettings;
use crate::domain::models::artifact::{ArtifactBundle, HostScan};
use crate::domain::models::competitor::ScoredEntity;

/// 评分引擎
///
/// 确定性的加权公式，对目标、竞争对手与参考站点一视同仁：
///
/// ```text
/// score = min(100,
///   JSON-LD (5 + 3×类型数，上限 20，仅在发现时计入)
///   + robots 5 + AI 指令 5
///   + sitemap 5 + URL 数 > 10 时 5
///   + RSS 5 + llms.txt 15 + ai-manifest 10 + mcp 10 + openapi 10
///   + round(内容缺口分 / 10))
/// ```
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoringSettings,
}

impl ScoringEngine {
    pub fn new(weights: ScoringSettings) -> Self {
        Self { weights }
    }

    /// 计算分数
    ///
    /// # 参数
    ///
    /// * `artifacts` - 8 项制品检查
    /// * `content_gap_score` - 外部 0-100 内容信号，没有内容分析时为 `None`
    pub fn score(&self, artifacts: &ArtifactBundle, content_gap_score: Option<f64>) -> u32 {
        let w = &self.weights;
        let mut score = 0u32;

        let json_ld = &artifacts.json_ld_schema;
        if json_ld.status.is_found() {
            let types = json_ld.types.len() as u32;
            score += (w.json_ld_base + w.json_ld_per_type * types).min(w.json_ld_cap);
        }

        let robots = &artifacts.robots_txt;
        if robots.status.is_found() {
            score += w.robots_found;
            if robots.directives.has_ai_directives {
                score += w.robots_ai_directives;
            }
        }

        let sitemap = &artifacts.sitemap;
        if sitemap.status.is_found() {
            score += w.sitemap_found;
            if sitemap.url_count > w.sitemap_large_threshold {
                score += w.sitemap_large;
            }
        }

        let flat = [
            (artifacts.rss_feed.status, w.rss_found),
            (artifacts.llms_txt.status, w.llms_txt_found),
            (artifacts.ai_manifest.status, w.ai_manifest_found),
            (artifacts.mcp_config.status, w.mcp_config_found),
            (artifacts.open_api.status, w.open_api_found),
        ];
        score += flat
            .iter()
            .filter(|(status, _)| status.is_found())
            .map(|(_, points)| points)
            .sum::<u32>();

        score += self.content_gap_term(content_gap_score);

        score.min(w.max_score)
    }

    /// 内容缺口加分：round(分数 / 10)，最多 `content_gap_max`
    pub fn content_gap_term(&self, content_gap_score: Option<f64>) -> u32 {
        match content_gap_score {
            Some(s) if s.is_finite() => {
                ((s.clamp(0.0, 100.0) / 10.0).round() as u32).min(self.weights.content_gap_max)
            }
            _ => 0,
        }
    }

    pub fn score_entity(&self, url: &str, scan: HostScan, content_gap_score: Option<f64>) -> ScoredEntity {
        ScoredEntity {
            url: url.to_string(),
            score: self.score(&scan.artifacts, content_gap_score),
            artifact_checks: scan.artifacts,
            crawl_success: scan.crawl_success,
        }
    }

    /// 是否可作为可信比较对象
    pub fn qualifies_as_benchmark(&self, entity: &ScoredEntity) -> bool {
        entity.crawl_success
            && entity.artifact_checks.found_count() >= self.weights.benchmark_min_artifacts
    }

    pub fn min_benchmark_artifacts(&self) -> usize {
        self.weights.benchmark_min_artifacts
    }
}
