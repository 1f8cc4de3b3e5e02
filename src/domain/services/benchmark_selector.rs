// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::config::settings::ReferenceSite;
use crate::domain::models::competitor::{Competitor, CompetitorReport, CompetitorType};
use crate::domain::services::artifact_scanner::ArtifactScanner;
use crate::domain::services::scoring::ScoringEngine;
use crate::utils::url_utils::{bare_domain, normalize_target_url};

pub const REFERENCE_ADVANTAGE: &str = "Reference benchmark demonstrating AI-ready artifacts";

/// 基准选择服务
///
/// 至少有一个竞争对手合格时，标记制品最多的那个为基准；
/// 否则依次扫描参考站点，把第一个合格的插入到竞争对手列表最前面。
/// 没有参考站点合格时不做任何插入。
pub struct BenchmarkSelector {
    scanner: Arc<ArtifactScanner>,
    scoring: ScoringEngine,
    reference_sites: Vec<ReferenceSite>,
    max_competitors: usize,
}

impl BenchmarkSelector {
    pub fn new(
        scanner: Arc<ArtifactScanner>,
        scoring: ScoringEngine,
        reference_sites: Vec<ReferenceSite>,
        max_competitors: usize,
    ) -> Self {
        Self {
            scanner,
            scoring,
            reference_sites,
            max_competitors,
        }
    }

    pub async fn apply(&self, competitors: &mut Vec<CompetitorReport>) {
        if mark_best_in_class(competitors, self.scoring.min_benchmark_artifacts()) {
            return;
        }

        for site in &self.reference_sites {
            let Some(url) = normalize_target_url(&site.url) else {
                continue;
            };
            let domain = bare_domain(&url);
            let already_listed = competitors.iter().any(|c| {
                normalize_target_url(&c.url).is_some_and(|u| bare_domain(&u) == domain)
            });
            if already_listed {
                continue;
            }

            let scan = self.scanner.scan_site(url.as_str()).await;
            let scored = self.scoring.score_entity(url.as_str(), scan, None);
            if !self.scoring.qualifies_as_benchmark(&scored) {
                info!(reference = %site.name, found = scored.artifact_checks.found_count(), "Reference site did not qualify");
                continue;
            }

            info!(reference = %site.name, score = scored.score, "Using reference site as benchmark");
            let competitor = Competitor {
                name: site.name.clone(),
                url: url.to_string(),
                description: site.description.clone(),
                reason: site.reason.clone(),
                competitor_type: CompetitorType::Aspirational,
            };
            let mut report = CompetitorReport::new(competitor, scored, None);
            report.is_benchmark = true;
            report.advantages = vec![REFERENCE_ADVANTAGE.to_string()];

            competitors.insert(0, report);
            competitors.truncate(self.max_competitors.max(1));
            return;
        }
    }
}

/// 标记合格竞争对手中制品最多的一个，返回是否存在合格者
fn mark_best_in_class(competitors: &mut [CompetitorReport], min_artifacts: usize) -> bool {
    let best = competitors
        .iter()
        .enumerate()
        .filter(|(_, c)| c.crawled_successfully && c.artifacts_found_count >= min_artifacts)
        // max_by_key keeps the last maximum, so compare on reversed index to keep the first
        .max_by_key(|(i, c)| (c.artifacts_found_count, std::cmp::Reverse(*i)))
        .map(|(i, _)| i);

    match best {
        Some(i) => {
            competitors[i].is_benchmark = true;
            true
        }
        None => false,
    }
}
