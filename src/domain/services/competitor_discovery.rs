// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::settings::{ProbeSettings, ScanSettings};
use crate::domain::models::competitor::{Competitor, PreScanResult, SourceCitation};
use crate::domain::models::profile::CompanyProfile;
use crate::domain::models::report::StageOutcome;
use crate::domain::services::artifact_scanner::is_feed_document;
use crate::domain::services::llm_service::ContentIntelligence;
use crate::engines::traits::{ProbeResult, Prober};
use crate::utils::json_extract::{extract_json_value, strip_nulls};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils::{bare_domain, normalize_target_url, origin_of, well_known_url};
use crate::utils::validators::validate_public_host;

/// 预扫描端点与权重
pub const PRESCAN_ENDPOINTS: &[(&str, u32)] = &[
    ("/robots.txt", 1),
    ("/sitemap.xml", 1),
    ("/llms.txt", 2),
    ("/.well-known/ai-manifest.json", 2),
    ("/feed", 1),
    ("/rss", 1),
];

/// 名称相似度达到该值即视为目标自身
const SELF_NAME_SIMILARITY: f64 = 0.95;

/// 竞争对手发现结果
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub competitors: Vec<Competitor>,
    pub sources: Vec<SourceCitation>,
}

/// 竞争对手发现服务
///
/// 主路径为一次搜索增强生成；输出无法解析时改用普通生成；两者都失败则返回空列表。
/// 发现的候选随后经过规范化、去重、排除目标自身，并用轻量预扫描排序。
pub struct CompetitorDiscovery {
    intelligence: Arc<dyn ContentIntelligence>,
    prober: Arc<dyn Prober>,
    home_policy: RetryPolicy,
    endpoint_policy: RetryPolicy,
    max_competitors: usize,
    block_private_hosts: bool,
}

impl CompetitorDiscovery {
    pub fn new(
        intelligence: Arc<dyn ContentIntelligence>,
        prober: Arc<dyn Prober>,
        probe: &ProbeSettings,
        scan: &ScanSettings,
    ) -> Self {
        let single = RetryPolicy::silent(probe).with_attempts(1);
        Self {
            intelligence,
            prober,
            home_policy: single
                .clone()
                .with_timeout(Duration::from_millis(probe.prescan_home_timeout_ms)),
            endpoint_policy: single
                .with_timeout(Duration::from_millis(probe.prescan_endpoint_timeout_ms)),
            max_competitors: scan.max_competitors,
            block_private_hosts: scan.block_private_hosts,
        }
    }

    /// 发现竞争对手
    ///
    /// # 参数
    ///
    /// * `profile` - 目标公司画像
    /// * `target` - 目标站点地址，用于排除自身
    pub async fn discover(&self, profile: &CompanyProfile, target: &Url) -> StageOutcome<Discovery> {
        let target_domain = bare_domain(target);

        let mut sources = Vec::new();
        let mut notes = Vec::new();

        let grounded = match self
            .intelligence
            .generate_grounded(&grounded_prompt(profile, &target_domain))
            .await
        {
            Ok(response) => {
                sources = response.citations;
                let parsed = parse_candidates(&response.text);
                if parsed.is_none() {
                    notes.push("grounded competitor search returned unparseable output".to_string());
                }
                parsed
            }
            Err(e) => {
                notes.push(format!("grounded competitor search failed: {}", e));
                None
            }
        };

        let candidates = match grounded {
            Some(candidates) => candidates,
            None => {
                warn!(target = %target_domain, "Falling back to non-grounded competitor search");
                match self
                    .intelligence
                    .generate(&fallback_prompt(profile, &target_domain))
                    .await
                {
                    Ok(text) => match parse_candidates(&text) {
                        Some(candidates) => candidates,
                        None => {
                            notes.push("competitor search returned unparseable output".to_string());
                            Vec::new()
                        }
                    },
                    Err(e) => {
                        notes.push(format!("competitor search failed: {}", e));
                        Vec::new()
                    }
                }
            }
        };

        let competitors = self.clean_candidates(candidates, profile, &target_domain);
        info!(target = %target_domain, count = competitors.len(), "Competitors discovered");

        let discovery = Discovery {
            competitors,
            sources,
        };
        // A usable list from either path means the stage did not degrade
        if discovery.competitors.is_empty() && !notes.is_empty() {
            StageOutcome::degraded(discovery, format!("Competitor discovery: {}", notes.join("; ")))
        } else {
            StageOutcome::ok(discovery)
        }
    }

    /// 规范化、去重并排除目标自身，最多保留 `max_competitors` 个
    fn clean_candidates(
        &self,
        candidates: Vec<Competitor>,
        profile: &CompanyProfile,
        target_domain: &str,
    ) -> Vec<Competitor> {
        let own_name = profile.company_name.trim().to_lowercase();
        let mut seen = HashSet::new();
        let mut cleaned = Vec::new();

        for mut candidate in candidates {
            let Some(url) = normalize_target_url(&candidate.url) else {
                debug!(url = %candidate.url, "Dropping competitor with invalid URL");
                continue;
            };
            let domain = bare_domain(&url);
            if domain == target_domain {
                continue;
            }
            let name = candidate.name.trim().to_lowercase();
            if !own_name.is_empty()
                && !name.is_empty()
                && strsim::jaro_winkler(&name, &own_name) >= SELF_NAME_SIMILARITY
            {
                continue;
            }
            if !seen.insert(domain.clone()) {
                continue;
            }

            if candidate.name.trim().is_empty() {
                candidate.name = domain;
            }
            candidate.url = url.to_string();
            cleaned.push(candidate);

            if cleaned.len() >= self.max_competitors {
                break;
            }
        }

        cleaned
    }

    /// 并发预扫描全部竞争对手并排序
    pub async fn rank(&self, competitors: Vec<Competitor>) -> Vec<(Competitor, PreScanResult)> {
        let pre_scans = join_all(competitors.iter().map(|c| self.pre_scan(&c.url))).await;
        let mut ranked: Vec<(Competitor, PreScanResult)> =
            competitors.into_iter().zip(pre_scans).collect();
        sort_by_pre_scan(&mut ranked);
        ranked
    }

    /// 轻量预扫描：一次首页可达性探测，随后并发探测带权重的端点
    pub async fn pre_scan(&self, site_url: &str) -> PreScanResult {
        let unreachable = PreScanResult {
            url: site_url.to_string(),
            artifact_count: 0,
            reachable: false,
        };

        let Some(url) = normalize_target_url(site_url) else {
            return unreachable;
        };
        if self.block_private_hosts {
            if let Err(e) = validate_public_host(&url).await {
                debug!(url = site_url, error = %e, "Competitor rejected by host guard");
                return unreachable;
            }
        }

        let home = self.prober.probe(url.as_str(), &self.home_policy).await;
        if !home.ok {
            return unreachable;
        }

        let origin = origin_of(&url);
        let results = join_all(PRESCAN_ENDPOINTS.iter().map(|(path, _)| {
            let endpoint = well_known_url(&origin, path);
            async move { self.prober.probe(&endpoint, &self.endpoint_policy).await }
        }))
        .await;

        let artifact_count = PRESCAN_ENDPOINTS
            .iter()
            .zip(results.iter())
            .filter(|((path, _), result)| endpoint_counts(path, result))
            .map(|((_, weight), _)| *weight)
            .sum();

        PreScanResult {
            url: site_url.to_string(),
            artifact_count,
            reachable: true,
        }
    }
}

/// 按（可达 降序，预扫描权重 降序，URL 升序）排序
pub fn sort_by_pre_scan(ranked: &mut [(Competitor, PreScanResult)]) {
    ranked.sort_by(|(_, a), (_, b)| {
        b.reachable
            .cmp(&a.reachable)
            .then(b.artifact_count.cmp(&a.artifact_count))
            .then_with(|| a.url.cmp(&b.url))
    });
}

/// 预扫描端点的最小校验
fn endpoint_counts(path: &str, result: &ProbeResult) -> bool {
    if !result.ok {
        return false;
    }
    let content_type = result.content_type_lower();
    if path.ends_with(".json") {
        return content_type.contains("json")
            && serde_json::from_str::<Value>(result.body.trim()).is_ok();
    }
    if path == "/feed" || path == "/rss" {
        return is_feed_document(&result.body);
    }
    !content_type.contains("text/html") || path.ends_with(".txt")
}

/// 解析候选数组，兼容 `{"competitors": [...]}` 形式
///
/// 逐个元素反序列化，无法解析的条目被跳过，不影响其它候选；
/// 全部条目都无法解析时视为整体不可解析。
fn parse_candidates(text: &str) -> Option<Vec<Competitor>> {
    let mut value = extract_json_value(text)?;
    strip_nulls(&mut value);
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("competitors")? {
            Value::Array(items) => items,
            _ => return None,
        },
        _ => return None,
    };
    let total = items.len();
    let candidates: Vec<Competitor> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if total > 0 && candidates.is_empty() {
        return None;
    }
    Some(candidates)
}

fn profile_summary(profile: &CompanyProfile) -> String {
    let location = profile
        .location_label()
        .unwrap_or_else(|| "not specified".to_string());
    let services = if profile.services.is_empty() {
        "not specified".to_string()
    } else {
        profile.services.join(", ")
    };
    format!(
        "- Company: {}\n- Industry: {}\n- Services: {}\n- Location: {}\n- Target market: {}\n- Business type: {}\n- Differentiators: {}",
        profile.company_name,
        profile.industry,
        services,
        location,
        profile.target_market,
        profile.business_type,
        profile.unique_selling_points.join(", "),
    )
}

const CANDIDATE_FORMAT: &str = r#"Return ONLY a JSON array with 3-5 entries of this exact structure:
[
  {
    "name": "Competitor name",
    "url": "https://competitor.com",
    "description": "What they do",
    "reason": "Why they compete with the company",
    "competitorType": "direct | indirect | aspirational"
  }
]"#;

fn grounded_prompt(profile: &CompanyProfile, target_domain: &str) -> String {
    format!(
        "Search the web for real, currently operating competitors of this business.\n\n{}\n\n\
         Prioritise businesses in the SAME location, the SAME industry, offering the SAME services \
         to the SAME target market. Only include companies with a working website.\n\
         Do NOT include {} itself or any site on the domain {}.\n\n{}",
        profile_summary(profile),
        profile.company_name,
        target_domain,
        CANDIDATE_FORMAT
    )
}

fn fallback_prompt(profile: &CompanyProfile, target_domain: &str) -> String {
    format!(
        "Identify real competitors of this business from your knowledge.\n\n{}\n\n\
         Prefer competitors in the same location and industry that offer similar services to a \
         similar target market. Exclude {} and the domain {}.\n\n{}",
        profile_summary(profile),
        profile.company_name,
        target_domain,
        CANDIDATE_FORMAT
    )
}

#[cfg(test)]
#[path = "competitor_discovery_test.rs"]
mod tests;
