// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::settings::ProbeSettings;
use crate::domain::models::artifact::{
    AiManifestCheck, ArtifactBundle, ArtifactKind, CheckStatus, HostScan, JsonLdCheck,
    LlmsTxtCheck, McpCheck, OpenApiCheck, RobotsCheck, RssCheck, SitemapCheck,
};
use crate::domain::services::extraction_service::{ExtractionService, PageExtract};
use crate::engines::traits::{ProbeResult, Prober};
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::robots::parse_ai_directives;
use crate::utils::url_utils::{normalize_target_url, origin_of, well_known_url};

pub const ROBOTS_PATHS: &[&str] = &["/robots.txt"];
pub const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/sitemap/sitemap.xml"];
pub const RSS_PATHS: &[&str] = &["/feed", "/rss", "/feed.xml", "/rss.xml", "/atom.xml"];
pub const LLMS_TXT_PATHS: &[&str] = &["/llms.txt"];
pub const AI_MANIFEST_PATHS: &[&str] = &[
    "/.well-known/ai-manifest.json",
    "/ai-manifest.json",
    "/.well-known/ai-plugin.json",
];
pub const MCP_PATHS: &[&str] = &["/.well-known/mcp.json", "/mcp.json"];
pub const OPENAPI_PATHS: &[&str] = &[
    "/openapi.json",
    "/swagger.json",
    "/api-docs",
    "/api/openapi.json",
    "/api/swagger.json",
];

const MAX_STORED_CONTENT: usize = 5_000;
const MAX_SITEMAP_SAMPLE: usize = 10;

static LOC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").expect("valid loc regex"));
static FEED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(rss|feed|channel)[\s>]").expect("valid feed regex"));
static FEED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(item|entry)[\s>]").expect("valid item regex"));

const LLMS_KEYWORDS: &[&str] = &["llm", "ai", "model", "instruction"];

/// 多路径探测的结果
enum PathOutcome<T> {
    Found { url: String, value: T },
    NotFound,
    /// 所有路径都硬失败
    Failed(String),
}

/// 制品扫描器
///
/// 对一个主机并发运行 8 项检查。每项检查都只会产生数据，
/// 一项检查失败不会取消其它检查。
pub struct ArtifactScanner {
    prober: Arc<dyn Prober>,
    silent: RetryPolicy,
    site_home: RetryPolicy,
}

impl ArtifactScanner {
    pub fn new(prober: Arc<dyn Prober>, settings: &ProbeSettings) -> Self {
        let site_home = RetryPolicy::main_fetch(settings)
            .with_attempts(settings.site_home_attempts)
            .with_timeout(Duration::from_millis(settings.site_home_timeout_ms));
        Self {
            prober,
            silent: RetryPolicy::silent(settings),
            site_home,
        }
    }

    /// 扫描主机
    ///
    /// # 参数
    ///
    /// * `origin` - 主机源地址，例如 `https://example.com`
    /// * `homepage` - 首页提取结果；首页抓取失败时为 `None`
    pub async fn scan(&self, origin: &str, homepage: Option<&PageExtract>) -> HostScan {
        let json_ld_schema = json_ld_check(homepage);

        let (robots_txt, sitemap, rss_feed, llms_txt, ai_manifest, mcp_config, open_api) = tokio::join!(
            self.check_robots(origin),
            self.check_sitemap(origin),
            self.check_rss(origin),
            self.check_llms_txt(origin),
            self.check_ai_manifest(origin),
            self.check_mcp(origin),
            self.check_openapi(origin),
        );

        let artifacts = ArtifactBundle {
            json_ld_schema,
            robots_txt,
            sitemap,
            rss_feed,
            llms_txt,
            ai_manifest,
            mcp_config,
            open_api,
        };

        for kind in ArtifactKind::ALL {
            if artifacts.is_found(kind) {
                counter!("artifacts_found_total", "artifact" => kind.key()).increment(1);
            }
        }

        // A single blocked endpoint must not mark the whole host as uncrawlable
        let crawl_success = artifacts.found_count() > 0
            || homepage.is_some()
            || artifacts.robots_txt.status != CheckStatus::CheckFailed;

        debug!(
            origin,
            found = artifacts.found_count(),
            crawl_success,
            "artifact scan finished"
        );

        HostScan {
            artifacts,
            crawl_success,
        }
    }

    /// 抓取站点首页后扫描（竞争对手与参考站点）
    pub async fn scan_site(&self, site_url: &str) -> HostScan {
        let Some(url) = normalize_target_url(site_url) else {
            return HostScan::unreachable("Invalid URL");
        };
        let origin = origin_of(&url);

        let home = self.prober.probe(url.as_str(), &self.site_home).await;
        let extract = home.ok.then(|| ExtractionService::extract(&home.body));

        self.scan(&origin, extract.as_ref()).await
    }

    /// 依次检查候选路径，按路径顺序取第一个通过校验的结果
    async fn probe_paths<T, F>(&self, origin: &str, paths: &[&str], validate: F) -> PathOutcome<T>
    where
        F: Fn(&ProbeResult) -> Option<T>,
    {
        let urls: Vec<String> = paths.iter().map(|p| well_known_url(origin, p)).collect();
        let results = join_all(urls.iter().map(|u| self.prober.probe(u, &self.silent))).await;

        let mut all_failed = true;
        let mut last_error = None;
        for (url, result) in urls.into_iter().zip(results) {
            if result.ok {
                if let Some(value) = validate(&result) {
                    return PathOutcome::Found { url, value };
                }
            }
            if result.is_hard_failure() {
                last_error = result.error.clone();
            } else {
                all_failed = false;
            }
        }

        if all_failed {
            PathOutcome::Failed(last_error.unwrap_or_else(|| "Request failed".to_string()))
        } else {
            PathOutcome::NotFound
        }
    }

    async fn check_robots(&self, origin: &str) -> RobotsCheck {
        let outcome = self
            .probe_paths(origin, ROBOTS_PATHS, |r| {
                (!r.looks_like_html()).then(|| r.body.clone())
            })
            .await;

        match outcome {
            PathOutcome::Found { value, .. } => RobotsCheck {
                status: CheckStatus::Found,
                directives: parse_ai_directives(&value, origin),
                content: Some(truncate(&value, MAX_STORED_CONTENT)),
                error: None,
            },
            PathOutcome::NotFound => RobotsCheck::default(),
            PathOutcome::Failed(error) => RobotsCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_sitemap(&self, origin: &str) -> SitemapCheck {
        let outcome = self
            .probe_paths(origin, SITEMAP_PATHS, |r| {
                let body = r.body.as_str();
                (body.contains("<urlset") || body.contains("<sitemapindex")).then(|| {
                    let locs: Vec<String> = LOC_RE
                        .captures_iter(body)
                        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                        .collect();
                    locs
                })
            })
            .await;

        match outcome {
            PathOutcome::Found { url, value } => SitemapCheck {
                status: CheckStatus::Found,
                url: Some(url),
                url_count: value.len(),
                sitemap_urls: value.into_iter().take(MAX_SITEMAP_SAMPLE).collect(),
                error: None,
            },
            PathOutcome::NotFound => SitemapCheck::default(),
            PathOutcome::Failed(error) => SitemapCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_rss(&self, origin: &str) -> RssCheck {
        let outcome = self
            .probe_paths(origin, RSS_PATHS, |r| {
                is_feed_document(&r.body).then(|| FEED_ITEM_RE.find_iter(&r.body).count())
            })
            .await;

        match outcome {
            PathOutcome::Found { url, value } => RssCheck {
                status: CheckStatus::Found,
                url: Some(url),
                item_count: value,
                error: None,
            },
            PathOutcome::NotFound => RssCheck::default(),
            PathOutcome::Failed(error) => RssCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_llms_txt(&self, origin: &str) -> LlmsTxtCheck {
        let outcome = self
            .probe_paths(origin, LLMS_TXT_PATHS, |r| {
                if r.content_type_lower().contains("text/html") || r.looks_like_html() {
                    return None;
                }
                let lower = r.body.to_lowercase();
                let relevant = LLMS_KEYWORDS.iter().any(|k| lower.contains(k));
                (r.body.trim().len() > 50 && relevant).then(|| r.body.clone())
            })
            .await;

        match outcome {
            PathOutcome::Found { value, .. } => LlmsTxtCheck {
                status: CheckStatus::Found,
                has_instructions: value.to_lowercase().contains("instruction"),
                content: Some(truncate(&value, MAX_STORED_CONTENT)),
                error: None,
            },
            PathOutcome::NotFound => LlmsTxtCheck::default(),
            PathOutcome::Failed(error) => LlmsTxtCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_ai_manifest(&self, origin: &str) -> AiManifestCheck {
        let outcome = self
            .probe_paths(origin, AI_MANIFEST_PATHS, parse_json_artifact)
            .await;

        match outcome {
            PathOutcome::Found { url, value } => AiManifestCheck {
                status: CheckStatus::Found,
                url: Some(url),
                version: value
                    .pointer("/api/version")
                    .and_then(value_to_string)
                    .or_else(|| value.get("version").and_then(value_to_string)),
                error: None,
            },
            PathOutcome::NotFound => AiManifestCheck::default(),
            PathOutcome::Failed(error) => AiManifestCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_mcp(&self, origin: &str) -> McpCheck {
        let outcome = self.probe_paths(origin, MCP_PATHS, parse_json_artifact).await;

        match outcome {
            PathOutcome::Found { url, value } => McpCheck {
                status: CheckStatus::Found,
                url: Some(url),
                tools: value
                    .get("tools")
                    .and_then(Value::as_array)
                    .map(|tools| {
                        tools
                            .iter()
                            .filter_map(|t| {
                                t.as_str()
                                    .or_else(|| t.get("name").and_then(Value::as_str))
                                    .map(str::to_string)
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                error: None,
            },
            PathOutcome::NotFound => McpCheck::default(),
            PathOutcome::Failed(error) => McpCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }

    async fn check_openapi(&self, origin: &str) -> OpenApiCheck {
        let outcome = self
            .probe_paths(origin, OPENAPI_PATHS, |r| {
                if r.content_type_lower().contains("text/html") || r.looks_like_html() {
                    return None;
                }
                let value: Value = serde_json::from_str(r.body.trim()).ok()?;
                let version = value.get("openapi").or_else(|| value.get("swagger"))?;
                Some(value_to_string(version).unwrap_or_default())
            })
            .await;

        match outcome {
            PathOutcome::Found { url, value } => OpenApiCheck {
                status: CheckStatus::Found,
                url: Some(url),
                version: (!value.is_empty()).then_some(value),
                error: None,
            },
            PathOutcome::NotFound => OpenApiCheck::default(),
            PathOutcome::Failed(error) => OpenApiCheck {
                status: CheckStatus::CheckFailed,
                error: Some(error),
                ..Default::default()
            },
        }
    }
}

fn json_ld_check(homepage: Option<&PageExtract>) -> JsonLdCheck {
    match homepage {
        Some(page) if !page.json_ld_types.is_empty() => JsonLdCheck {
            status: CheckStatus::Found,
            types: page.json_ld_types.clone(),
            schemas: page.json_ld_blocks.clone(),
            error: None,
        },
        Some(_) => JsonLdCheck::default(),
        None => JsonLdCheck {
            status: CheckStatus::CheckFailed,
            error: Some("Homepage could not be fetched".to_string()),
            ..Default::default()
        },
    }
}

/// JSON 制品：内容类型为 JSON 或纯文本，不是 HTML 错误页，且可解析为对象
fn parse_json_artifact(result: &ProbeResult) -> Option<Value> {
    let content_type = result.content_type_lower();
    if !(content_type.contains("application/json") || content_type.contains("text/plain")) {
        return None;
    }
    if result.looks_like_html() {
        return None;
    }
    let value: Value = serde_json::from_str(result.body.trim()).ok()?;
    value.is_object().then_some(value)
}

/// 是否包含 `<rss>`、`<feed>` 或 `<channel>` 标记
pub fn is_feed_document(body: &str) -> bool {
    FEED_MARKER_RE.is_match(body)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
#[path = "artifact_scanner_test.rs"]
mod tests;
