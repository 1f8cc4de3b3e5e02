// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use agentready::application::use_cases::scan_use_case::ScanUseCase;
use agentready::config::settings::{ReferenceSite, Settings};
use agentready::domain::models::competitor::SourceCitation;
use agentready::domain::services::llm_service::{ContentIntelligence, GroundedResponse};
use agentready::engines::probe_engine::ReqwestProber;
use agentready::engines::traits::Prober;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 可编程的内容智能替身
///
/// 通过提示词开头区分内容分析、公司画像与竞争对手搜索三类调用；
/// 未配置的调用返回错误，用于验证降级路径。
#[derive(Default, Clone)]
pub struct FakeIntelligence {
    pub analysis: Option<String>,
    pub profile: Option<String>,
    pub competitors: Option<String>,
    pub grounded: bool,
}

impl FakeIntelligence {
    pub fn new() -> Self {
        Self {
            analysis: Some(analysis_reply(70)),
            profile: Some(
                json!({
                    "companyName": "Acme Widgets",
                    "industry": "ecommerce",
                    "services": ["Widgets"],
                    "location": {"city": "Portland", "region": "OR", "country": "US"},
                    "targetMarket": "Hobbyists",
                    "uniqueSellingPoints": ["Handmade"],
                    "businessType": "online store"
                })
                .to_string(),
            ),
            competitors: Some("[]".to_string()),
            grounded: true,
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_competitors(mut self, competitors: serde_json::Value) -> Self {
        self.competitors = Some(format!("```json\n{}\n```", competitors));
        self
    }
}

#[async_trait]
impl ContentIntelligence for FakeIntelligence {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let reply = if prompt.starts_with("Analyze the following website content") {
            &self.analysis
        } else if prompt.starts_with("Build a structured business profile") {
            &self.profile
        } else {
            &self.competitors
        };
        reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("intelligence unavailable"))
    }

    async fn generate_grounded(&self, _prompt: &str) -> anyhow::Result<GroundedResponse> {
        if !self.grounded {
            return Err(anyhow::anyhow!("grounding unavailable"));
        }
        let text = self
            .competitors
            .clone()
            .ok_or_else(|| anyhow::anyhow!("intelligence unavailable"))?;
        Ok(GroundedResponse {
            text,
            citations: vec![SourceCitation {
                title: "Widget market overview".to_string(),
                uri: "https://news.example/widgets".to_string(),
            }],
        })
    }
}

pub fn analysis_reply(content_score: u32) -> String {
    json!({
        "topicRecognition": {
            "primaryTopic": "Widgets",
            "industry": "ecommerce",
            "contentType": "homepage",
            "keywords": ["widgets"]
        },
        "contentGap": {
            "missingTopics": ["Shipping policy"],
            "contentScore": content_score,
            "recommendations": ["Document shipping times"]
        },
        "napData": {"name": "Acme Widgets", "isComplete": true},
        "userQuestions": ["Do you ship abroad?"]
    })
    .to_string()
}

/// 测试配置：允许回环地址，缩短超时，参考站点由调用方指定
pub fn test_settings(reference_sites: Vec<ReferenceSite>) -> Settings {
    let mut settings = Settings::default();
    settings.scan.block_private_hosts = false;
    settings.probe.main_timeout_ms = 3_000;
    settings.probe.silent_timeout_ms = 2_000;
    settings.probe.site_home_timeout_ms = 2_000;
    settings.probe.prescan_home_timeout_ms = 2_000;
    settings.probe.prescan_endpoint_timeout_ms = 2_000;
    settings.benchmarks.reference_sites = reference_sites;
    settings
}

pub fn scan_use_case(settings: Settings, intelligence: FakeIntelligence) -> Arc<ScanUseCase> {
    let prober: Arc<dyn Prober> =
        Arc::new(ReqwestProber::new(&settings.probe).expect("Failed to build prober"));
    Arc::new(ScanUseCase::new(
        Arc::new(settings),
        prober,
        Arc::new(intelligence),
    ))
}

pub fn reference(name: &str, url: &str) -> ReferenceSite {
    ReferenceSite {
        name: name.to_string(),
        url: url.to_string(),
        description: format!("{} description", name),
        reason: "Known for strong machine-readable artifacts".to_string(),
    }
}

/// 未监听的回环端口，连接会被立即拒绝
pub fn closed_port_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

/// 基于 wiremock 的模拟站点
pub struct MockSite {
    pub server: MockServer,
}

impl MockSite {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub async fn serve(&self, route: &str, status: u16, mime: &str, body: impl Into<String>) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body.into(), mime))
            .mount(&self.server)
            .await;
    }

    pub async fn homepage(&self, json_ld_types: &[&str]) {
        self.serve("/", 200, "text/html; charset=utf-8", homepage_html(json_ld_types))
            .await;
    }

    pub async fn robots_with_ai_rules(&self) {
        self.serve(
            "/robots.txt",
            200,
            "text/plain",
            "User-agent: GPTBot\nDisallow: /private\n\nUser-agent: *\nAllow: /\n",
        )
        .await;
    }

    pub async fn sitemap(&self, url_count: usize) {
        let locs: String = (0..url_count)
            .map(|i| format!("<url><loc>{}/page-{}</loc></url>", self.url(), i))
            .collect();
        self.serve(
            "/sitemap.xml",
            200,
            "application/xml",
            format!(
                "<?xml version=\"1.0\"?><urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{}</urlset>",
                locs
            ),
        )
        .await;
    }

    pub async fn llms_txt(&self) {
        self.serve(
            "/llms.txt",
            200,
            "text/plain",
            "# Acme\n\n> Instructions for AI models and LLM agents reading this site.\n\n- [Catalog](/catalog)\n",
        )
        .await;
    }

    pub async fn feed(&self) {
        self.serve(
            "/feed",
            200,
            "application/rss+xml",
            "<rss version=\"2.0\"><channel><title>News</title><item><title>One</title></item><item><title>Two</title></item></channel></rss>",
        )
        .await;
    }

    /// 八项制品全部就绪的站点
    pub async fn fully_ready(&self) {
        self.homepage(&["Organization", "WebSite", "Product"]).await;
        self.robots_with_ai_rules().await;
        self.sitemap(15).await;
        self.llms_txt().await;
        self.feed().await;
        self.serve(
            "/.well-known/ai-manifest.json",
            200,
            "application/json",
            r#"{"name": "Acme", "api": {"version": "1.2"}}"#,
        )
        .await;
        self.serve(
            "/.well-known/mcp.json",
            200,
            "application/json",
            r#"{"tools": [{"name": "search"}, "checkout"]}"#,
        )
        .await;
        self.serve(
            "/openapi.json",
            200,
            "application/json",
            r#"{"openapi": "3.1.0", "paths": {}}"#,
        )
        .await;
    }
}

pub fn homepage_html(json_ld_types: &[&str]) -> String {
    let json_ld = if json_ld_types.is_empty() {
        String::new()
    } else {
        let items: Vec<serde_json::Value> = json_ld_types
            .iter()
            .map(|t| json!({"@context": "https://schema.org", "@type": t, "name": "Acme"}))
            .collect();
        format!(
            "<script type=\"application/ld+json\">{}</script>",
            serde_json::Value::Array(items)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Acme Widgets</title>
  <meta name="description" content="Handmade widgets shipped worldwide">
  {json_ld}
</head>
<body>
  <h1>Acme Widgets</h1>
  <h2>Our catalog</h2>
  <p>Acme builds handmade widgets for hobbyists and makers. Every widget is assembled by hand
  in our Portland workshop and shipped worldwide within two business days.</p>
</body>
</html>"#,
        json_ld = json_ld
    )
}
