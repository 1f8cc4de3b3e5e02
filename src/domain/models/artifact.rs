// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use serde_json::Value;

use crate::utils::robots::AiDirectives;

/// 制品检查状态
///
/// `Found` 要求抓取成功并且通过结构校验，仅有 HTTP 200 不足以判定存在。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Found,
    #[default]
    NotFound,
    /// 所有候选路径都因拦截、服务器错误或网络问题失败
    CheckFailed,
}

impl CheckStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, CheckStatus::Found)
    }
}

/// 制品种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    JsonLdSchema,
    RobotsTxt,
    Sitemap,
    RssFeed,
    LlmsTxt,
    AiManifest,
    McpConfig,
    OpenApi,
}

impl ArtifactKind {
    /// 全部 8 种制品，顺序与报告中的键一致
    pub const ALL: [ArtifactKind; 8] = [
        ArtifactKind::JsonLdSchema,
        ArtifactKind::RobotsTxt,
        ArtifactKind::Sitemap,
        ArtifactKind::RssFeed,
        ArtifactKind::LlmsTxt,
        ArtifactKind::AiManifest,
        ArtifactKind::McpConfig,
        ArtifactKind::OpenApi,
    ];

    /// 报告中使用的键名
    pub fn key(&self) -> &'static str {
        match self {
            ArtifactKind::JsonLdSchema => "jsonLdSchema",
            ArtifactKind::RobotsTxt => "robotsTxt",
            ArtifactKind::Sitemap => "sitemap",
            ArtifactKind::RssFeed => "rssFeed",
            ArtifactKind::LlmsTxt => "llmsTxt",
            ArtifactKind::AiManifest => "aiManifest",
            ArtifactKind::McpConfig => "mcpConfig",
            ArtifactKind::OpenApi => "openApi",
        }
    }
}

/// JSON-LD 结构化数据
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLdCheck {
    pub status: CheckStatus,
    /// 去重后的 `@type` 值
    pub types: Vec<String>,
    /// 成功解析的原始块
    pub schemas: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub directives: AiDirectives,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapCheck {
    pub status: CheckStatus,
    /// 命中的地址
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub url_count: usize,
    /// 前 10 个 `<loc>` 地址
    pub sitemap_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmsTxtCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub has_instructions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiManifestCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiCheck {
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `openapi` 或 `swagger` 字段的值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 单个主机的 8 项制品检查
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBundle {
    pub json_ld_schema: JsonLdCheck,
    pub robots_txt: RobotsCheck,
    pub sitemap: SitemapCheck,
    pub rss_feed: RssCheck,
    pub llms_txt: LlmsTxtCheck,
    pub ai_manifest: AiManifestCheck,
    pub mcp_config: McpCheck,
    pub open_api: OpenApiCheck,
}

impl ArtifactBundle {
    /// 指定制品的检查状态
    pub fn status(&self, kind: ArtifactKind) -> CheckStatus {
        match kind {
            ArtifactKind::JsonLdSchema => self.json_ld_schema.status,
            ArtifactKind::RobotsTxt => self.robots_txt.status,
            ArtifactKind::Sitemap => self.sitemap.status,
            ArtifactKind::RssFeed => self.rss_feed.status,
            ArtifactKind::LlmsTxt => self.llms_txt.status,
            ArtifactKind::AiManifest => self.ai_manifest.status,
            ArtifactKind::McpConfig => self.mcp_config.status,
            ArtifactKind::OpenApi => self.open_api.status,
        }
    }

    pub fn is_found(&self, kind: ArtifactKind) -> bool {
        self.status(kind).is_found()
    }

    /// 已发现的制品数量（0..=8）
    pub fn found_count(&self) -> usize {
        ArtifactKind::ALL
            .iter()
            .filter(|kind| self.is_found(**kind))
            .count()
    }

    /// 已发现制品占比（0..=100），四舍五入到整数
    pub fn found_percentage(&self) -> u32 {
        let total = ArtifactKind::ALL.len();
        ((self.found_count() * 100 + total / 2) / total) as u32
    }

    /// 主机不可探测（例如未通过地址安全检查）时的检查表
    pub fn unreachable(reason: &str) -> Self {
        let error = Some(reason.to_string());
        let status = CheckStatus::CheckFailed;
        Self {
            json_ld_schema: JsonLdCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            robots_txt: RobotsCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            sitemap: SitemapCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            rss_feed: RssCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            llms_txt: LlmsTxtCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            ai_manifest: AiManifestCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            mcp_config: McpCheck {
                status,
                error: error.clone(),
                ..Default::default()
            },
            open_api: OpenApiCheck {
                status,
                error,
                ..Default::default()
            },
        }
    }
}

/// 单个主机的完整扫描结果
#[derive(Debug, Clone, Default)]
pub struct HostScan {
    pub artifacts: ArtifactBundle,
    /// 任一制品存在、首页抓取成功或 robots 探测未硬失败
    pub crawl_success: bool,
}

impl HostScan {
    pub fn unreachable(reason: &str) -> Self {
        Self {
            artifacts: ArtifactBundle::unreachable(reason),
            crawl_success: false,
        }
    }
}
