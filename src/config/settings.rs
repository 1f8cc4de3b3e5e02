// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// 应用程序配置设置
///
/// 包含服务器、探测、扫描、评分、基准和智能服务等所有配置项。
/// 所有配置在启动时加载一次，随后以 `Arc<Settings>` 的形式注入到扫描流水线中。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerSettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// 网络探测配置
    #[serde(default)]
    pub probe: ProbeSettings,
    /// 扫描行为配置
    #[serde(default)]
    pub scan: ScanSettings,
    /// 评分权重配置
    #[serde(default)]
    pub scoring: ScoringSettings,
    /// 基准站点与行业基准配置
    #[serde(default)]
    pub benchmarks: BenchmarkSettings,
    /// 文本生成服务配置
    #[serde(default)]
    pub llm: LlmSettings,
    /// 搜索增强生成服务配置
    #[serde(default)]
    pub grounding: GroundingSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen: String,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "0.0.0.0:9000".to_string(),
        }
    }
}

/// 网络探测配置
///
/// 主抓取（首页）与静默探测（常见路径）使用不同的预算
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// 轮换使用的浏览器身份（User-Agent）
    pub user_agents: Vec<String>,
    /// 主抓取最多尝试的身份数
    pub main_attempts: u32,
    /// 主抓取单次尝试超时（毫秒）
    pub main_timeout_ms: u64,
    /// 静默探测最多尝试的身份数
    pub silent_attempts: u32,
    /// 静默探测单次尝试超时（毫秒）
    pub silent_timeout_ms: u64,
    /// 预扫描首页可达性探测超时（毫秒）
    pub prescan_home_timeout_ms: u64,
    /// 预扫描端点探测超时（毫秒）
    pub prescan_endpoint_timeout_ms: u64,
    /// 竞争对手与参考站点首页的尝试次数
    pub site_home_attempts: u32,
    /// 竞争对手与参考站点首页的单次超时（毫秒）
    pub site_home_timeout_ms: u64,
    /// 响应体读取上限（字节）
    pub max_body_bytes: usize,
    /// 触发身份轮换的 HTTP 状态码
    pub retryable_statuses: Vec<u16>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15".to_string(),
            ],
            main_attempts: 3,
            main_timeout_ms: 10_000,
            silent_attempts: 2,
            silent_timeout_ms: 5_000,
            prescan_home_timeout_ms: 4_000,
            prescan_endpoint_timeout_ms: 2_500,
            site_home_attempts: 2,
            site_home_timeout_ms: 6_000,
            max_body_bytes: 5 * 1024 * 1024,
            retryable_statuses: vec![403, 429],
        }
    }
}

/// 扫描行为配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// 是否拒绝解析到私有地址的主机（SSRF 防护）
    pub block_private_hosts: bool,
    /// 竞争对手数量上限
    pub max_competitors: usize,
    /// 触发内容分析所需的最少正文字符数
    pub min_content_chars: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            block_private_hosts: true,
            max_competitors: 5,
            min_content_chars: 100,
        }
    }
}

/// 评分权重配置
///
/// 默认值即产品当前使用的经验常数，可按需校准
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub json_ld_base: u32,
    pub json_ld_per_type: u32,
    pub json_ld_cap: u32,
    pub robots_found: u32,
    pub robots_ai_directives: u32,
    pub sitemap_found: u32,
    pub sitemap_large: u32,
    /// 视为“大型站点地图”的 URL 数量阈值（严格大于）
    pub sitemap_large_threshold: usize,
    pub rss_found: u32,
    pub llms_txt_found: u32,
    pub ai_manifest_found: u32,
    pub mcp_config_found: u32,
    pub open_api_found: u32,
    /// 内容缺口分数的最大加分
    pub content_gap_max: u32,
    /// 总分上限
    pub max_score: u32,
    /// 竞争对手或参考站点被视为可信比较对象所需的最少制品数
    pub benchmark_min_artifacts: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            json_ld_base: 5,
            json_ld_per_type: 3,
            json_ld_cap: 20,
            robots_found: 5,
            robots_ai_directives: 5,
            sitemap_found: 5,
            sitemap_large: 5,
            sitemap_large_threshold: 10,
            rss_found: 5,
            llms_txt_found: 15,
            ai_manifest_found: 10,
            mcp_config_found: 10,
            open_api_found: 10,
            content_gap_max: 10,
            max_score: 100,
            benchmark_min_artifacts: 4,
        }
    }
}

/// 参考站点
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceSite {
    pub name: String,
    pub url: String,
    pub description: String,
    pub reason: String,
}

/// 行业分数基准
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndustryBenchmark {
    pub average: u32,
    pub top25: u32,
    pub top10: u32,
}

/// 基准配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// 无合格竞争对手时依次尝试的参考站点
    pub reference_sites: Vec<ReferenceSite>,
    /// 行业 -> 分数基准
    pub industries: HashMap<String, IndustryBenchmark>,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        let reference_sites = vec![
            ReferenceSite {
                name: "Stripe".to_string(),
                url: "https://stripe.com".to_string(),
                description: "Payment processing platform with excellent technical SEO and AI readiness".to_string(),
                reason: "Industry leader in developer experience and technical documentation".to_string(),
            },
            ReferenceSite {
                name: "Vercel".to_string(),
                url: "https://vercel.com".to_string(),
                description: "Cloud platform for frontend developers with strong AI optimization".to_string(),
                reason: "Known for excellent structured data and modern web practices".to_string(),
            },
            ReferenceSite {
                name: "GitHub".to_string(),
                url: "https://github.com".to_string(),
                description: "Code hosting platform with comprehensive technical artifacts".to_string(),
                reason: "Industry standard for developer tools with extensive schema markup".to_string(),
            },
        ];

        let industries = [
            ("ecommerce", 42, 68, 85),
            ("saas", 51, 72, 88),
            ("media", 38, 61, 79),
            ("local_business", 28, 52, 71),
            ("general", 35, 58, 78),
        ]
        .into_iter()
        .map(|(name, average, top25, top10)| {
            (
                name.to_string(),
                IndustryBenchmark {
                    average,
                    top25,
                    top10,
                },
            )
        })
        .collect();

        Self {
            reference_sites,
            industries,
        }
    }
}

impl BenchmarkSettings {
    /// 查找行业基准，未知行业回退到 `general`
    pub fn for_industry(&self, industry: &str) -> IndustryBenchmark {
        self.industries
            .get(industry)
            .or_else(|| self.industries.get("general"))
            .copied()
            .unwrap_or(IndustryBenchmark {
                average: 35,
                top25: 58,
                top10: 78,
            })
    }
}

/// 文本生成服务配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API 密钥
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// API 基础地址
    pub api_base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

/// 搜索增强生成服务配置（Gemini generateContent + google_search 工具）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroundingSettings {
    /// API 密钥
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// API 基础地址
    pub api_base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for GroundingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `AGENTREADY__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::from_sources(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{}", env)).required(false)),
        )
    }

    /// 从指定配置文件加载（主要用于测试与命令行覆盖）
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::from_sources(Config::builder().add_source(File::with_name(path).required(true)))
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(
                Environment::with_prefix("AGENTREADY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
