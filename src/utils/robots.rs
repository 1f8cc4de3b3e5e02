// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use robotstxt::DefaultMatcher;
use serde::Serialize;
use std::collections::BTreeMap;

/// 常见的 AI 爬虫身份
pub const AI_CRAWLERS: &[&str] = &[
    "GPTBot",
    "ChatGPT-User",
    "ClaudeBot",
    "Claude-Web",
    "Google-Extended",
    "PerplexityBot",
    "CCBot",
];

/// robots.txt 中针对 AI 爬虫的指令摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDirectives {
    /// 是否存在名称包含 "ai" 或 "gpt" 的 User-agent 块
    pub has_ai_directives: bool,
    /// 被禁止路径的 AI 块摘要
    pub blocked_bots: Vec<String>,
    /// 被允许路径的 AI 块摘要
    pub allowed_bots: Vec<String>,
    /// 是否声明了 Sitemap
    pub has_sitemap: bool,
    /// 是否包含任何 Disallow 指令
    pub has_disallow: bool,
    /// 各已知 AI 爬虫对根路径的访问权限
    pub ai_crawler_access: BTreeMap<String, bool>,
}

/// 当前正在解析的 User-agent 块
struct AgentBlock {
    user_agent: String,
    disallows: Vec<String>,
    allows: Vec<String>,
}

impl AgentBlock {
    fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            disallows: Vec::new(),
            allows: Vec::new(),
        }
    }

    fn targets_ai(&self) -> bool {
        let agent = self.user_agent.to_lowercase();
        agent.contains("ai") || agent.contains("gpt")
    }

    /// 将已结束的块写入摘要
    fn flush_into(self, directives: &mut AiDirectives) {
        if !self.targets_ai() {
            return;
        }
        directives.has_ai_directives = true;
        if !self.disallows.is_empty() {
            directives.blocked_bots.push(format!(
                "{} (Disallowed: {})",
                self.user_agent,
                self.disallows.join(", ")
            ));
        }
        if !self.allows.is_empty() {
            directives.allowed_bots.push(format!(
                "{} (Allowed: {})",
                self.user_agent,
                self.allows.join(", ")
            ));
        }
    }
}

/// 去掉指令名前缀（大小写不敏感），返回去除空白后的值
fn directive_value<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let head = line.get(..directive.len())?;
    if head.eq_ignore_ascii_case(directive) {
        Some(line[directive.len()..].trim())
    } else {
        None
    }
}

/// 逐行解析 robots.txt，提取 AI 相关指令
///
/// 解析器跟踪“当前 User-agent 块”，每遇到新的 `User-agent:` 行就结算上一个块：
/// 如果该块的代理名称包含 "ai" 或 "gpt"（大小写不敏感），记录其允许/禁止路径。
///
/// # 参数
///
/// * `content` - robots.txt 原文
/// * `origin` - 站点源地址，用于评估已知 AI 爬虫的访问权限
pub fn parse_ai_directives(content: &str, origin: &str) -> AiDirectives {
    let lower = content.to_lowercase();
    let mut directives = AiDirectives {
        has_sitemap: lower.contains("sitemap:"),
        has_disallow: lower.contains("disallow:"),
        ..Default::default()
    };

    let mut current: Option<AgentBlock> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(agent) = directive_value(line, "user-agent:") {
            if let Some(block) = current.take() {
                block.flush_into(&mut directives);
            }
            current = Some(AgentBlock::new(agent));
        } else if let Some(path) = directive_value(line, "disallow:") {
            if let Some(block) = current.as_mut() {
                block.disallows.push(path.to_string());
            }
        } else if let Some(path) = directive_value(line, "allow:") {
            if let Some(block) = current.as_mut() {
                block.allows.push(path.to_string());
            }
        }
    }

    if let Some(block) = current.take() {
        block.flush_into(&mut directives);
    }

    let root = format!("{}/", origin.trim_end_matches('/'));
    for crawler in AI_CRAWLERS {
        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(content, crawler, &root);
        directives
            .ai_crawler_access
            .insert((*crawler).to_string(), allowed);
    }

    directives
}
