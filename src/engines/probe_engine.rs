// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ProbeSettings;
use crate::engines::traits::{ProbeFailure, ProbeResult, Prober};
use crate::utils::retry_policy::{ProbeMode, RetryPolicy};
use crate::utils::validators::is_private_ip_literal;
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, Client, Response};
use tracing::debug;

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (compatible; agentready/1.0)";
const MAX_REDIRECTS: usize = 10;

/// 单次尝试的结果
enum Attempt {
    /// 终态结果，直接返回
    Done(ProbeResult),
    /// 命中可重试状态码，换下一个身份
    Rotate(u16),
}

/// 探测引擎
///
/// 基于reqwest实现的身份轮换探测器：
/// - 每次尝试使用身份池中的下一个 User-Agent
/// - 每次尝试（发送 + 读取响应体）都受超时预算约束，超时即取消
/// - 403/429 立即换身份重试；其它非 2xx 读空响应体后直接返回失败
/// - DNS/连接/超时错误进入下一次尝试
pub struct ReqwestProber {
    client: Client,
    user_agents: Vec<String>,
    max_body_bytes: usize,
}

impl ReqwestProber {
    /// 创建探测引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 探测配置（身份池与响应体上限）
    pub fn new(settings: &ProbeSettings) -> anyhow::Result<Self> {
        Self::build(settings, false)
    }

    /// 创建拒绝跳转到私有地址的探测引擎
    ///
    /// 重定向链中跳到其它主机且该主机是字面量私有 IP 或 localhost 时，该次请求失败。
    /// 起点主机已由扫描入口的主机检查覆盖。
    pub fn guarded(settings: &ProbeSettings) -> anyhow::Result<Self> {
        Self::build(settings, true)
    }

    fn build(settings: &ProbeSettings, block_private_redirects: bool) -> anyhow::Result<Self> {
        let client = Client::builder()
            .redirect(redirect_policy(block_private_redirects))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            user_agents: settings.user_agents.clone(),
            max_body_bytes: settings.max_body_bytes,
        })
    }

    async fn attempt(
        &self,
        url: &str,
        user_agent: &str,
        policy: &RetryPolicy,
    ) -> Result<Attempt, reqwest::Error> {
        let accept = match policy.mode {
            ProbeMode::Main => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ProbeMode::Silent => "*/*",
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, accept)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if status.is_success() {
            let body = read_limited(response, self.max_body_bytes).await?;
            return Ok(Attempt::Done(ProbeResult::success(
                status.as_u16(),
                content_type,
                body,
            )));
        }

        // Always consume the body so the connection can be reused
        let _ = read_limited(response, self.max_body_bytes).await;

        if policy.is_retryable_status(status.as_u16()) {
            return Ok(Attempt::Rotate(status.as_u16()));
        }

        let failure = if status.as_u16() == 404 {
            ProbeFailure::NotFound
        } else {
            ProbeFailure::HttpStatus
        };
        let mut result = ProbeResult::failed(
            failure,
            status.as_u16(),
            format!("HTTP {}", status.as_u16()),
        );
        result.content_type = content_type;
        Ok(Attempt::Done(result))
    }
}

fn redirect_policy(block_private: bool) -> redirect::Policy {
    if !block_private {
        return redirect::Policy::limited(MAX_REDIRECTS);
    }
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if leaves_origin_host(attempt.previous(), attempt.url())
            && is_private_ip_literal(attempt.url())
        {
            let target = attempt.url().to_string();
            attempt.error(format!("redirect to private address {} blocked", target))
        } else {
            attempt.follow()
        }
    })
}

/// 跳转目标的主机是否不同于请求链起点
fn leaves_origin_host(previous: &[reqwest::Url], next: &reqwest::Url) -> bool {
    previous
        .first()
        .map_or(true, |origin| origin.host() != next.host())
}

/// 读取响应体，超过上限的部分被丢弃
async fn read_limited(mut response: Response, limit: usize) -> Result<String, reqwest::Error> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = limit.saturating_sub(buf.len());
        if remaining == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[async_trait]
impl Prober for ReqwestProber {
    /// 执行探测
    ///
    /// # 参数
    ///
    /// * `url` - 目标地址
    /// * `policy` - 重试策略（身份数、超时、可重试状态码）
    ///
    /// # 返回值
    ///
    /// 总是返回 `ProbeResult`，失败信息写在 `failure`/`error` 字段中
    async fn probe(&self, url: &str, policy: &RetryPolicy) -> ProbeResult {
        let mut last: Option<ProbeResult> = None;
        let mut attempt = 0;

        while policy.should_retry(attempt) {
            let user_agent = policy
                .identity(&self.user_agents, attempt)
                .unwrap_or(FALLBACK_USER_AGENT);
            attempt += 1;
            counter!("probe_attempts_total", "mode" => policy.mode.as_str()).increment(1);

            match tokio::time::timeout(policy.timeout, self.attempt(url, user_agent, policy)).await
            {
                Ok(Ok(Attempt::Done(result))) => {
                    debug!(url, status = result.status, ok = result.ok, "probe finished");
                    return result;
                }
                Ok(Ok(Attempt::Rotate(status))) => {
                    counter!("probe_blocked_total").increment(1);
                    debug!(url, status, attempt, "probe blocked, rotating identity");
                    last = Some(ProbeResult::failed(
                        ProbeFailure::Blocked,
                        status,
                        format!("HTTP {}", status),
                    ));
                }
                Ok(Err(e)) => {
                    debug!(url, attempt, error = %e, "probe network error");
                    last = Some(ProbeResult::failed(ProbeFailure::Network, 0, e.to_string()));
                }
                Err(_) => {
                    debug!(url, attempt, timeout_ms = policy.timeout.as_millis() as u64, "probe timed out");
                    last = Some(ProbeResult::failed(
                        ProbeFailure::Timeout,
                        0,
                        format!("timed out after {}ms", policy.timeout.as_millis()),
                    ));
                }
            }
        }

        last.unwrap_or_else(|| ProbeResult::failed(ProbeFailure::Network, 0, "no attempts made"))
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "probe_engine_test.rs"]
mod tests;
