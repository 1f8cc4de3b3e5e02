// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Serialize;

use crate::utils::retry_policy::RetryPolicy;

/// 探测失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    /// HTTP 404
    NotFound,
    /// 所有身份都被 403/429 拒绝
    Blocked,
    /// 其它非 2xx 状态
    HttpStatus,
    /// DNS、连接或读取错误
    Network,
    /// 超过单次尝试的取消预算
    Timeout,
}

/// 探测结果
///
/// 网络失败是数据而不是异常：任何探测都会得到一个 `ProbeResult`。
#[derive(Debug, Clone, Default)]
pub struct ProbeResult {
    /// 是否获得 2xx 响应
    pub ok: bool,
    /// HTTP 状态码，网络层失败时为 0
    pub status: u16,
    /// 响应内容类型（可能为空）
    pub content_type: String,
    /// 响应体，仅在成功时读取
    pub body: String,
    /// 失败描述
    pub error: Option<String>,
    /// 失败类别
    pub failure: Option<ProbeFailure>,
}

impl ProbeResult {
    /// 成功结果
    pub fn success(status: u16, content_type: String, body: String) -> Self {
        Self {
            ok: true,
            status,
            content_type,
            body,
            error: None,
            failure: None,
        }
    }

    /// 失败结果
    pub fn failed(failure: ProbeFailure, status: u16, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            content_type: String::new(),
            body: String::new(),
            error: Some(error.into()),
            failure: Some(failure),
        }
    }

    /// 是否为明确的 404
    pub fn is_not_found(&self) -> bool {
        self.failure == Some(ProbeFailure::NotFound)
    }

    /// 是否为 404 以外的失败（被拦截、服务器错误、网络错误、超时）
    pub fn is_hard_failure(&self) -> bool {
        !self.ok && !self.is_not_found()
    }

    /// 小写的内容类型
    pub fn content_type_lower(&self) -> String {
        self.content_type.to_ascii_lowercase()
    }

    /// 响应体是否看起来是一个 HTML 文档
    pub fn looks_like_html(&self) -> bool {
        looks_like_html(&self.body)
    }
}

/// 判断文本是否以 HTML 文档开头
pub fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(15).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// 网络探测器特质
///
/// 实现必须永不返回错误：超时、拦截与网络故障都折叠进 `ProbeResult`。
#[async_trait]
pub trait Prober: Send + Sync {
    /// 按策略探测 URL
    async fn probe(&self, url: &str, policy: &RetryPolicy) -> ProbeResult;

    /// 探测器名称
    fn name(&self) -> &'static str;
}
