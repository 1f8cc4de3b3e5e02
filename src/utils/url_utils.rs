// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 规范化用户输入的目标URL
///
/// 缺少协议时自动补全 `https://`；仅接受 http/https 且带主机名的地址。
pub fn normalize_target_url(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.contains("://") {
        return None;
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).ok()?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// 站点源地址（协议 + 主机 + 非默认端口），不带结尾斜杠
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// 去掉 `www.` 前缀的主机名，用于展示和同站判断
///
/// 非默认端口会保留在结果中，同一主机的不同端口视为不同站点
pub fn bare_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}

/// 源地址下的常见路径
pub fn well_known_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}
