// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::IpAddr;
use thiserror::Error;
use tokio::net::lookup_host;
use url::Url;

/// 主机安全检查失败的原因
#[derive(Debug, Error)]
pub enum HostGuardError {
    /// 主机指向本地或私有网络
    #[error("SSRF protection: {0}")]
    Private(String),
    /// 主机无法解析，属于网络层失败
    #[error("Could not resolve host {host}: {reason}")]
    Unresolvable { host: String, reason: String },
}

/// 验证 URL 是否安全 (防止 SSRF)
///
/// 检查解析后的 IP 是否为私有地址、环回地址、链路本地或组播地址。
/// 私有地址返回 [`HostGuardError::Private`]，DNS 失败返回 [`HostGuardError::Unresolvable`]。
pub async fn validate_public_host(url: &Url) -> Result<(), HostGuardError> {
    let host = url.host_str().ok_or_else(|| HostGuardError::Unresolvable {
        host: url.to_string(),
        reason: "missing host".to_string(),
    })?;

    if host.eq_ignore_ascii_case("localhost") {
        return Err(HostGuardError::Private(
            "localhost is not allowed".to_string(),
        ));
    }

    let port = url.port_or_known_default().unwrap_or(443);
    // IPv6 literals come back bracketed from host_str
    let addrs = lookup_host((host.trim_start_matches('[').trim_end_matches(']'), port))
        .await
        .map_err(|e| HostGuardError::Unresolvable {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(HostGuardError::Private(format!(
                "Private IP access is not allowed: {}",
                addr.ip()
            )));
        }
    }

    Ok(())
}

/// URL 的主机是否为字面量私有 IP，不做 DNS 解析
pub fn is_private_ip_literal(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Ipv4(ip)) => is_private_ip(IpAddr::V4(ip)),
        Some(url::Host::Ipv6(ip)) => is_private_ip(IpAddr::V6(ip)),
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => false,
    }
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private()
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_multicast()
                || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            // Unique Local Address (fc00::/7), Link-local (fe80::/10)
            ipv6.is_loopback()
                || ipv6.is_multicast()
                || ipv6.is_unspecified()
                || (ipv6.segments()[0] & 0xfe00) == 0xfc00
                || (ipv6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
