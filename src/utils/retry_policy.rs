// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use crate::config::settings::ProbeSettings;

/// 探测模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// 主抓取：用于首页，预算充足
    Main,
    /// 静默探测：用于常见路径检查，预算紧凑
    Silent,
}

impl ProbeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeMode::Main => "main",
            ProbeMode::Silent => "silent",
        }
    }
}

/// 探测重试策略
///
/// 所有探测调用共享同一种策略：按身份池轮换尝试，每次尝试有独立的超时，
/// 仅当状态码命中可重试集合时才会换用下一个身份。重试是立即进行的，
/// 不做退避。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 探测模式
    pub mode: ProbeMode,
    /// 最大尝试次数（即最多使用的身份数）
    pub max_attempts: u32,
    /// 单次尝试超时
    pub timeout: Duration,
    /// 触发身份轮换的状态码
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::silent(&ProbeSettings::default())
    }
}

impl RetryPolicy {
    /// 创建主抓取策略（首页）
    pub fn main_fetch(settings: &ProbeSettings) -> Self {
        Self {
            mode: ProbeMode::Main,
            max_attempts: settings.main_attempts.max(1),
            timeout: Duration::from_millis(settings.main_timeout_ms),
            retryable_statuses: settings.retryable_statuses.clone(),
        }
    }

    /// 创建静默探测策略（常见路径）
    pub fn silent(settings: &ProbeSettings) -> Self {
        Self {
            mode: ProbeMode::Silent,
            max_attempts: settings.silent_attempts.clamp(1, 2),
            timeout: Duration::from_millis(settings.silent_timeout_ms),
            retryable_statuses: settings.retryable_statuses.clone(),
        }
    }

    /// 以新的超时复制策略
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 以新的尝试次数复制策略
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// 是否还可以进行下一次尝试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 状态码是否应该触发身份轮换
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// 第 `attempt` 次尝试使用的身份
    pub fn identity<'a>(&self, pool: &'a [String], attempt: u32) -> Option<&'a str> {
        if pool.is_empty() {
            return None;
        }
        Some(pool[attempt as usize % pool.len()].as_str())
    }
}
