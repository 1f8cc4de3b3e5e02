// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与外部系统的交互。
/// 目前只包含指标（metrics）：Prometheus 导出器的安装与指标描述。
pub mod metrics;
