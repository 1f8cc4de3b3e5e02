// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括探测重试策略、robots.txt 解析、生成文本的 JSON 提取、URL 处理和遥测等功能
pub mod json_extract;
pub mod retry_policy;
pub mod robots;
pub mod telemetry;
pub mod url_utils;
pub mod validators;
