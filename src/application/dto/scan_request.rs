// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 扫描请求数据传输对象
///
/// 协议可省略，缺失时自动补全为 `https://`
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScanRequestDto {
    /// 目标站点地址
    #[validate(length(min = 1, max = 2048, message = "URL cannot be empty or longer than 2048 characters"))]
    pub url: String,
}
