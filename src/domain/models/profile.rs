// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 公司画像
///
/// 每次扫描构建一次，之后只读，作为竞争对手发现的输入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub industry: String,
    pub services: Vec<String>,
    pub location: Option<Location>,
    pub target_market: String,
    pub unique_selling_points: Vec<String>,
    pub business_type: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            industry: "general".to_string(),
            services: Vec::new(),
            location: None,
            target_market: "general".to_string(),
            unique_selling_points: Vec::new(),
            business_type: "business".to_string(),
        }
    }
}

impl CompanyProfile {
    /// 生成服务不可用时的回退画像
    ///
    /// # 参数
    ///
    /// * `company_name` - NAP 名称或域名
    pub fn fallback(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            ..Default::default()
        }
    }

    /// 人类可读的位置描述，没有位置时为 `None`
    pub fn location_label(&self) -> Option<String> {
        let location = self.location.as_ref()?;
        let parts: Vec<&str> = [&location.city, &location.region, &location.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}
