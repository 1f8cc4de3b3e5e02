// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::models::report::{ContentInfo, Headings};

/// 首页提取结果
#[derive(Debug, Clone, Default)]
pub struct PageExtract {
    /// 去重后的 JSON-LD `@type`
    pub json_ld_types: Vec<String>,
    /// 成功解析的 JSON-LD 块
    pub json_ld_blocks: Vec<Value>,
    /// name/property -> content
    pub meta_tags: BTreeMap<String, String>,
    pub headings: Headings,
    pub title: String,
    /// 可见正文，用于内容分析
    pub text: String,
}

impl PageExtract {
    /// 生成报告中的内容概览，标题和描述回退到 Open Graph 标签
    pub fn content_info(&self) -> ContentInfo {
        let title = if self.title.is_empty() {
            self.meta_tags.get("og:title").cloned().unwrap_or_default()
        } else {
            self.title.clone()
        };
        let description = self
            .meta_tags
            .get("description")
            .or_else(|| self.meta_tags.get("og:description"))
            .cloned()
            .unwrap_or_default();

        ContentInfo {
            title,
            description,
            headings: self.headings.clone(),
            meta_tag_count: self.meta_tags.len(),
        }
    }
}

/// 提取服务
///
/// 负责从首页 HTML 中提取结构化数据、元标签与标题层级
pub struct ExtractionService;

impl ExtractionService {
    /// 提取数据
    ///
    /// 单个 JSON-LD 块解析失败只会被跳过，不影响其它块
    pub fn extract(html_content: &str) -> PageExtract {
        let document = Html::parse_document(html_content);

        let (json_ld_types, json_ld_blocks) = Self::extract_json_ld(&document);

        PageExtract {
            json_ld_types,
            json_ld_blocks,
            meta_tags: Self::extract_meta_tags(&document),
            headings: Headings {
                h1: Self::select_texts(&document, "h1"),
                h2: Self::select_texts(&document, "h2"),
                h3: Self::select_texts(&document, "h3"),
            },
            title: Self::select_texts(&document, "title")
                .into_iter()
                .next()
                .unwrap_or_default(),
            text: Self::visible_text(&document),
        }
    }

    fn extract_json_ld(document: &Html) -> (Vec<String>, Vec<Value>) {
        let mut types = Vec::new();
        let mut blocks = Vec::new();

        let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
            return (types, blocks);
        };

        for element in document.select(&selector) {
            let raw = element.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => {
                    collect_types(&value, &mut types);
                    blocks.push(value);
                }
                Err(e) => {
                    tracing::debug!("Skipping malformed JSON-LD block: {}", e);
                }
            }
        }

        (types, blocks)
    }

    fn extract_meta_tags(document: &Html) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        let Ok(selector) = Selector::parse("meta") else {
            return tags;
        };

        for element in document.select(&selector) {
            let attrs = element.value();
            let key = attrs.attr("name").or_else(|| attrs.attr("property"));
            if let (Some(key), Some(content)) = (key, attrs.attr("content")) {
                tags.insert(key.to_string(), content.to_string());
            }
        }

        tags
    }

    /// 选择元素的文本，嵌套标签被去除、空白被折叠
    fn select_texts(document: &Html, selector: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        document
            .select(&selector)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn visible_text(document: &Html) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for node in document.root_element().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value().as_element().is_some_and(|e| {
                    matches!(e.name(), "script" | "style" | "noscript" | "head" | "template")
                })
            });
            let text = text.trim();
            if !hidden && !text.is_empty() {
                parts.push(text);
            }
        }
        collapse_whitespace(&parts.join(" "))
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 收集 `@type`，包括数组形式与 `@graph` 中的嵌套项
fn collect_types(value: &Value, types: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => push_unique(types, t),
                Some(Value::Array(ts)) => {
                    for t in ts.iter().filter_map(Value::as_str) {
                        push_unique(types, t);
                    }
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn push_unique(types: &mut Vec<String>, t: &str) {
    let t = t.trim();
    if !t.is_empty() && !types.iter().any(|existing| existing == t) {
        types.push(t.to_string());
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
