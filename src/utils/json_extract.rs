// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// 从自由文本中尽力提取 JSON 值
///
/// 生成服务返回的文本可能被 Markdown 代码块或说明文字包裹。
/// 依次尝试：去掉代码块标记后整体解析；定位第一个括号平衡的 JSON 对象或数组并解析。
/// 永不 panic，失败时返回 `None`。
pub fn extract_json_value(text: &str) -> Option<Value> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let mut search_from = 0;
    while let Some(offset) = cleaned[search_from..].find(['{', '[']) {
        let start = search_from + offset;
        if let Some(end) = balanced_end(&cleaned[start..]) {
            let candidate = &cleaned[start..start + end];
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return Some(value);
            }
        }
        search_from = start + 1;
    }

    None
}

/// 提取并反序列化为指定类型，失败时返回类型默认值
pub fn decode_or_default<T>(text: &str) -> T
where
    T: DeserializeOwned + Default,
{
    decode(text).unwrap_or_default()
}

/// 提取并反序列化为指定类型，显式的 `null` 按缺失字段处理
pub fn decode<T>(text: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let mut value = extract_json_value(text)?;
    strip_nulls(&mut value);
    serde_json::from_value(value).ok()
}

/// 递归删除对象中值为 `null` 的键
///
/// 生成服务常把未知字段写成 `null`，而 `#[serde(default)]` 只处理缺失的键。
/// 删除后这些字段回落为结构体声明的默认值，`Option` 字段仍为 `None`。
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// 去掉首尾的 Markdown 代码块标记
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the language tag on the opening fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// 返回从首字符开始的平衡 JSON 片段长度（字节），会跳过字符串字面量中的括号
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
