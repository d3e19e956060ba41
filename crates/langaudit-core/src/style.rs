//! 样式与表情统计（CSS 自定义属性、硬编码颜色、按钮变体、emoji、标记检查）
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::counters::count_literal;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{3,8}").expect("valid hex color regex"));

/// 与 emoji 判定等价的码点区间
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F),
    (0x1F300, 0x1F5FF),
    (0x1F680, 0x1F6FF),
    (0x1F1E0, 0x1F1FF),
    (0x2700, 0x27BF),
    (0x1F900, 0x1F9FF),
    (0x1FA00, 0x1FA6F),
    (0x1FA70, 0x1FAFF),
    (0x2600, 0x26FF),
    (0xFE00, 0xFE0F),
    (0x200D, 0x200D),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x2934, 0x2935),
    (0x25AA, 0x25FE),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2191, 0x2191),
    (0x2193, 0x2193),
];

/// 去重 emoji 最多展示的个数
pub const UNIQUE_EMOJI_LIMIT: usize = 50;

pub fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// 样式表统计结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssStats {
    pub var_refs: usize,
    pub hex_colors: usize,
    pub variants: Vec<NamedCount>,
}

pub fn css_stats(css: &str, variants: &[String]) -> CssStats {
    CssStats {
        var_refs: count_literal(css, "var(--"),
        hex_colors: HEX_COLOR.find_iter(css).count(),
        variants: variants
            .iter()
            .map(|v| NamedCount { name: v.clone(), count: count_literal(css, &format!(".{v}")) })
            .collect(),
    }
}

/// emoji 统计：总字符数 + 按首次出现顺序去重
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiStats {
    pub total: usize,
    pub unique: Vec<char>,
}

pub fn emoji_stats(text: &str) -> EmojiStats {
    let mut total = 0;
    let mut unique = Vec::new();
    for c in text.chars().filter(|&c| is_emoji(c)) {
        total += 1;
        if unique.len() < UNIQUE_EMOJI_LIMIT && !unique.contains(&c) {
            unique.push(c);
        }
    }
    EmojiStats { total, unique }
}

/// 标记检查方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMode {
    /// 任一字面量出现即为真
    #[default]
    Present,
    /// 所有字面量出现次数之和
    Count,
}

/// 单条标记检查
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCheck {
    pub label: String,
    pub any_of: Vec<String>,
    #[serde(default)]
    pub mode: MarkerMode,
}

impl MarkerCheck {
    pub fn present(label: impl Into<String>, any_of: &[&str]) -> Self {
        Self { label: label.into(), any_of: any_of.iter().map(|s| s.to_string()).collect(), mode: MarkerMode::Present }
    }

    pub fn count(label: impl Into<String>, literal: &str) -> Self {
        Self { label: label.into(), any_of: vec![literal.to_string()], mode: MarkerMode::Count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarkerValue {
    Present(bool),
    Count(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerResult {
    pub label: String,
    pub value: MarkerValue,
}

pub fn marker_checks(text: &str, checks: &[MarkerCheck]) -> Vec<MarkerResult> {
    checks
        .iter()
        .map(|check| {
            let value = match check.mode {
                MarkerMode::Present => MarkerValue::Present(check.any_of.iter().any(|m| text.contains(m.as_str()))),
                MarkerMode::Count => MarkerValue::Count(check.any_of.iter().map(|m| count_literal(text, m)).sum()),
            };
            MarkerResult { label: check.label.clone(), value }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_counts() {
        let css = ":root { --c: #fff; }\n.btn-filled { color: var(--c); background: #12ab34; }\n.btn-filled:hover { border: var(--b); }";
        let stats = css_stats(css, &["btn-filled".to_string(), "btn-text".to_string()]);
        assert_eq!(stats.var_refs, 2);
        assert_eq!(stats.hex_colors, 2);
        assert_eq!(stats.variants[0], NamedCount { name: "btn-filled".to_string(), count: 2 });
        assert_eq!(stats.variants[1].count, 0);
    }

    #[test]
    fn emoji_total_and_unique_order() {
        let stats = emoji_stats("✨ 저장 ✅ 완료 ✨ 😀 ↑ abc");
        assert_eq!(stats.total, 5);
        assert_eq!(stats.unique, vec!['✨', '✅', '😀', '↑']);
        assert_eq!(emoji_stats("plain text 한글").total, 0);
    }

    #[test]
    fn markers_presence_and_count() {
        let html = r#"<div id="tab-diary"></div><span class="material-symbols-outlined">add</span>"#;
        let checks = vec![
            MarkerCheck::present("tab-diary div", &[r#"id="tab-diary""#, "id='tab-diary'"]),
            MarkerCheck::count("material-symbols", "material-symbols"),
            MarkerCheck::present("onboarding-step-1 template", &["onboarding-step-1"]),
        ];
        let results = marker_checks(html, &checks);
        assert_eq!(results[0].value, MarkerValue::Present(true));
        assert_eq!(results[1].value, MarkerValue::Count(1));
        assert_eq!(results[2].value, MarkerValue::Present(false));
    }
}
