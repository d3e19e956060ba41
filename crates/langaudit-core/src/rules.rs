//! 审计配置（TOML），默认值即内置的整套审计
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::classifier::{BlockRule, LineClassifier, LinePredicate, LineRule, TargetScript, HANGUL_RANGES};
use crate::counters::CallSpec;
use crate::error::{AuditError, Result};
use crate::style::MarkerCheck;

/// 顶层配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub translation: TranslationConfig,
    pub style: StyleConfig,
}

/// 翻译审计配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub title: String,
    /// 目标文字码点区间，如 `AC00-D7AF`
    pub target_ranges: Vec<String>,
    /// 命中行默认截断长度（字符）
    pub max_chars: usize,
    pub calls: Vec<CallEntry>,
    pub call_tallies: Vec<TallyEntry>,
    pub attributes: Vec<AttributeEntry>,
    pub hardcoded: Vec<HardcodedEntry>,
    pub dictionaries: Vec<DictionaryEntry>,
}

/// 单文件内的调用计数
#[derive(Debug, Clone, Deserialize)]
pub struct CallEntry {
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub overlapping: Vec<String>,
}

impl CallEntry {
    pub fn spec(&self) -> CallSpec {
        CallSpec { name: self.name.clone(), definition: self.definition.clone(), overlapping: self.overlapping.clone() }
    }
}

/// 目录下逐文件的字面量计数
#[derive(Debug, Clone, Deserialize)]
pub struct TallyEntry {
    pub dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeEntry {
    pub file: String,
    pub attribute: String,
}

/// 硬编码文本扫描：显式文件列表或目录遍历，二者可同时给出
#[derive(Debug, Clone, Deserialize)]
pub struct HardcodedEntry {
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub max_chars: Option<usize>,
    #[serde(default)]
    pub block: Option<BlockEntry>,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockEntry {
    pub marker: String,
    #[serde(default = "default_close_tokens")]
    pub close: Vec<String>,
}

/// 单条行规则（四种判定字段取其一，按下列顺序优先）
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub trimmed_prefix: Option<Vec<String>>,
    #[serde(default)]
    pub trimmed_contains: Option<String>,
    #[serde(default)]
    pub line_contains: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default = "default_true")]
    pub suppress: bool,
}

impl RuleEntry {
    fn blank(id: &str) -> Self {
        Self {
            id: id.to_string(),
            trimmed_prefix: None,
            trimmed_contains: None,
            line_contains: None,
            regex: None,
            suppress: true,
        }
    }

    /// 行注释、块注释及块注释续行
    pub fn comments(prefixes: &[&str]) -> Self {
        Self { trimmed_prefix: Some(strings(prefixes)), ..Self::blank("comment") }
    }

    /// 诊断输出行（如 `console.`）
    pub fn diagnostic(marker: &str) -> Self {
        Self { trimmed_contains: Some(marker.to_string()), ..Self::blank("diagnostic") }
    }

    /// 已被翻译调用包裹的行（如 `_t(`），匹配原始行
    pub fn wrapped_call(marker: &str) -> Self {
        Self { line_contains: Some(marker.to_string()), ..Self::blank("wrapped-call") }
    }

    /// 转为行规则；没有任何判定字段的条目返回 `None`
    pub fn to_line_rule(&self) -> Result<Option<LineRule>> {
        let predicate = match (&self.trimmed_prefix, &self.trimmed_contains, &self.line_contains, &self.regex) {
            (Some(p), _, _, _) => LinePredicate::TrimmedPrefix(p.clone()),
            (None, Some(s), _, _) => LinePredicate::TrimmedContains(s.clone()),
            (None, None, Some(s), _) => LinePredicate::LineContains(s.clone()),
            (None, None, None, Some(r)) => {
                let re = Regex::new(r)
                    .map_err(|e| AuditError::InvalidPattern { rule: self.id.clone(), reason: e.to_string() })?;
                LinePredicate::Regex(re)
            }
            _ => return Ok(None),
        };
        Ok(Some(LineRule::new(self.id.clone(), predicate, self.suppress)))
    }
}

/// 翻译字典中某个语言块的顶层键计数
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    pub file: String,
    pub block: String,
}

/// 样式审计配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub title: String,
    pub css_file: String,
    pub button_variants: Vec<String>,
    /// 统计 emoji 的文件；不存在时报告 FILE NOT FOUND
    pub emoji_files: Vec<String>,
    pub markup_file: String,
    pub markers: Vec<MarkerCheck>,
}

impl HardcodedEntry {
    /// 依据条目构建行分类器
    pub fn classifier(&self, target: &TargetScript, default_max_chars: usize) -> Result<LineClassifier> {
        let mut classifier = LineClassifier::new(target.clone(), self.max_chars.unwrap_or(default_max_chars));
        if let Some(block) = &self.block {
            classifier = classifier.with_block(BlockRule::new(block.marker.clone(), block.close.clone()));
        }
        for entry in &self.rules {
            match entry.to_line_rule()? {
                Some(rule) => classifier = classifier.with_rule(rule),
                None => warn!(rule = %entry.id, "rule has no predicate, ignored"),
            }
        }
        Ok(classifier)
    }
}

fn default_extension() -> String {
    "js".to_string()
}

fn default_close_tokens() -> Vec<String> {
    vec!["};".to_string(), "}".to_string()]
}

fn default_true() -> bool {
    true
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let console = || RuleEntry::diagnostic("console.");
        Self {
            title: "Translation audit report".to_string(),
            target_ranges: strings(HANGUL_RANGES),
            max_chars: 150,
            calls: vec![CallEntry {
                file: "script.js".to_string(),
                name: "translate".to_string(),
                definition: Some("function".to_string()),
                overlapping: strings(&["_translate"]),
            }],
            call_tallies: vec![TallyEntry {
                dir: "src/doctor-module".to_string(),
                extension: default_extension(),
                pattern: "this._t(".to_string(),
            }],
            attributes: vec![AttributeEntry { file: "index.html".to_string(), attribute: "data-lang-key".to_string() }],
            hardcoded: vec![
                HardcodedEntry {
                    title: "Hardcoded Korean strings in script.js".to_string(),
                    note: None,
                    files: strings(&["script.js"]),
                    dir: None,
                    extension: default_extension(),
                    max_chars: None,
                    block: Some(BlockEntry { marker: "localizeActionGuideText".to_string(), close: default_close_tokens() }),
                    rules: vec![RuleEntry::comments(&["//", "*", "/*"]), console()],
                },
                HardcodedEntry {
                    title: "Hardcoded Korean strings in service-worker.js".to_string(),
                    note: None,
                    files: strings(&["service-worker.js"]),
                    dir: None,
                    extension: default_extension(),
                    max_chars: None,
                    block: None,
                    rules: vec![RuleEntry::comments(&["//", "*"])],
                },
                HardcodedEntry {
                    title: "Hardcoded Korean in doctor-module .js files".to_string(),
                    note: Some("Korean inside this._t({ ko: '...', en: '...' }) is expected; only lines outside _t() are listed".to_string()),
                    files: Vec::new(),
                    dir: Some("src/doctor-module".to_string()),
                    extension: default_extension(),
                    max_chars: None,
                    block: None,
                    rules: vec![RuleEntry::comments(&["//", "*"]), console(), RuleEntry::wrapped_call("_t(")],
                },
                HardcodedEntry {
                    title: "Hardcoded Korean in src/ui/ files".to_string(),
                    note: None,
                    files: Vec::new(),
                    dir: Some("src/ui".to_string()),
                    extension: default_extension(),
                    max_chars: Some(200),
                    block: None,
                    rules: vec![RuleEntry::comments(&["//", "*"]), console()],
                },
            ],
            dictionaries: vec![DictionaryEntry { file: "src/translations.js".to_string(), block: "ko".to_string() }],
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        let mut markers = vec![
            MarkerCheck::present("Material Symbols loaded", &["Material+Symbols", "material-icons", "Material Symbols"]),
            MarkerCheck::count("material-symbols-outlined used", "material-symbols-outlined"),
            MarkerCheck::count("span.material-symbols", "material-symbols"),
            MarkerCheck::present("tab-diary div", &[r#"id="tab-diary""#, "id='tab-diary'"]),
        ];
        for i in 1..=6 {
            let marker = format!("onboarding-step-{i}");
            markers.push(MarkerCheck::present(format!("{marker} template"), &[marker.as_str()]));
        }
        Self {
            title: "Style audit report".to_string(),
            css_file: "style.css".to_string(),
            button_variants: strings(&["btn-filled", "btn-outlined", "btn-text", "btn-tonal", "btn-elevated", "glass-button"]),
            emoji_files: strings(&["script.js", "index.html"]),
            markup_file: "index.html".to_string(),
            markers,
        }
    }
}

/// 从 TOML 文件加载配置；未出现的字段沿用默认值
pub fn load_config(path: &Path) -> Result<AuditConfig> {
    let txt = std::fs::read_to_string(path).map_err(|source| AuditError::Read { path: path.to_path_buf(), source })?;
    parse_config(&txt).map_err(|source| AuditError::Config { path: path.to_path_buf(), source })
}

pub fn parse_config(txt: &str) -> std::result::Result<AuditConfig, toml::de::Error> {
    toml::from_str(txt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_builtin_audit() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.translation.max_chars, 150);
        assert_eq!(cfg.translation.hardcoded.len(), 4);
        assert_eq!(cfg.style.markers.len(), 10);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = parse_config(
            r##"
[translation]
max_chars = 80

[[translation.hardcoded]]
title = "Leaks in app.js"
files = ["app.js"]
block = { marker = "DICT" }

[[translation.hardcoded.rules]]
id = "comment"
trimmed_prefix = ["#"]

[[translation.hardcoded.rules]]
id = "keep-fixme"
regex = "FIXME"
suppress = false
"##,
        )
        .unwrap();
        assert_eq!(cfg.translation.max_chars, 80);
        assert_eq!(cfg.translation.hardcoded.len(), 1);
        let entry = &cfg.translation.hardcoded[0];
        assert_eq!(entry.extension, "js");
        assert_eq!(entry.block.as_ref().unwrap().close, vec!["};", "}"]);
        assert_eq!(entry.rules[0].trimmed_prefix, Some(vec!["#".to_string()]));
        assert!(!entry.rules[1].suppress);
        assert_eq!(cfg.translation.target_ranges.len(), 3);
        assert_eq!(cfg.style.css_file, "style.css");
    }

    #[test]
    fn bad_regex_is_reported() {
        let entry = RuleEntry { regex: Some("(".to_string()), ..RuleEntry::blank("broken") };
        assert!(matches!(entry.to_line_rule(), Err(AuditError::InvalidPattern { .. })));
    }

    #[test]
    fn entry_without_predicate_is_skipped() {
        let entry = RuleEntry::blank("empty");
        assert!(entry.to_line_rule().unwrap().is_none());
    }

    #[test]
    fn builtin_rules_share_constructors() {
        let cfg = TranslationConfig::default();
        let doctor = cfg.hardcoded.iter().find(|e| e.dir.as_deref() == Some("src/doctor-module")).unwrap();
        let ids: Vec<&str> = doctor.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["comment", "diagnostic", "wrapped-call"]);
        assert_eq!(doctor.rules[2].line_contains.as_deref(), Some("_t("));
        assert_eq!(cfg.target_ranges, strings(HANGUL_RANGES));
    }

    #[test]
    fn builtin_script_classifier_suppresses_in_order() {
        let cfg = TranslationConfig::default();
        let target = TargetScript::parse(&cfg.target_ranges).unwrap();
        let classifier = cfg.hardcoded[0].classifier(&target, cfg.max_chars).unwrap();
        let text = "// 주석입니다\nconst label = '안녕하세요';\nconsole.log('디버그');";
        let scan = classifier.scan_lines(text.lines());
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.findings[0].line, 2);
    }
}
