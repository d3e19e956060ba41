//! 翻译与样式审计核心库
//!
//! 设计要点：
//! - 只读分析：逐个读入源文件，单次线性扫描，不写回任何内容。
//! - 行分类器是唯一带状态的部分：块状态机 + 有序行规则表 + 目标字符判定，状态不跨文件。
//! - 所有常量（基准目录、码点区间、抑制标记）都来自 `AuditConfig`，默认值即内置审计。
//! - 必需文件读不到时整体失败；目录遍历无结果只产生空小节。

mod audit;
mod classifier;
mod counters;
mod error;
mod findings;
mod options;
mod report;
mod rules;
mod source;
mod style;
mod types;

pub use audit::{audit_and_write, run_style_audit, run_translation_audit};
pub use classifier::{BlockRule, BlockState, FileScan, LineClassifier, LinePredicate, LineRule, LineVerdict, TargetScript, HANGUL_RANGES};
pub use counters::{attribute_values, count_calls, count_literal, count_top_level_keys, extract_balanced_block, CallSpec};
pub use error::{AuditError, Result};
pub use findings::{truncate_chars, Finding};
pub use options::{AuditKind, AuditOptions, AuditStats, OutputFormat};
pub use report::{write_json, write_text};
pub use rules::{load_config, parse_config, AuditConfig, HardcodedEntry, RuleEntry, StyleConfig, TranslationConfig};
pub use source::{SourceFile, SourceTree};
pub use style::{css_stats, emoji_stats, marker_checks, CssStats, EmojiStats, MarkerCheck, MarkerMode, MarkerResult, MarkerValue, NamedCount};
pub use types::{FileCount, FileFindings, Report, Section};
