//! 行分类器（核心）
//!
//! 对单个文件的行序列做一次线性扫描，逐行决定是否“需要报告”：
//! 1. 块抑制：处于被跟踪的多行字典字面量内部时，整行跳过；
//! 2. 行规则表：按顺序匹配，第一条命中的规则决定跳过或放行；
//! 3. 目标判定：行内含有指定码点区间（默认韩文）的字符即产生命中。
//!
//! 块状态只存在于一次 `scan_lines` 调用内部，不会泄漏到其他文件。
use std::ops::RangeInclusive;

use regex::Regex;

use crate::error::{AuditError, Result};
use crate::findings::Finding;

/// 韩文音节、兼容字母与字母区
pub const HANGUL_RANGES: &[&str] = &["AC00-D7AF", "3131-3163", "1100-11FF"];

/// 目标文字判定：任意字符落在任一码点区间内即命中
#[derive(Debug, Clone)]
pub struct TargetScript {
    ranges: Vec<RangeInclusive<char>>,
}

impl TargetScript {
    pub fn new(ranges: Vec<RangeInclusive<char>>) -> Self {
        Self { ranges }
    }

    /// 解析形如 `AC00-D7AF` 或单个码点 `200D` 的区间列表
    pub fn parse(specs: &[String]) -> Result<Self> {
        let mut ranges = Vec::with_capacity(specs.len());
        for spec in specs {
            ranges.push(parse_range(spec)?);
        }
        Ok(Self::new(ranges))
    }

    pub fn matches(&self, line: &str) -> bool {
        line.chars().any(|c| self.ranges.iter().any(|r| r.contains(&c)))
    }
}

fn parse_range(spec: &str) -> Result<RangeInclusive<char>> {
    let invalid = || AuditError::InvalidPattern {
        rule: "target_ranges".to_string(),
        reason: format!("bad codepoint range `{spec}`"),
    };
    let parse_cp = |s: &str| {
        let s = s.trim().trim_start_matches("U+").trim_start_matches("u+");
        u32::from_str_radix(s, 16).ok().and_then(char::from_u32)
    };
    let (lo, hi) = match spec.split_once('-') {
        Some((a, b)) => (parse_cp(a).ok_or_else(invalid)?, parse_cp(b).ok_or_else(invalid)?),
        None => {
            let c = parse_cp(spec).ok_or_else(invalid)?;
            (c, c)
        }
    };
    if lo > hi {
        return Err(invalid());
    }
    Ok(lo..=hi)
}

/// 行规则的判定条件
#[derive(Debug, Clone)]
pub enum LinePredicate {
    /// 去空白后的行以任一前缀开头（注释标记）
    TrimmedPrefix(Vec<String>),
    /// 去空白后的行包含子串（诊断输出，如 `console.`）
    TrimmedContains(String),
    /// 原始行包含子串（已包裹的翻译调用，如 `_t(`）
    LineContains(String),
    /// 原始行匹配正则
    Regex(Regex),
}

impl LinePredicate {
    fn matches(&self, raw: &str, trimmed: &str) -> bool {
        match self {
            LinePredicate::TrimmedPrefix(prefixes) => prefixes.iter().any(|p| trimmed.starts_with(p.as_str())),
            LinePredicate::TrimmedContains(needle) => trimmed.contains(needle.as_str()),
            LinePredicate::LineContains(needle) => raw.contains(needle.as_str()),
            LinePredicate::Regex(re) => re.is_match(raw),
        }
    }
}

/// 行规则：`suppress = true` 跳过该行；`false` 则放行，直接进入目标判定
#[derive(Debug, Clone)]
pub struct LineRule {
    pub id: String,
    pub predicate: LinePredicate,
    pub suppress: bool,
}

impl LineRule {
    pub fn new(id: impl Into<String>, predicate: LinePredicate, suppress: bool) -> Self {
        Self { id: id.into(), predicate, suppress }
    }
}

/// 被跟踪的多行块：标记子串后跟 `{` 进入，整行等于关闭符时退出
#[derive(Debug, Clone)]
pub struct BlockRule {
    pub marker: String,
    pub close_tokens: Vec<String>,
}

impl BlockRule {
    pub fn new(marker: impl Into<String>, close_tokens: Vec<String>) -> Self {
        Self { marker: marker.into(), close_tokens }
    }

    fn opens(&self, trimmed: &str) -> bool {
        match trimmed.find(self.marker.as_str()) {
            Some(pos) => trimmed[pos + self.marker.len()..].contains('{'),
            None => false,
        }
    }

    fn closes(&self, trimmed: &str) -> bool {
        self.close_tokens.iter().any(|t| t == trimmed)
    }
}

/// 块状态机的两个状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Outside,
    Inside { opened_at: usize },
}

impl BlockState {
    /// 状态转移：返回（下一状态，本行是否被块抑制）
    ///
    /// 打开块的那一行与关闭块的那一行都算在块内。
    pub fn step(self, rule: &BlockRule, trimmed: &str, line_no: usize) -> (BlockState, bool) {
        match self {
            BlockState::Outside if rule.opens(trimmed) => (BlockState::Inside { opened_at: line_no }, true),
            BlockState::Outside => (BlockState::Outside, false),
            BlockState::Inside { .. } if rule.closes(trimmed) => (BlockState::Outside, true),
            inside @ BlockState::Inside { .. } => (inside, true),
        }
    }
}

/// 单行的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineVerdict {
    InBlock,
    Suppressed(String),
    NoTarget,
    Report,
}

/// 单个文件的扫描结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub findings: Vec<Finding>,
    /// 文件结束时仍未关闭的块的起始行
    pub unterminated_block: Option<usize>,
}

/// 行分类器：目标判定 + 可选块规则 + 有序行规则表
#[derive(Debug, Clone)]
pub struct LineClassifier {
    target: TargetScript,
    block: Option<BlockRule>,
    rules: Vec<LineRule>,
    max_chars: usize,
}

impl LineClassifier {
    pub fn new(target: TargetScript, max_chars: usize) -> Self {
        Self { target, block: None, rules: Vec::new(), max_chars }
    }

    pub fn with_block(mut self, block: BlockRule) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_rule(mut self, rule: LineRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// 对单行做分类，同时推进块状态
    pub fn classify(&self, state: BlockState, line_no: usize, raw: &str) -> (BlockState, LineVerdict) {
        let trimmed = raw.trim();
        let state = match &self.block {
            Some(block) => {
                let (next, in_block) = state.step(block, trimmed, line_no);
                if in_block {
                    return (next, LineVerdict::InBlock);
                }
                next
            }
            None => state,
        };

        // 第一条命中的规则决定结果
        if let Some(rule) = self.rules.iter().find(|r| r.predicate.matches(raw, trimmed)) {
            if rule.suppress {
                return (state, LineVerdict::Suppressed(rule.id.clone()));
            }
        }

        if self.target.matches(raw) {
            (state, LineVerdict::Report)
        } else {
            (state, LineVerdict::NoTarget)
        }
    }

    /// 单次线性扫描，行号从 1 开始
    pub fn scan_lines<'a, I>(&self, lines: I) -> FileScan
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut state = BlockState::Outside;
        let mut scan = FileScan::default();
        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let (next, verdict) = self.classify(state, line_no, raw);
            state = next;
            if verdict == LineVerdict::Report {
                scan.findings.push(Finding::new(line_no, raw.trim(), self.max_chars));
            }
        }
        if let BlockState::Inside { opened_at } = state {
            scan.unterminated_block = Some(opened_at);
        }
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hangul() -> TargetScript {
        TargetScript::parse(&HANGUL_RANGES.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    fn comments(prefixes: &[&str]) -> LineRule {
        LineRule::new("comment", LinePredicate::TrimmedPrefix(prefixes.iter().map(|p| p.to_string()).collect()), true)
    }

    fn script_classifier() -> LineClassifier {
        LineClassifier::new(hangul(), 150)
            .with_block(BlockRule::new("localizeActionGuideText", vec!["}".to_string(), "};".to_string()]))
            .with_rule(comments(&["//", "*", "/*"]))
            .with_rule(LineRule::new("diagnostic", LinePredicate::TrimmedContains("console.".to_string()), true))
    }

    #[test]
    fn three_line_scenario_reports_only_plain_line() {
        let text = "// 주석입니다\nconst label = '안녕하세요';\nconsole.log('디버그');\n";
        let scan = script_classifier().scan_lines(text.lines());
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.findings[0].line, 2);
        assert_eq!(scan.findings[0].text, "const label = '안녕하세요';");
        assert_eq!(scan.unterminated_block, None);
    }

    #[test]
    fn no_target_means_no_findings() {
        let text = "const a = 1;\nfunction f() {\n  return 'hello';\n}\n";
        assert!(script_classifier().scan_lines(text.lines()).findings.is_empty());
    }

    #[test]
    fn block_contents_are_never_reported() {
        let text = [
            "function localizeActionGuideText(text) {",
            "  const map = {",
            "    '물 마시기': 'Drink water',",
            "  };",
            "}",
            "const after = '이후';",
        ];
        let scan = script_classifier().scan_lines(text);
        // `};` 关闭了块，第 5 行的 `}` 已在块外
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.findings[0].line, 6);
    }

    #[test]
    fn marker_without_following_brace_does_not_open_block() {
        let text = ["{ localizeActionGuideText", "const x = '한글';"];
        let scan = script_classifier().scan_lines(text);
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.findings[0].line, 2);
    }

    #[test]
    fn comment_lines_are_suppressed() {
        let classifier = script_classifier();
        for line in ["// 한글", "  * 한글 설명", "/* 한글 */"] {
            let (_, verdict) = classifier.classify(BlockState::Outside, 1, line);
            assert_eq!(verdict, LineVerdict::Suppressed("comment".to_string()), "{line}");
        }
    }

    #[test]
    fn diagnostic_lines_are_suppressed() {
        let (_, verdict) = script_classifier().classify(BlockState::Outside, 1, "  console.warn('경고');");
        assert_eq!(verdict, LineVerdict::Suppressed("diagnostic".to_string()));
    }

    #[test]
    fn wrapped_calls_are_accepted() {
        let classifier = script_classifier().with_rule(LineRule::new("wrapped-call", LinePredicate::LineContains("_t(".to_string()), true));
        let text = "return this._t({ ko: '좋음', en: 'Good' });\nreturn '나쁨';";
        let scan = classifier.scan_lines(text.lines());
        assert_eq!(scan.findings.iter().map(|f| f.line).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn allow_rule_skips_later_suppressions() {
        let classifier = LineClassifier::new(hangul(), 150)
            .with_rule(LineRule::new("keep-todo", LinePredicate::Regex(Regex::new(r"TODO").unwrap()), false))
            .with_rule(comments(&["//"]));
        let scan = classifier.scan_lines("// TODO: 번역\n// 무시".lines());
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.findings[0].line, 1);
    }

    #[test]
    fn unterminated_block_is_flagged() {
        let text = ["const x = '앞';", "localizeActionGuideText = {", "  '가': 'a',", "  '나': 'b',"];
        let scan = script_classifier().scan_lines(text);
        assert_eq!(scan.findings.len(), 1);
        assert_eq!(scan.unterminated_block, Some(2));
    }

    #[test]
    fn block_state_does_not_leak_between_scans() {
        let classifier = script_classifier();
        let first = classifier.scan_lines(["localizeActionGuideText = {", "'가'"]);
        assert_eq!(first.unterminated_block, Some(1));
        let second = classifier.scan_lines(["const y = '다';"]);
        assert_eq!(second.findings.len(), 1);
    }

    #[test]
    fn long_lines_are_truncated() {
        let line = format!("const s = '{}';", "가".repeat(300));
        let scan = script_classifier().scan_lines([line.as_str()]);
        assert_eq!(scan.findings[0].text.chars().count(), 150);
    }

    #[test]
    fn parses_codepoint_ranges() {
        let target = TargetScript::parse(&["AC00-D7AF".to_string(), "U+200D".to_string()]).unwrap();
        assert!(target.matches("한"));
        assert!(target.matches("\u{200D}"));
        assert!(!target.matches("abc"));
        assert!(TargetScript::parse(&["D7AF-AC00".to_string()]).is_err());
        assert!(TargetScript::parse(&["zz".to_string()]).is_err());
    }
}
