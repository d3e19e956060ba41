//! 命中项与截断
use serde::Serialize;

/// 单个命中：行号（从 1 开始）+ 截断后的行文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: usize,
    pub text: String,
}

impl Finding {
    /// 以去除首尾空白的行内容构造命中项，并按字符数截断
    pub(crate) fn new(line: usize, trimmed: &str, max_chars: usize) -> Self {
        Self { line, text: truncate_chars(trimmed, max_chars) }
    }
}

/// 按字符数（非字节、非单词边界）截断，不追加省略标记
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_exact_char_count() {
        let long = "가".repeat(200);
        let cut = truncate_chars(&long, 150);
        assert_eq!(cut.chars().count(), 150);
        assert!(!cut.ends_with("..."));
    }

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(truncate_chars("const a = 1;", 150), "const a = 1;");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn cut_is_not_word_aware() {
        assert_eq!(truncate_chars("hello world", 7), "hello w");
    }
}
