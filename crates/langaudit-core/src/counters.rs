//! 整文件计数器（纯函数，互不共享状态）
use regex::Regex;

use crate::error::{AuditError, Result};

/// 调用点计数参数
#[derive(Debug, Clone)]
pub struct CallSpec {
    /// 函数名（不含括号）
    pub name: String,
    /// 定义关键字，如 `function`；`function name(` 不计为调用
    pub definition: Option<String>,
    /// 文本上包含本名字的其他函数名，如 `_translate` 之于 `translate`
    pub overlapping: Vec<String>,
}

/// 字面子串出现次数（不重叠）
pub fn count_literal(content: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    content.matches(needle).count()
}

/// `name(` 出现次数，减去函数定义与重叠名字的调用
pub fn count_calls(content: &str, spec: &CallSpec) -> usize {
    let call = format!("{}(", spec.name);
    let mut count = count_literal(content, &call);
    if let Some(keyword) = &spec.definition {
        count = count.saturating_sub(count_literal(content, &format!("{keyword} {call}")));
    }
    for other in &spec.overlapping {
        count = count.saturating_sub(count_literal(content, &format!("{other}(")));
    }
    count
}

/// 标记属性的全部取值（仅双引号包裹的非空值）
pub fn attribute_values(content: &str, attribute: &str) -> Result<Vec<String>> {
    let pattern = format!(r#"{}="([^"]+)""#, regex::escape(attribute));
    let re = Regex::new(&pattern)
        .map_err(|e| AuditError::InvalidPattern { rule: attribute.to_string(), reason: e.to_string() })?;
    Ok(re.captures_iter(content).filter_map(|caps| caps.get(1)).map(|m| m.as_str().to_string()).collect())
}

/// 定位 `name: {` 引出的对象字面量，返回两层花括号之间的内容
///
/// 深度从 1 开始，`{` 加一、`}` 减一，归零即停；字符串与注释中的括号不计。
/// 块未闭合时返回 `None`。正则字面量不做识别，`/\}/` 这类写法会让块提前结束。
pub fn extract_balanced_block<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let re = Regex::new(&format!(r"\b{}\s*:\s*\{{", regex::escape(name))).ok()?;
    let start = re.find(content)?.end();
    let bytes = content.as_bytes();
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        if let Some(next) = skip_literal(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// 统计块内顶层键的数量（`\w+` 形式的裸键后跟冒号，含数字键）
///
/// 只在深度 0、且位于块首或 `,` 之后的位置识别键；嵌套对象里的键与引号键都不计。
pub fn count_top_level_keys(block: &str) -> usize {
    let bytes = block.as_bytes();
    let mut depth = 0usize;
    let mut expect_key = true;
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if let Some(next) = skip_literal(bytes, i) {
            // 注释不改变“是否处于键位置”
            if matches!(b, b'\'' | b'"' | b'`') {
                expect_key = false;
            }
            i = next;
            continue;
        }
        match b {
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                expect_key = true;
                i += 1;
                continue;
            }
            _ if depth == 0 && expect_key && starts_word(block, i) => {
                let end = word_end(block, i);
                if next_non_ws(bytes, end) == Some(b':') {
                    count += 1;
                }
                expect_key = false;
                i = end;
                continue;
            }
            _ => {}
        }
        expect_key = false;
        i += 1;
    }
    count
}

/// 若 `i` 处是字符串或注释的开头，返回其后第一个字节的位置
fn skip_literal(bytes: &[u8], i: usize) -> Option<usize> {
    match (bytes[i], bytes.get(i + 1)) {
        (b'\'' | b'"' | b'`', _) => Some(skip_quoted(bytes, i)),
        (b'/', Some(b'/')) => Some(
            bytes[i..]
                .iter()
                .position(|&c| c == b'\n')
                .map(|p| i + p + 1)
                .unwrap_or(bytes.len()),
        ),
        (b'/', Some(b'*')) => Some(
            bytes[i + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map(|p| i + 2 + p + 2)
                .unwrap_or(bytes.len()),
        ),
        _ => None,
    }
}

fn skip_quoted(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn next_non_ws(bytes: &[u8], from: usize) -> Option<u8> {
    bytes.get(from..)?.iter().copied().find(|b| !b.is_ascii_whitespace())
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_word(block: &str, i: usize) -> bool {
    block.is_char_boundary(i) && block[i..].chars().next().is_some_and(is_word)
}

fn word_end(block: &str, start: usize) -> usize {
    block[start..]
        .char_indices()
        .find(|&(_, c)| !is_word(c))
        .map(|(p, _)| start + p)
        .unwrap_or(block.len())
}
