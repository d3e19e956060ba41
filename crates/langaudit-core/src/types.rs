//! 公共报告类型（对外暴露，可序列化为 JSON）
use serde::Serialize;

use crate::findings::Finding;
use crate::style::{CssStats, EmojiStats, MarkerResult, NamedCount};

/// 一次审计的完整报告
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

/// 报告中的单个小节
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Calls { title: String, file: String, count: usize, overlapping: Vec<NamedCount> },
    CallTally { title: String, pattern: String, files: Vec<FileCount>, total: usize },
    Attribute { title: String, file: String, attribute: String, count: usize },
    Hardcoded { title: String, note: Option<String>, files: Vec<FileFindings>, total: usize },
    /// `keys` 为 `None` 表示没找到该语言块
    DictionaryKeys { title: String, file: String, block: String, keys: Option<usize> },
    Css { title: String, file: String, stats: CssStats },
    /// `stats` 为 `None` 表示文件不存在
    Emoji { title: String, file: String, stats: Option<EmojiStats> },
    Markers { title: String, file: String, results: Vec<MarkerResult> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub path: String,
    pub count: usize,
}

/// 单个文件的硬编码文本命中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFindings {
    pub path: String,
    pub findings: Vec<Finding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unterminated_block: Option<usize>,
}
