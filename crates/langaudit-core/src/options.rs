//! 审计选项与统计信息
use std::path::PathBuf;

/// 审计种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    Translation,
    Style,
    All,
}

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 审计选项
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// 被审计项目的根目录
    pub base_dir: PathBuf,
    /// 配置文件路径（TOML）；为空则使用内置配置
    pub config_path: Option<PathBuf>,
    pub kind: AuditKind,
    pub format: OutputFormat,
}

impl AuditOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), config_path: None, kind: AuditKind::All, format: OutputFormat::Text }
    }
}

/// 审计统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub files_read: usize,
    pub findings: usize,
    pub unterminated_blocks: usize,
}
