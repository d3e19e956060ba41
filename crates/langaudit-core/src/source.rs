//! 源文件读取与目录遍历
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{AuditError, Result};

/// 已读入内存的源文件（只读，扫描结束即丢弃）
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// 相对基准目录的路径
    pub rel_path: PathBuf,
    pub content: String,
}

impl SourceFile {
    /// 按行迭代（去掉 `\n` / `\r\n`）
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.content.lines()
    }

    /// 报告里显示的路径（统一使用 `/`）
    pub fn display_path(&self) -> String {
        display_path(&self.rel_path)
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// 以基准目录为根的源码树
#[derive(Debug, Clone)]
pub struct SourceTree {
    base: PathBuf,
}

impl SourceTree {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// 读取必需文件；读不到即返回错误
    pub fn read(&self, rel: impl AsRef<Path>) -> Result<SourceFile> {
        let rel = rel.as_ref();
        let path = self.base.join(rel);
        let content = std::fs::read_to_string(&path).map_err(|source| AuditError::Read { path, source })?;
        Ok(SourceFile { rel_path: rel.to_path_buf(), content })
    }

    /// 读取可选文件；不存在时返回 `None`，其他错误照常上抛
    pub fn read_optional(&self, rel: impl AsRef<Path>) -> Result<Option<SourceFile>> {
        match self.read(rel) {
            Ok(file) => Ok(Some(file)),
            Err(AuditError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 递归列出子目录下指定扩展名的文件（相对路径，同目录内按文件名排序）
    ///
    /// 子目录不存在时视为“没有文件”，返回空列表。
    pub fn walk(&self, rel_dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
        let root = self.base.join(rel_dir.as_ref());
        if !root.is_dir() {
            debug!(?root, "walk root missing, nothing to scan");
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|source| AuditError::Walk { path: root.clone(), source })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            let rel = entry.path().strip_prefix(&self.base).unwrap_or(entry.path()).to_path_buf();
            files.push(rel);
        }
        Ok(files)
    }
}
