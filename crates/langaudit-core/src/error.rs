//! 错误类型（库内统一使用 `AuditError`）
use std::path::PathBuf;

/// 审计过程中可能出现的错误
///
/// 实际上只有“文件读不到”这一类会在正常使用中出现；其余变体用于配置与输出。
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// 必需文件不存在、无权限或不是合法 UTF-8
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 目录遍历失败（根目录不存在不算错误）
    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// 配置文件无法解析
    #[error("invalid config file {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 行规则中的正则或码点区间写错
    #[error("invalid pattern in rule `{rule}`: {reason}")]
    InvalidPattern { rule: String, reason: String },

    /// 报告输出失败
    #[error("failed to write report")]
    Io(#[from] std::io::Error),

    /// JSON 报告序列化失败
    #[error("failed to encode report as json")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
