//! 审计主流程：按配置顺序逐节执行，收集为 `Report`
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::classifier::TargetScript;
use crate::counters::{attribute_values, count_calls, count_literal, count_top_level_keys, extract_balanced_block};
use crate::error::Result;
use crate::options::{AuditKind, AuditOptions, AuditStats, OutputFormat};
use crate::report::{write_json, write_text};
use crate::rules::{load_config, AuditConfig, HardcodedEntry, StyleConfig, TranslationConfig};
use crate::source::{display_path, SourceFile, SourceTree};
use crate::style::{css_stats, emoji_stats, marker_checks, NamedCount};
use crate::types::{FileCount, FileFindings, Report, Section};

/// 执行审计并把报告写入 `out`
///
/// 必需文件读不到时立即返回错误，已写出的部分报告不回滚。
pub fn audit_and_write(opts: &AuditOptions, out: &mut dyn Write) -> Result<AuditStats> {
    let config = match &opts.config_path {
        Some(path) => {
            info!(?path, "loading audit config");
            load_config(path)?
        }
        None => AuditConfig::default(),
    };
    let tree = SourceTree::new(&opts.base_dir);
    let mut stats = AuditStats::default();

    let mut reports = Vec::new();
    if matches!(opts.kind, AuditKind::Translation | AuditKind::All) {
        let report = run_translation_audit(&tree, &config.translation, &mut stats)?;
        if opts.format == OutputFormat::Text {
            write_text(out, &report)?;
        }
        reports.push(report);
    }
    if matches!(opts.kind, AuditKind::Style | AuditKind::All) {
        let report = run_style_audit(&tree, &config.style, &mut stats)?;
        if opts.format == OutputFormat::Text {
            write_text(out, &report)?;
        }
        reports.push(report);
    }
    if opts.format == OutputFormat::Json {
        write_json(out, &reports)?;
    }
    Ok(stats)
}

/// 翻译审计：调用计数、属性计数、硬编码文本扫描、字典键计数
pub fn run_translation_audit(tree: &SourceTree, cfg: &TranslationConfig, stats: &mut AuditStats) -> Result<Report> {
    let target = TargetScript::parse(&cfg.target_ranges)?;
    let mut sections = Vec::new();

    for entry in &cfg.calls {
        let file = read(tree, &entry.file, stats)?;
        let count = count_calls(&file.content, &entry.spec());
        let overlapping = entry
            .overlapping
            .iter()
            .map(|name| NamedCount { name: name.clone(), count: count_literal(&file.content, &format!("{name}(")) })
            .collect();
        debug!(file = %entry.file, name = %entry.name, count, "counted calls");
        sections.push(Section::Calls { title: format!("{}() calls in {}", entry.name, entry.file), file: entry.file.clone(), count, overlapping });
    }

    for entry in &cfg.call_tallies {
        let mut files = Vec::new();
        for rel in tree.walk(&entry.dir, &entry.extension)? {
            let file = read(tree, &rel, stats)?;
            let count = count_literal(&file.content, &entry.pattern);
            if count > 0 {
                files.push(FileCount { path: file.display_path(), count });
            }
        }
        let total = files.iter().map(|f| f.count).sum();
        sections.push(Section::CallTally {
            title: format!("{} calls in {} files", entry.pattern, entry.dir),
            pattern: entry.pattern.clone(),
            files,
            total,
        });
    }

    for entry in &cfg.attributes {
        let file = read(tree, &entry.file, stats)?;
        let count = attribute_values(&file.content, &entry.attribute)?.len();
        sections.push(Section::Attribute {
            title: format!("{} attributes in {}", entry.attribute, entry.file),
            file: entry.file.clone(),
            attribute: entry.attribute.clone(),
            count,
        });
    }

    for entry in &cfg.hardcoded {
        sections.push(scan_hardcoded(tree, entry, &target, cfg.max_chars, stats)?);
    }

    for entry in &cfg.dictionaries {
        let file = read(tree, &entry.file, stats)?;
        let keys = extract_balanced_block(&file.content, &entry.block).map(count_top_level_keys);
        if keys.is_none() {
            warn!(file = %entry.file, block = %entry.block, "dictionary block not found");
        }
        sections.push(Section::DictionaryKeys {
            title: format!("Translation keys in {}", entry.file),
            file: entry.file.clone(),
            block: entry.block.clone(),
            keys,
        });
    }

    Ok(Report { title: cfg.title.clone(), sections })
}

/// 对显式文件（必需）与目录遍历结果（可为空）逐个运行行分类器
fn scan_hardcoded(
    tree: &SourceTree,
    entry: &HardcodedEntry,
    target: &TargetScript,
    default_max_chars: usize,
    stats: &mut AuditStats,
) -> Result<Section> {
    let classifier = entry.classifier(target, default_max_chars)?;
    let mut files = Vec::new();

    let mut scan_one = |file: SourceFile, keep_empty: bool, stats: &mut AuditStats| {
        let scan = classifier.scan_lines(file.lines());
        let path = file.display_path();
        if let Some(line) = scan.unterminated_block {
            warn!(%path, line, "tracked block never closed, rest of file suppressed");
            stats.unterminated_blocks += 1;
        }
        stats.findings += scan.findings.len();
        debug!(%path, findings = scan.findings.len(), "scanned file");
        if keep_empty || !scan.findings.is_empty() || scan.unterminated_block.is_some() {
            files.push(FileFindings { path, findings: scan.findings, unterminated_block: scan.unterminated_block });
        }
    };

    for rel in &entry.files {
        let file = read(tree, rel, stats)?;
        scan_one(file, true, stats);
    }
    if let Some(dir) = &entry.dir {
        for rel in tree.walk(dir, &entry.extension)? {
            let file = read(tree, &rel, stats)?;
            scan_one(file, false, stats);
        }
    }

    let total = files.iter().map(|f| f.findings.len()).sum();
    info!(title = %entry.title, total, "hardcoded scan finished");
    Ok(Section::Hardcoded { title: entry.title.clone(), note: entry.note.clone(), files, total })
}

/// 样式审计：CSS 统计、emoji 统计、标记检查
pub fn run_style_audit(tree: &SourceTree, cfg: &StyleConfig, stats: &mut AuditStats) -> Result<Report> {
    let mut sections = Vec::new();

    let css = read(tree, &cfg.css_file, stats)?;
    sections.push(Section::Css {
        title: cfg.css_file.clone(),
        file: cfg.css_file.clone(),
        stats: css_stats(&css.content, &cfg.button_variants),
    });

    for name in &cfg.emoji_files {
        let file = tree.read_optional(name)?;
        if file.is_some() {
            stats.files_read += 1;
        } else {
            warn!(file = %name, "emoji source not found");
        }
        sections.push(Section::Emoji {
            title: format!("{name} emoji count"),
            file: name.clone(),
            stats: file.map(|f| emoji_stats(&f.content)),
        });
    }

    let markup = read(tree, &cfg.markup_file, stats)?;
    sections.push(Section::Markers {
        title: format!("Markers in {}", cfg.markup_file),
        file: cfg.markup_file.clone(),
        results: marker_checks(&markup.content, &cfg.markers),
    });

    Ok(Report { title: cfg.title.clone(), sections })
}

fn read(tree: &SourceTree, rel: impl Into<PathBuf>, stats: &mut AuditStats) -> Result<SourceFile> {
    let rel = rel.into();
    debug!(path = %display_path(&rel), "reading");
    let file = tree.read(&rel)?;
    stats.files_read += 1;
    Ok(file)
}
