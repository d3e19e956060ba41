//! 报告输出（纯文本 / JSON）
use std::io::Write;

use crate::error::Result;
use crate::style::MarkerValue;
use crate::types::{Report, Section};

const RULE_WIDTH: usize = 80;

/// 以纯文本形式写出报告，小节按出现顺序编号
pub fn write_text(out: &mut dyn Write, report: &Report) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "{}", report.title.to_uppercase())?;
    writeln!(out, "{rule}")?;

    for (idx, section) in report.sections.iter().enumerate() {
        let n = idx + 1;
        match section {
            Section::Calls { title, count, overlapping, .. } => {
                writeln!(out, "\n{n}. {title}: {count}")?;
                for other in overlapping {
                    writeln!(out, "   (also {} {}() calls)", other.count, other.name)?;
                }
            }
            Section::CallTally { title, files, total, .. } => {
                writeln!(out, "\n{n}. {title}:")?;
                for f in files {
                    writeln!(out, "   {}: {}", f.path, f.count)?;
                }
                writeln!(out, "   TOTAL: {total}")?;
            }
            Section::Attribute { title, count, .. } => {
                writeln!(out, "\n{n}. {title}: {count}")?;
            }
            Section::Hardcoded { title, note, files, total } => {
                writeln!(out, "\n{n}. {title}:")?;
                if let Some(note) = note {
                    writeln!(out, "   (Note: {note})")?;
                }
                writeln!(out, "   Found {total} lines in {} file(s)", files.len())?;
                for f in files {
                    writeln!(out, "\n   {}: ({} lines)", f.path, f.findings.len())?;
                    for finding in &f.findings {
                        writeln!(out, "     L{}: {}", finding.line, finding.text)?;
                    }
                    if let Some(line) = f.unterminated_block {
                        writeln!(out, "     WARNING: block opened at L{line} never closed; remaining lines were skipped")?;
                    }
                }
            }
            Section::DictionaryKeys { title, block, keys, .. } => {
                writeln!(out, "\n{n}. {title}:")?;
                match keys {
                    Some(k) => writeln!(out, "   Keys in '{block}' section: {k}")?,
                    None => writeln!(out, "   Could not parse '{block}' section")?,
                }
            }
            Section::Css { title, stats, .. } => {
                writeln!(out, "\n=== {title} ===")?;
                writeln!(out, "var(-- count: {}", stats.var_refs)?;
                writeln!(out, "hardcoded hex: {}", stats.hex_colors)?;
                for v in &stats.variants {
                    writeln!(out, "  .{}: {}", v.name, v.count)?;
                }
            }
            Section::Emoji { title, file, stats } => match stats {
                Some(stats) => {
                    writeln!(out, "\n=== {title} ===")?;
                    writeln!(out, "  Total emoji chars: {}", stats.total)?;
                    if !stats.unique.is_empty() {
                        let unique: String = stats.unique.iter().collect();
                        writeln!(out, "  Unique emojis ({}): {unique}", stats.unique.len())?;
                    }
                }
                None => writeln!(out, "\n{file}: FILE NOT FOUND")?,
            },
            Section::Markers { title, results, .. } => {
                writeln!(out, "\n=== {title} ===")?;
                for r in results {
                    match r.value {
                        MarkerValue::Present(p) => writeln!(out, "{}: {}", r.label, p)?,
                        MarkerValue::Count(c) => writeln!(out, "{}: {}", r.label, c)?,
                    }
                }
            }
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "END OF REPORT")?;
    writeln!(out, "{rule}")?;
    Ok(())
}

/// 以 JSON 数组形式写出全部报告
pub fn write_json(out: &mut dyn Write, reports: &[Report]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Finding;
    use crate::types::FileFindings;

    fn sample() -> Report {
        Report {
            title: "Translation audit report".to_string(),
            sections: vec![
                Section::Attribute { title: "data-lang-key attributes in index.html".to_string(), file: "index.html".to_string(), attribute: "data-lang-key".to_string(), count: 3 },
                Section::Hardcoded {
                    title: "Hardcoded Korean strings in script.js".to_string(),
                    note: None,
                    files: vec![FileFindings {
                        path: "script.js".to_string(),
                        findings: vec![Finding { line: 2, text: "const a = '가';".to_string() }],
                        unterminated_block: Some(9),
                    }],
                    total: 1,
                },
                Section::DictionaryKeys { title: "Translation keys in src/translations.js".to_string(), file: "src/translations.js".to_string(), block: "ko".to_string(), keys: None },
            ],
        }
    }

    #[test]
    fn text_report_layout() {
        let mut buf = Vec::new();
        write_text(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("TRANSLATION AUDIT REPORT"));
        assert!(text.contains("\n1. data-lang-key attributes in index.html: 3\n"));
        assert!(text.contains("     L2: const a = '가';\n"));
        assert!(text.contains("block opened at L9 never closed"));
        assert!(text.contains("Could not parse 'ko' section"));
        assert!(text.contains("END OF REPORT"));
    }

    #[test]
    fn json_report_is_tagged() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let sections = &value[0]["sections"];
        assert_eq!(sections[0]["kind"], "attribute");
        assert_eq!(sections[1]["files"][0]["findings"][0]["line"], 2);
        assert_eq!(sections[1]["files"][0]["unterminated_block"], 9);
        assert!(sections[2]["keys"].is_null());
    }
}
