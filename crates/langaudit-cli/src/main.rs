use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use langaudit_core::{audit_and_write, AuditKind, AuditOptions, OutputFormat};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "langaudit", version, about = "Web 项目翻译与样式审计")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 翻译审计：调用计数、属性计数、硬编码文本、字典键
    Translations(CommonArgs),
    /// 样式审计：CSS 变量、硬编码颜色、emoji、标记检查
    Style(CommonArgs),
    /// 依次执行全部审计
    All(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// 被审计项目的根目录
    #[arg(long)]
    base: PathBuf,

    /// 配置文件路径（TOML）；缺省使用内置配置
    #[arg(long)]
    config: Option<PathBuf>,

    /// 输出格式
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    // 日志写到 stderr，stdout 只留报告
    init_tracing();
    let cli = Cli::parse();

    let (kind, args) = match cli.command {
        Commands::Translations(args) => (AuditKind::Translation, args),
        Commands::Style(args) => (AuditKind::Style, args),
        Commands::All(args) => (AuditKind::All, args),
    };
    info!(base = ?args.base, ?kind, "starting audit");

    let opts = AuditOptions {
        base_dir: args.base,
        config_path: args.config,
        kind,
        format: match args.format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        },
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = audit_and_write(&opts, &mut out).context("audit failed")?;
    out.flush().context("flush report")?;

    info!(
        files_read = stats.files_read,
        findings = stats.findings,
        unterminated_blocks = stats.unterminated_blocks,
        "audit finished"
    );
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
