mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use repolist_core::CatalogFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repolist")]
#[command(about = "デプロイ対象プロジェクトのカタログを検証・表示・変換する", long_about = None)]
struct Cli {
    /// カタログファイル（省略時は REPOLIST_CATALOG_PATH → 上方向探索 → ~/.config/repolist）
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// カタログを検証
    Validate {
        /// Warning（ポート重複など）も失敗として扱う
        #[arg(long)]
        strict: bool,
        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },
    /// カテゴリとプロジェクトの一覧を表示
    List {
        /// 表示するカテゴリ（省略時は全カテゴリ）
        #[arg(short, long)]
        category: Option<String>,
        /// カタログ形式のJSONで出力
        #[arg(long)]
        json: bool,
    },
    /// プロジェクトの詳細を表示
    Show {
        /// repo-name
        repo_name: String,
        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },
    /// ホストポートの割り当てを表示
    Ports {
        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },
    /// カタログを別の形式で書き出す
    Export {
        /// 出力形式（省略時は出力ファイルの拡張子、なければ json）
        #[arg(short, long, value_enum)]
        to: Option<ExportFormat>,
        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Yaml,
    Kdl,
}

impl From<ExportFormat> for CatalogFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => CatalogFormat::Json,
            ExportFormat::Yaml => CatalogFormat::Yaml,
            ExportFormat::Kdl => CatalogFormat::Kdl,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出す（stdout は --json や export の出力に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Versionコマンドはカタログ不要
    if matches!(cli.command, Commands::Version) {
        println!("repolist {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let catalog_path = match cli.file {
        Some(path) => path,
        None => match repolist_config::find_catalog_file() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{}", "✗ カタログファイルが見つかりません".red().bold());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        },
    };
    tracing::debug!(path = %catalog_path.display(), "Using catalog file");

    let catalog = match repolist_core::load_catalog_file(&catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}", "✗ カタログの読み込みに失敗しました".red().bold());
            eprintln!("  {}", catalog_path.display());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    // コマンドディスパッチ
    match cli.command {
        Commands::Validate { strict, json } => {
            commands::validate::handle(&catalog, &catalog_path, strict, json)?;
        }
        Commands::List { category, json } => {
            commands::list::handle(&catalog, category.as_deref(), json)?;
        }
        Commands::Show { repo_name, json } => {
            commands::show::handle(&catalog, &repo_name, json)?;
        }
        Commands::Ports { json } => {
            commands::ports::handle(&catalog, json)?;
        }
        Commands::Export { to, output } => {
            commands::export::handle(&catalog, to.map(CatalogFormat::from), output.as_deref())?;
        }
        Commands::Version => {
            unreachable!("Version is handled before catalog loading");
        }
    }

    Ok(())
}
