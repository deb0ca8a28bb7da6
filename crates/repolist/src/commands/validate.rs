use colored::Colorize;
use repolist_core::{Catalog, Severity, validate_catalog};
use std::path::Path;

pub fn handle(catalog: &Catalog, path: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let report = validate_catalog(catalog);
    let summary = catalog.summary();
    let failed = report.fails(strict);

    if json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "passed": !failed,
            "strict": strict,
            "summary": summary,
            "findings": report.findings(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("{}", "カタログを検証中...".blue());
    println!("カタログ: {}", path.display().to_string().cyan());
    println!();
    println!("サマリー:");
    println!("  カテゴリ: {}個", summary.categories);
    for category in &catalog.categories {
        println!(
            "    - {} ({}個のプロジェクト)",
            category.name.cyan(),
            category.projects.len()
        );
    }
    println!("  プロジェクト: {}個", summary.projects);
    println!("  ポート: {}種類", summary.distinct_ports);

    if !report.findings().is_empty() {
        println!();
        println!("検出事項:");
        for finding in report.findings() {
            let label = match finding.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".dimmed(),
            };
            println!(
                "  {:<7} {:<20} {}",
                label,
                finding.rule.id().dimmed(),
                finding.message
            );
        }
    }

    println!();
    if failed {
        eprintln!(
            "{} (エラー {}件, 警告 {}件)",
            "✗ カタログに問題があります".red().bold(),
            report.count(Severity::Error),
            report.count(Severity::Warning)
        );
        if !report.has_errors() {
            eprintln!("  {}", "--strict のため警告を失敗として扱いました".dimmed());
        }
        std::process::exit(1);
    }

    if report.is_clean() {
        println!("{}", "✓ カタログは正常です！".green().bold());
    } else {
        println!(
            "{} (警告 {}件)",
            "✓ カタログは読み込めます".green().bold(),
            report.count(Severity::Warning)
        );
    }

    Ok(())
}
