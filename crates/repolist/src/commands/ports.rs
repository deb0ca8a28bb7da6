use colored::Colorize;
use repolist_core::Catalog;
use serde::Serialize;

#[derive(Serialize)]
struct PortHolder<'a> {
    category: &'a str,
    repo_name: &'a str,
}

#[derive(Serialize)]
struct PortEntry<'a> {
    port: u16,
    duplicate: bool,
    projects: Vec<PortHolder<'a>>,
}

/// repolist ports — ホストポートの割り当て
pub fn handle(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    let entries: Vec<PortEntry<'_>> = catalog
        .port_usage()
        .into_iter()
        .map(|(port, holders)| PortEntry {
            port,
            duplicate: holders.len() > 1,
            projects: holders
                .into_iter()
                .map(|r| PortHolder {
                    category: r.category,
                    repo_name: &r.project.repo_name,
                })
                .collect(),
        })
        .collect();

    let invalid: Vec<PortHolder<'_>> = catalog
        .projects()
        .filter(|r| r.project.port().is_err())
        .map(|r| PortHolder {
            category: r.category,
            repo_name: &r.project.repo_name,
        })
        .collect();

    if json {
        let output = serde_json::json!({
            "ports": entries,
            "invalid": invalid,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("  {:<7} {:<14} {}", "Port".bold(), "Category".bold(), "Project".bold());
    println!("  {}", "─".repeat(52).dimmed());

    for entry in &entries {
        for holder in &entry.projects {
            let port = entry.port.to_string();
            let port = if entry.duplicate {
                port.red().bold()
            } else {
                port.yellow()
            };
            println!(
                "  {:<7} {:<14} {}",
                port,
                holder.category.cyan(),
                holder.repo_name.green()
            );
        }
    }

    if !invalid.is_empty() {
        println!();
        println!("{}", "不正なポート:".red().bold());
        for holder in &invalid {
            println!("  {}/{}", holder.category, holder.repo_name);
        }
    }

    let duplicates = entries.iter().filter(|e| e.duplicate).count();
    if duplicates > 0 {
        println!();
        println!(
            "{}",
            format!("⚠ {}個のポートが複数のプロジェクトで使われています", duplicates).yellow()
        );
    }

    Ok(())
}
