use colored::Colorize;
use repolist_core::{Catalog, CatalogError, Category, ProjectDescriptor};

/// repolist list — カテゴリとプロジェクトの一覧
pub fn handle(catalog: &Catalog, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let categories: Vec<&Category> = match category {
        Some(name) => vec![
            catalog
                .category(name)
                .ok_or_else(|| CatalogError::CategoryNotFound(name.to_string()))?,
        ],
        None => catalog.categories.iter().collect(),
    };

    if json {
        // カタログと同じ形式で出力する
        let subset = Catalog::new(categories.into_iter().cloned().collect());
        println!("{}", serde_json::to_string_pretty(&subset)?);
        return Ok(());
    }

    for category in categories {
        println!(
            "{} {}",
            category.name.cyan().bold(),
            format!("({})", category.projects.len()).dimmed()
        );
        if category.projects.is_empty() {
            println!("  {}", "(なし)".dimmed());
        }
        for project in &category.projects {
            print_project_line(project);
        }
        println!();
    }

    Ok(())
}

fn print_project_line(project: &ProjectDescriptor) {
    println!(
        "  {:<28} {:>6}  {}",
        project.repo_name.green(),
        project.host_port.yellow(),
        project.git_url.dimmed()
    );
}
