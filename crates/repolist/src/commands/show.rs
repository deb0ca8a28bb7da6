use colored::Colorize;
use repolist_core::{Catalog, CatalogError};

/// repolist show <repo-name> — プロジェクト1件の詳細
pub fn handle(catalog: &Catalog, repo_name: &str, json: bool) -> anyhow::Result<()> {
    let found = catalog
        .find_project(repo_name)
        .ok_or_else(|| CatalogError::ProjectNotFound(repo_name.to_string()))?;
    let project = found.project;
    let remote = project.git_remote();

    // 同じポートを使う他のプロジェクト
    let port_peers: Vec<String> = match project.port() {
        Ok(port) => catalog
            .projects_on_port(port)
            .into_iter()
            .filter(|r| !std::ptr::eq(r.project, project))
            .map(|r| format!("{}/{}", r.category, r.project.repo_name))
            .collect(),
        Err(_) => Vec::new(),
    };

    if json {
        let output = serde_json::json!({
            "category": found.category,
            "project": project,
            "repository": remote.as_ref().map(|r| r.repository()),
            "remote": remote,
            "port_shared_with": port_peers,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}  {}", "Project:".bold(), project.repo_name.cyan().bold());
    println!("  {:<20} {}", "category", found.category.green());
    println!("  {:<20} {}", "project_dir", project.project_dir);
    println!("  {:<20} {}", "git-url", project.git_url);
    match &remote {
        Some(remote) => {
            println!("  {:<20} {}", "  host", remote.host.dimmed());
            println!("  {:<20} {}", "  path", remote.path.dimmed());
            println!("  {:<20} {}", "  repository", remote.repository().dimmed());
        }
        None => println!("  {:<20} {}", "", "(SSH 形式ではありません)".red()),
    }
    println!("  {:<20} {}", "dockerhub_username", project.dockerhub_username);
    println!("  {:<20} {}", "host_port", project.host_port.yellow());
    if let Err(e) = project.port() {
        println!("  {:<20} {}", "", e.to_string().red());
    }
    if !port_peers.is_empty() {
        println!(
            "  {:<20} {}",
            "",
            format!("⚠ 同じポートを使用: {}", port_peers.join(", ")).yellow()
        );
    }
    println!("  {:<20} {}", "git_credentials_id", project.git_credentials_id);

    Ok(())
}
