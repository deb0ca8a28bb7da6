//! KDL 形式のカタログ
//!
//! ```kdl
//! category "springboot" {
//!     project "hello-world-springboot" {
//!         project-dir "."
//!         git-url "git@github.com:thani2808/hello-world-springboot.git"
//!         dockerhub-username "thanigai2808"
//!         host-port "9004"
//!         git-credentials-id "private-key-jenkins"
//!     }
//! }
//! ```

use crate::error::{CatalogError, Result};
use crate::model::{Catalog, Category, ProjectDescriptor};
use kdl::{KdlDocument, KdlNode};
use std::collections::HashSet;
use tracing::debug;

/// KDL文字列を Catalog にパース
pub fn parse_kdl_catalog(content: &str) -> Result<Catalog> {
    let doc: KdlDocument = content.parse()?;

    let mut catalog = Catalog::default();

    for node in doc.nodes() {
        match node.name().value() {
            "category" => {
                let category = parse_category(node)?;
                if catalog.category(&category.name).is_some() {
                    return Err(CatalogError::InvalidConfig(format!(
                        "category '{}' が重複しています",
                        category.name
                    )));
                }
                catalog.categories.push(category);
            }
            other => {
                // 不明なノードはスキップ
                debug!(node = other, "Skipping unknown top-level node");
            }
        }
    }

    Ok(catalog)
}

/// Catalog を KDL 文字列に変換
pub fn write_kdl_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    for (index, category) in catalog.categories.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }

        if category.projects.is_empty() {
            out.push_str(&format!("category {}\n", quote(&category.name)));
            continue;
        }

        out.push_str(&format!("category {} {{\n", quote(&category.name)));
        for project in &category.projects {
            out.push_str(&format!("    project {} {{\n", quote(&project.repo_name)));
            for (key, value) in [
                ("project-dir", &project.project_dir),
                ("git-url", &project.git_url),
                ("dockerhub-username", &project.dockerhub_username),
                ("host-port", &project.host_port),
                ("git-credentials-id", &project.git_credentials_id),
            ] {
                out.push_str(&format!("        {key} {}\n", quote(value)));
            }
            out.push_str("    }\n");
        }
        out.push_str("}\n");
    }

    out
}

/// 文字列エントリを1つだけ持つノードの値（プロパティ・余分な引数は不可）
fn single_string(node: &KdlNode, context: &str) -> Result<String> {
    match node.entries() {
        [entry] if entry.name().is_none() => entry
            .value()
            .as_string()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                CatalogError::InvalidConfig(format!("{context} の値は文字列で指定してください"))
            }),
        _ => Err(CatalogError::InvalidConfig(format!(
            "{context} には文字列を1つだけ指定してください"
        ))),
    }
}

/// category ノードをパース
fn parse_category(node: &KdlNode) -> Result<Category> {
    let name = single_string(node, "category の名前")?;

    let mut projects = Vec::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "project" => projects.push(parse_project(child, &name)?),
                other => {
                    return Err(CatalogError::InvalidConfig(format!(
                        "category '{name}' に不明なノード '{other}' があります"
                    )));
                }
            }
        }
    }

    Ok(Category { name, projects })
}

/// project ノードをパース
fn parse_project(node: &KdlNode, category: &str) -> Result<ProjectDescriptor> {
    let repo_name = single_string(node, &format!("category '{category}' の project 名"))?;

    let mut project = ProjectDescriptor {
        repo_name,
        ..Default::default()
    };
    let mut seen = HashSet::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let key = child.name().value();
            let context = format!("project '{}' の {key}", project.repo_name);
            let field = match key {
                "project-dir" => &mut project.project_dir,
                "git-url" => &mut project.git_url,
                "dockerhub-username" => &mut project.dockerhub_username,
                "git-credentials-id" => &mut project.git_credentials_id,
                "host-port" => &mut project.host_port,
                other => {
                    return Err(CatalogError::InvalidConfig(format!(
                        "project '{}' に不明なノード '{other}' があります",
                        project.repo_name
                    )));
                }
            };
            if !seen.insert(key) {
                return Err(CatalogError::InvalidConfig(format!(
                    "{context} が重複しています"
                )));
            }
            *field = if key == "host-port" {
                parse_port_entry(child, &context)?
            } else {
                single_string(child, &context)?
            };
        }
    }

    Ok(project)
}

/// host-port は文字列・整数どちらでも受け付ける
fn parse_port_entry(node: &KdlNode, context: &str) -> Result<String> {
    let [entry] = node.entries() else {
        return Err(CatalogError::InvalidConfig(format!(
            "{context} には値を1つだけ指定してください"
        )));
    };

    if entry.name().is_none() {
        if let Some(text) = entry.value().as_string() {
            return Ok(text.to_string());
        }
        if let Some(number) = entry.value().as_integer()
            && number >= 0
        {
            return Ok(number.to_string());
        }
    }

    Err(CatalogError::InvalidConfig(format!(
        "{context} は文字列か正の整数で指定してください"
    )))
}

/// 引用符付き文字列にそのまま書けない文字
///
/// 制御文字、改行扱いの U+2028/U+2029、双方向制御文字、BOM。
fn needs_unicode_escape(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200E}'..='\u{200F}'
                | '\u{2028}'..='\u{2029}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2066}'..='\u{2069}'
                | '\u{FEFF}'
        )
}

/// KDL の引用符付き文字列にエスケープする
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if needs_unicode_escape(c) => {
                quoted.push_str(&format!("\\u{{{:x}}}", c as u32))
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_KDL: &str = r#"
category "springboot" {
    project "Dev-role-Springboot-proj" {
        project-dir "."
        git-url "git@github.com:thani2808/Dev-role-Springboot-proj.git"
        dockerhub-username "thanigai2808"
        host-port 9004
        git-credentials-id "private-key-jenkins"
    }
}

category "eureka" {
    project "eureka-discovery-server" {
        project-dir "."
        git-url "git@github.com:thani2808/common-repository-new.git"
        dockerhub-username "thanigai2808"
        host-port "8761"
        git-credentials-id "private-key-jenkins"
    }
}

category "reserved"
"#;

    #[test]
    fn test_parse_kdl_catalog() {
        let catalog = parse_kdl_catalog(SAMPLE_KDL).unwrap();

        assert_eq!(catalog.category_names(), vec!["springboot", "eureka", "reserved"]);
        assert_eq!(catalog.project_count(), 2);

        let dev = catalog.find_project("Dev-role-Springboot-proj").unwrap();
        assert_eq!(dev.category, "springboot");
        assert_eq!(dev.project.host_port, "9004");
        assert_eq!(dev.project.dockerhub_username, "thanigai2808");

        let eureka = catalog.find_project("eureka-discovery-server").unwrap();
        assert_eq!(eureka.project.host_port, "8761");
        assert_eq!(eureka.project.git_credentials_id, "private-key-jenkins");

        assert!(catalog.category("reserved").unwrap().projects.is_empty());
    }

    #[test]
    fn test_parse_skips_unknown_top_level_nodes() {
        let kdl = r#"
version "1"
category "nginx"
"#;
        let catalog = parse_kdl_catalog(kdl).unwrap();
        assert_eq!(catalog.category_names(), vec!["nginx"]);
    }

    #[test]
    fn test_parse_category_without_name() {
        let err = parse_kdl_catalog("category").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_project_without_name() {
        let kdl = r#"
category "nginx" {
    project {
        host-port "80"
    }
}
"#;
        let err = parse_kdl_catalog(kdl).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_unknown_project_field() {
        let kdl = r#"
category "nginx" {
    project "proxy" {
        branch "main"
    }
}
"#;
        let err = parse_kdl_catalog(kdl).unwrap_err();
        assert!(err.to_string().contains("branch"));
    }

    #[test]
    fn test_parse_negative_port() {
        let kdl = r#"
category "nginx" {
    project "proxy" {
        host-port -1
    }
}
"#;
        let err = parse_kdl_catalog(kdl).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_repeated_field() {
        let kdl = r#"
category "nginx" {
    project "proxy" {
        git-url "git@github.com:org/proxy.git"
        git-url "git@github.com:org/other.git"
    }
}
"#;
        let err = parse_kdl_catalog(kdl).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
        assert!(err.to_string().contains("git-url"));
    }

    #[test]
    fn test_parse_non_string_field() {
        for value in ["1", "#true", "#null"] {
            let kdl = format!(
                r#"
category "nginx" {{
    project "proxy" {{
        project-dir {value}
    }}
}}
"#
            );
            let err = parse_kdl_catalog(&kdl).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidConfig(_)), "value: {value}");
        }
    }

    #[test]
    fn test_parse_extra_entries_rejected() {
        let cases = [
            r#"category "nginx" "web""#,
            r#"category "nginx" kind="web""#,
            r#"
category "nginx" {
    project "proxy" "edge"
}
"#,
            r#"
category "nginx" {
    project "proxy" {
        git-url "a" "b"
    }
}
"#,
            r#"
category "nginx" {
    project "proxy" {
        host-port 80 443
    }
}
"#,
            r#"
category "nginx" {
    project "proxy" {
        host-port port=80
    }
}
"#,
        ];
        for kdl in cases {
            let err = parse_kdl_catalog(kdl).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidConfig(_)), "kdl: {kdl}");
        }
    }

    #[test]
    fn test_write_escapes_separators_and_bidi_marks() {
        let mut catalog = parse_kdl_catalog(SAMPLE_KDL).unwrap();
        catalog.categories[0].projects[0].repo_name = "a\u{2028}b".to_string();
        catalog.categories[1].projects[0].project_dir = "x\u{200E}y\u{FEFF}".to_string();

        let written = write_kdl_catalog(&catalog);
        assert!(written.contains(r#"project "a\u{2028}b""#));
        assert!(written.contains(r#"project-dir "x\u{200e}y\u{feff}""#));
        assert!(!written.contains('\u{2028}'));

        let reparsed = parse_kdl_catalog(&written).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn test_parse_duplicate_category() {
        let kdl = r#"
category "nginx"
category "nginx"
"#;
        let err = parse_kdl_catalog(kdl).unwrap_err();
        assert!(err.to_string().contains("nginx"));
    }

    #[test]
    fn test_parse_invalid_syntax() {
        let err = parse_kdl_catalog("category \"nginx\" {").unwrap_err();
        assert!(matches!(err, CatalogError::KdlParse(_)));
    }

    #[test]
    fn test_write_then_parse_preserves_catalog() {
        let catalog = parse_kdl_catalog(SAMPLE_KDL).unwrap();
        let written = write_kdl_catalog(&catalog);

        assert!(written.contains("category \"reserved\"\n"));
        assert!(written.contains("        host-port \"9004\"\n"));

        let reparsed = parse_kdl_catalog(&written).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote("p\u{2029}q"), "\"p\\u{2029}q\"");
        assert_eq!(quote("\u{202A}\u{2066}"), "\"\\u{202a}\\u{2066}\"");
    }
}
