//! カタログの検証
//!
//! スキーマとデータ品質の問題を `Finding` として集める。
//! パースエラーと違い、検証結果は Err にならない。

use crate::model::{Catalog, GitRemote, ProjectDescriptor};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path};
use tracing::debug;

/// 重大度（Info < Warning < Error）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 検証ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    #[serde(rename = "category.name-empty")]
    EmptyCategoryName,
    #[serde(rename = "category.empty")]
    EmptyCategory,
    #[serde(rename = "field.missing")]
    MissingField,
    #[serde(rename = "port.invalid")]
    InvalidPort,
    #[serde(rename = "port.duplicate")]
    DuplicatePort,
    #[serde(rename = "git-url.format")]
    InvalidGitUrl,
    #[serde(rename = "project-dir.invalid")]
    InvalidProjectDir,
    #[serde(rename = "repo-name.duplicate")]
    DuplicateRepoName,
}

impl Rule {
    pub fn id(&self) -> &'static str {
        match self {
            Self::EmptyCategoryName => "category.name-empty",
            Self::EmptyCategory => "category.empty",
            Self::MissingField => "field.missing",
            Self::InvalidPort => "port.invalid",
            Self::DuplicatePort => "port.duplicate",
            Self::InvalidGitUrl => "git-url.format",
            Self::InvalidProjectDir => "project-dir.invalid",
            Self::DuplicateRepoName => "repo-name.duplicate",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyCategory => Severity::Info,
            Self::DuplicatePort | Self::DuplicateRepoName => Severity::Warning,
            Self::EmptyCategoryName
            | Self::MissingField
            | Self::InvalidPort
            | Self::InvalidGitUrl
            | Self::InvalidProjectDir => Severity::Error,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 検証で見つかった1件の問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    pub message: String,
}

impl Finding {
    fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            category: None,
            repo_name: None,
            message: message.into(),
        }
    }

    fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    fn for_project(mut self, category: &str, project: &ProjectDescriptor) -> Self {
        self.category = Some(category.to_string());
        if !project.repo_name.trim().is_empty() {
            self.repo_name = Some(project.repo_name.clone());
        }
        self
    }
}

/// 検証結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn by_rule(&self, rule: Rule) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule == rule).collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Info 以外の問題がない
    pub fn is_clean(&self) -> bool {
        self.findings.iter().all(|f| f.severity == Severity::Info)
    }

    /// strict のときは Warning も失敗扱い
    pub fn fails(&self, strict: bool) -> bool {
        if strict {
            !self.is_clean()
        } else {
            self.has_errors()
        }
    }
}

/// カタログ全体を検証する
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut findings = Vec::new();

    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            findings.push(
                Finding::new(Rule::EmptyCategoryName, "カテゴリ名が空です")
                    .in_category(&category.name),
            );
        }
        if category.projects.is_empty() {
            findings.push(
                Finding::new(
                    Rule::EmptyCategory,
                    format!("カテゴリ '{}' にプロジェクトがありません", category.name),
                )
                .in_category(&category.name),
            );
        }

        for project in &category.projects {
            check_project(&category.name, project, &mut findings);
        }
    }

    check_duplicate_ports(catalog, &mut findings);
    check_duplicate_repo_names(catalog, &mut findings);

    debug!(findings = findings.len(), "Catalog validated");
    ValidationReport { findings }
}

fn check_project(category: &str, project: &ProjectDescriptor, out: &mut Vec<Finding>) {
    let label = if project.repo_name.trim().is_empty() {
        format!("{category} の名前のないプロジェクト")
    } else {
        project.repo_name.clone()
    };

    for field in project.missing_fields() {
        out.push(
            Finding::new(
                Rule::MissingField,
                format!("{label}: {field} が未設定です"),
            )
            .for_project(category, project),
        );
    }

    if !project.host_port.trim().is_empty()
        && let Err(e) = project.port()
    {
        out.push(
            Finding::new(Rule::InvalidPort, format!("{label}: {e}"))
                .for_project(category, project),
        );
    }

    if !project.git_url.trim().is_empty() && GitRemote::parse(&project.git_url).is_none() {
        out.push(
            Finding::new(
                Rule::InvalidGitUrl,
                format!(
                    "{label}: git-url '{}' は user@host:path.git 形式ではありません",
                    project.git_url
                ),
            )
            .for_project(category, project),
        );
    }

    if !project.project_dir.trim().is_empty() && !is_relative_within(&project.project_dir) {
        out.push(
            Finding::new(
                Rule::InvalidProjectDir,
                format!(
                    "{label}: project_dir '{}' はリポジトリ内の相対パスではありません",
                    project.project_dir
                ),
            )
            .for_project(category, project),
        );
    }
}

/// リポジトリ外に出ない相対パスか
fn is_relative_within(dir: &str) -> bool {
    Path::new(dir).components().all(|c| {
        matches!(c, Component::CurDir | Component::Normal(_))
    })
}

fn check_duplicate_ports(catalog: &Catalog, out: &mut Vec<Finding>) {
    for (port, holders) in catalog.port_usage() {
        if holders.len() < 2 {
            continue;
        }

        let names: Vec<String> = holders
            .iter()
            .map(|r| format!("{}/{}", r.category, r.project.repo_name))
            .collect();
        let mut finding = Finding::new(
            Rule::DuplicatePort,
            format!("host_port {port} が重複しています: {}", names.join(", ")),
        );
        // 全員が同じカテゴリならカテゴリを付ける
        if holders.iter().all(|r| r.category == holders[0].category) {
            finding = finding.in_category(holders[0].category);
        }
        out.push(finding);
    }
}

fn check_duplicate_repo_names(catalog: &Catalog, out: &mut Vec<Finding>) {
    let mut seen: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut order = Vec::new();

    for project_ref in catalog.projects() {
        let name = project_ref.project.repo_name.as_str();
        if name.trim().is_empty() {
            continue;
        }
        let categories = seen.entry(name).or_default();
        if categories.is_empty() {
            order.push(name);
        }
        categories.push(project_ref.category);
    }

    for name in order {
        let categories = &seen[name];
        if categories.len() < 2 {
            continue;
        }
        let mut finding = Finding::new(
            Rule::DuplicateRepoName,
            format!(
                "repo-name '{name}' が {} 回定義されています ({})",
                categories.len(),
                categories.join(", ")
            ),
        );
        finding.repo_name = Some(name.to_string());
        out.push(finding);
    }
}
