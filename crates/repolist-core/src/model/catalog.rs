//! カタログ（カテゴリ → プロジェクト記述子の列）

use super::descriptor::ProjectDescriptor;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// 技術種別ごとのプロジェクトのまとまり
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    /// カテゴリ名（例: springboot, nginx）
    pub name: String,

    /// 記述子（文書内の順序を保持）
    pub projects: Vec<ProjectDescriptor>,
}

impl Category {
    pub fn new(name: impl Into<String>, projects: Vec<ProjectDescriptor>) -> Self {
        Self {
            name: name.into(),
            projects,
        }
    }
}

/// デプロイ対象プロジェクトのカタログ
///
/// ワイヤ形式ではカテゴリ名をキーとするマップ。カテゴリの順序は
/// 読み込んだ文書の順序をそのまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

/// カテゴリ名付きの記述子参照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectRef<'a> {
    pub category: &'a str,
    pub project: &'a ProjectDescriptor,
}

/// カタログの集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub categories: usize,
    pub projects: usize,
    pub distinct_ports: usize,
    pub dockerhub_usernames: BTreeSet<String>,
    pub git_credentials_ids: BTreeSet<String>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// カテゴリ数
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// 全カテゴリの記述子数
    pub fn project_count(&self) -> usize {
        self.categories.iter().map(|c| c.projects.len()).sum()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// 全記述子を文書順に列挙
    pub fn projects(&self) -> impl Iterator<Item = ProjectRef<'_>> {
        self.categories.iter().flat_map(|category| {
            category.projects.iter().map(move |project| ProjectRef {
                category: &category.name,
                project,
            })
        })
    }

    /// repo-name で最初に一致した記述子
    pub fn find_project(&self, repo_name: &str) -> Option<ProjectRef<'_>> {
        self.projects().find(|r| r.project.repo_name == repo_name)
    }

    /// 指定ポートを宣言している全記述子
    pub fn projects_on_port(&self, port: u16) -> Vec<ProjectRef<'_>> {
        self.projects()
            .filter(|r| r.project.port() == Ok(port))
            .collect()
    }

    /// ポート番号ごとの利用者（解析できないポートは含まない）
    pub fn port_usage(&self) -> BTreeMap<u16, Vec<ProjectRef<'_>>> {
        let mut usage: BTreeMap<u16, Vec<ProjectRef<'_>>> = BTreeMap::new();
        for project_ref in self.projects() {
            if let Ok(port) = project_ref.project.port() {
                usage.entry(port).or_default().push(project_ref);
            }
        }
        usage
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut summary = CatalogSummary {
            categories: self.len(),
            projects: self.project_count(),
            distinct_ports: self.port_usage().len(),
            ..Default::default()
        };

        for project_ref in self.projects() {
            let project = project_ref.project;
            if !project.dockerhub_username.is_empty() {
                summary
                    .dockerhub_usernames
                    .insert(project.dockerhub_username.clone());
            }
            if !project.git_credentials_id.is_empty() {
                summary
                    .git_credentials_ids
                    .insert(project.git_credentials_id.clone());
            }
        }

        summary
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.projects)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of category name to a list of project descriptors")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((name, projects)) = access.next_entry::<String, Vec<ProjectDescriptor>>()? {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!(
                    "duplicate category '{name}'"
                )));
            }
            categories.push(Category { name, projects });
        }

        Ok(Catalog { categories })
    }
}
