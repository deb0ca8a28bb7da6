//! カタログのパーサーとライター
//!
//! JSON（既存パイプラインの形式）、YAML、KDL の3形式を扱う。

mod kdl_format;

pub use kdl_format::{parse_kdl_catalog, write_kdl_catalog};

use crate::error::{CatalogError, Result};
use crate::model::Catalog;
use std::fmt;
use std::path::Path;

/// カタログのファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
    Kdl,
}

impl CatalogFormat {
    /// 拡張子から形式を判定する
    ///
    /// `.js` は JSON として扱う（既存のカタログは `.js` 拡張子で置かれている）。
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json" | "js") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("kdl") => Ok(Self::Kdl),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Kdl => "kdl",
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文字列を指定形式で Catalog にパース
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Catalog> {
    match format {
        CatalogFormat::Json => Ok(serde_json::from_str(content)?),
        CatalogFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        CatalogFormat::Kdl => parse_kdl_catalog(content),
    }
}

/// Catalog を指定形式の文字列に変換
///
/// JSON は2スペースインデントで末尾に改行を付ける。
pub fn write_catalog(catalog: &Catalog, format: CatalogFormat) -> Result<String> {
    match format {
        CatalogFormat::Json => {
            let mut out = serde_json::to_string_pretty(catalog)?;
            out.push('\n');
            Ok(out)
        }
        CatalogFormat::Yaml => Ok(serde_yaml::to_string(catalog)?),
        CatalogFormat::Kdl => Ok(write_kdl_catalog(catalog)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE_JSON: &str = r#"{
  "nginx": [
    {
      "repo-name": "dan-p81",
      "project_dir": ".",
      "git-url": "git@github.com:thani2808/dan-p81.git",
      "dockerhub_username": "thanigai2808",
      "host_port": "9005",
      "git_credentials_id": "private-key-jenkins"
    }
  ]
}"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("common-repo-list.js")).unwrap(),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("repos.JSON")).unwrap(),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("repos.yml")).unwrap(),
            CatalogFormat::Yaml
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("repos.kdl")).unwrap(),
            CatalogFormat::Kdl
        );

        let err = CatalogFormat::from_path(&PathBuf::from("repos.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(_)));
        assert!(CatalogFormat::from_path(Path::new("repos")).is_err());
    }

    #[test]
    fn test_parse_json_and_yaml_agree() {
        let yaml = r#"
nginx:
  - repo-name: dan-p81
    project_dir: "."
    git-url: "git@github.com:thani2808/dan-p81.git"
    dockerhub_username: thanigai2808
    host_port: 9005
    git_credentials_id: private-key-jenkins
"#;
        let from_json = parse_catalog(SAMPLE_JSON, CatalogFormat::Json).unwrap();
        let from_yaml = parse_catalog(yaml, CatalogFormat::Yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_write_json_matches_source_layout() {
        let catalog = parse_catalog(SAMPLE_JSON, CatalogFormat::Json).unwrap();
        let written = write_catalog(&catalog, CatalogFormat::Json).unwrap();
        assert_eq!(written, format!("{SAMPLE_JSON}\n"));
    }

    #[test]
    fn test_convert_between_formats() {
        let catalog = parse_catalog(SAMPLE_JSON, CatalogFormat::Json).unwrap();
        for format in [CatalogFormat::Yaml, CatalogFormat::Kdl] {
            let written = write_catalog(&catalog, format).unwrap();
            let reparsed = parse_catalog(&written, format).unwrap();
            assert_eq!(reparsed, catalog, "format: {format}");
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_catalog("{ not json", CatalogFormat::Json).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }
}
