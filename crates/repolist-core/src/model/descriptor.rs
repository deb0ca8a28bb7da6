//! プロジェクト記述子

use super::remote::GitRemote;
use crate::error::PortError;
use serde::{Deserialize, Deserializer, Serialize};

/// デプロイ対象リポジトリ1件の記述
///
/// キー名は既存のパイプラインが読む形式（`repo-name`, `git-url` はハイフン、
/// それ以外はアンダースコア）をそのまま使う。
/// 欠けたフィールドは空文字列として読み込み、検証で報告する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDescriptor {
    /// リポジトリ名（表示・検索用）
    #[serde(rename = "repo-name", default)]
    pub repo_name: String,

    /// リポジトリ内のビルド対象ディレクトリ（"." はルート）
    #[serde(default)]
    pub project_dir: String,

    /// SSH 形式のリモート（user@host:path.git）
    #[serde(rename = "git-url", default)]
    pub git_url: String,

    /// イメージをタグ付けするレジストリアカウント
    #[serde(default)]
    pub dockerhub_username: String,

    /// サービスをバインドするホストポート（10進数文字列）
    #[serde(default, deserialize_with = "deserialize_port")]
    pub host_port: String,

    /// 外部シークレットストアの認証情報ID
    #[serde(default)]
    pub git_credentials_id: String,
}

/// 必須フィールドのキー名（ワイヤ形式）
pub const REQUIRED_FIELDS: [&str; 6] = [
    "repo-name",
    "project_dir",
    "git-url",
    "dockerhub_username",
    "host_port",
    "git_credentials_id",
];

impl ProjectDescriptor {
    /// (キー名, 値) の組をワイヤ形式の順で返す
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            (REQUIRED_FIELDS[0], self.repo_name.as_str()),
            (REQUIRED_FIELDS[1], self.project_dir.as_str()),
            (REQUIRED_FIELDS[2], self.git_url.as_str()),
            (REQUIRED_FIELDS[3], self.dockerhub_username.as_str()),
            (REQUIRED_FIELDS[4], self.host_port.as_str()),
            (REQUIRED_FIELDS[5], self.git_credentials_id.as_str()),
        ]
    }

    /// 空（または空白のみ）のフィールド名
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| key)
            .collect()
    }

    pub fn port(&self) -> Result<u16, PortError> {
        parse_host_port(&self.host_port)
    }

    pub fn git_remote(&self) -> Option<GitRemote> {
        GitRemote::parse(&self.git_url)
    }
}

/// host_port 文字列をポート番号に変換する
///
/// 符号・空白は受け付けない。0 は不正。
pub fn parse_host_port(raw: &str) -> Result<u16, PortError> {
    if raw.is_empty() {
        return Err(PortError::Empty);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortError::NotDecimal(raw.to_string()));
    }

    match raw.parse::<u32>() {
        Ok(value) if (1..=u32::from(u16::MAX)).contains(&value) => Ok(value as u16),
        _ => Err(PortError::OutOfRange(raw.to_string())),
    }
}

/// 文字列・整数どちらの host_port も文字列として受け取る
fn deserialize_port<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPort {
        Text(String),
        Number(u64),
    }

    Ok(match RawPort::deserialize(deserializer)? {
        RawPort::Text(text) => text,
        RawPort::Number(number) => number.to_string(),
    })
}
