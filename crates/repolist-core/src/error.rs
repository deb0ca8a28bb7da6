//! カタログのエラー型

use std::path::PathBuf;

/// カタログ読み込み・変換のエラー
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON パースエラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML パースエラー: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("KDL パースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("不正なカタログ定義: {0}")]
    InvalidConfig(String),

    #[error(
        "対応していないファイル形式です: {0}\nヒント: .json / .js / .yaml / .yml / .kdl のいずれかを使用してください"
    )]
    UnsupportedFormat(PathBuf),

    #[error("カテゴリ '{0}' が見つかりません")]
    CategoryNotFound(String),

    #[error("プロジェクト '{0}' が見つかりません")]
    ProjectNotFound(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// host_port の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("ポートが空です")]
    Empty,

    #[error("ポート '{0}' は10進数ではありません")]
    NotDecimal(String),

    #[error("ポート '{0}' は 1-65535 の範囲外です")]
    OutOfRange(String),
}
