use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "カタログファイルが見つかりません（探索開始位置: {0}）\n\
        以下の場所を確認してください:\n\
        - 探索開始位置とその親ディレクトリ: common-repo-list.{{json,js,yaml,yml,kdl}}\n\
        - 各ディレクトリの resources/ 以下\n\
        - ~/.config/repolist/\n\
        または REPOLIST_CATALOG_PATH 環境変数・--file オプションで直接指定できます"
    )]
    CatalogFileNotFound(PathBuf),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
