//! repolist core — デプロイ対象プロジェクトのカタログ
//!
//! カタログは技術種別（springboot, nginx など）ごとに、
//! リポジトリ・レジストリアカウント・ホストポート・認証情報IDを
//! 列挙した静的なデータです。CI/CD パイプラインが読み込みます。
//!
//! # 概要
//!
//! - **model**: カタログ・カテゴリ・プロジェクト記述子
//! - **parser**: JSON / YAML / KDL の読み書き
//! - **loader**: ファイルからの読み込みと書き出し
//! - **validate**: スキーマとデータ品質の検証（ポート重複など）

pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod validate;

pub use error::*;
pub use loader::*;
pub use model::*;
pub use parser::*;
pub use validate::*;
