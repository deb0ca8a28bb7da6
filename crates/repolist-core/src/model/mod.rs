//! モデル定義
//!
//! カタログ・カテゴリ・プロジェクト記述子を定義します。

mod catalog;
mod descriptor;
mod remote;

// Re-exports
pub use catalog::*;
pub use descriptor::*;
pub use remote::*;
