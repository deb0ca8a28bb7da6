use colored::Colorize;
use repolist_core::{Catalog, CatalogFormat, save_catalog_file_as, write_catalog};
use std::path::Path;

/// repolist export — カタログを別形式で書き出す
///
/// 形式の決定順: --to → 出力ファイルの拡張子 → json
pub fn handle(
    catalog: &Catalog,
    format: Option<CatalogFormat>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let format = match (format, output) {
        (Some(format), _) => format,
        (None, Some(path)) => CatalogFormat::from_path(path)?,
        (None, None) => CatalogFormat::Json,
    };

    match output {
        Some(path) => {
            save_catalog_file_as(catalog, path, format)?;
            eprintln!(
                "{} {} ({})",
                "✓ 書き出しました:".green(),
                path.display().to_string().cyan(),
                format
            );
        }
        None => print!("{}", write_catalog(catalog, format)?),
    }

    Ok(())
}
