//! カタログファイルのローダー

use crate::error::Result;
use crate::model::Catalog;
use crate::parser::{CatalogFormat, parse_catalog, write_catalog};
use crate::validate::{ValidationReport, validate_catalog};
use std::path::Path;
use tracing::{debug, info, instrument};

/// ファイルを読み込んで Catalog を生成する（形式は拡張子で判定）
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let format = CatalogFormat::from_path(path)?;
    debug!(%format, "Detected catalog format");

    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content, format)?;

    info!(
        categories = catalog.len(),
        projects = catalog.project_count(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// 読み込みと検証をまとめて行う
pub fn load_catalog_with_report(path: &Path) -> Result<(Catalog, ValidationReport)> {
    let catalog = load_catalog_file(path)?;
    let report = validate_catalog(&catalog);
    Ok((catalog, report))
}

/// Catalog を指定形式でファイルに書き出す（親ディレクトリは作成する）
#[instrument(skip(catalog, path), fields(path = %path.display()))]
pub fn save_catalog_file_as(catalog: &Catalog, path: &Path, format: CatalogFormat) -> Result<()> {
    let content = write_catalog(catalog, format)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    info!(%format, "Catalog written");
    Ok(())
}
