//! Loading catalogs and generation options from disk.

use anyhow::{anyhow, Context, Result};
use apimodel_core::{Catalog, GenerateOptions};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SqlDdl,
    CatalogJson,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("sql") => Ok(Self::SqlDdl),
            Some("json") => Ok(Self::CatalogJson),
            _ => Err(anyhow!(
                "unsupported input {}: expected a .sql or .json file",
                path.display()
            )),
        }
    }
}

pub fn parse_catalog(text: &str, kind: InputKind) -> Result<Catalog> {
    match kind {
        InputKind::SqlDdl => apimodel_ingest_sql::parse_sql_ddl(text),
        InputKind::CatalogJson => Ok(serde_json::from_str(text)?),
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let kind = InputKind::from_path(path)?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_catalog(&text, kind).with_context(|| format!("loading catalog from {}", path.display()))
}

pub fn load_options(path: &Path) -> Result<GenerateOptions> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing options in {}", path.display()))
}
